//! Records returned by the data access layer.
//!
//! The text form of each record is its `Display` implementation: the fields
//! matching the columns of the corresponding header, separated by tabs.

use itertools::Itertools as _;

/// Implement `Display` as the tab-separated list of the given fields.
macro_rules! tab_separated_display {
    ($ty:ty; $($field:ident),+ $(,)?) => {
        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", [$(self.$field.to_string()),+].iter().join("\t"))
            }
        }
    };
}

/// Records that are located on a chromosome.
pub trait Located {
    /// Chromosome name.
    fn chromosome(&self) -> &str;
    /// 1-based start position.
    fn start(&self) -> u64;
    /// 1-based, inclusive end position.
    fn end(&self) -> u64;
}

macro_rules! located {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Located for $ty {
                fn chromosome(&self) -> &str {
                    &self.chromosome
                }
                fn start(&self) -> u64 {
                    self.start
                }
                fn end(&self) -> u64 {
                    self.end
                }
            }
        )+
    };
}

/// An Ensembl gene.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Gene {
    pub stable_id: String,
    pub external_name: String,
    pub external_db: String,
    pub biotype: String,
    pub status: String,
    pub chromosome: String,
    pub start: u64,
    pub end: u64,
    pub strand: String,
    pub source: String,
    pub description: String,
}

tab_separated_display!(
    Gene; stable_id, external_name, external_db, biotype, status, chromosome, start, end,
    strand, source, description
);

/// An Ensembl transcript.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Transcript {
    pub stable_id: String,
    pub external_name: String,
    pub external_db: String,
    pub biotype: String,
    pub status: String,
    pub chromosome: String,
    pub start: u64,
    pub end: u64,
    pub strand: String,
    pub coding_region_start: u64,
    pub coding_region_end: u64,
    pub cdna_coding_start: u64,
    pub cdna_coding_end: u64,
    pub description: String,
    /// Stable ID of the owning gene.
    pub gene_stable_id: String,
}

tab_separated_display!(
    Transcript; stable_id, external_name, external_db, biotype, status, chromosome, start,
    end, strand, coding_region_start, coding_region_end, cdna_coding_start, cdna_coding_end,
    description
);

/// An exon, possibly shared by several transcripts.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Exon {
    pub stable_id: String,
    pub chromosome: String,
    pub start: u64,
    pub end: u64,
    pub strand: String,
    /// Genomic sequence of the exon on the forward strand.
    pub sequence: String,
    /// Stable IDs of the transcripts using this exon, in rank order.
    pub transcript_ids: Vec<String>,
}

tab_separated_display!(Exon; stable_id, chromosome, start, end, strand);

/// One consequence type annotation of a SNP.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SnpConsequenceType {
    pub snp_name: String,
    pub chromosome: String,
    pub start: u64,
    pub end: u64,
    pub strand: String,
    pub allele: String,
    pub transcript_id: String,
    pub gene: String,
    pub so_accession: String,
    pub so_term: String,
    pub label: String,
    pub description: String,
}

tab_separated_display!(
    SnpConsequenceType; snp_name, chromosome, start, end, strand, allele, transcript_id, gene,
    so_accession, so_term, label, description
);

/// A dbSNP variant.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Snp {
    pub name: String,
    pub chromosome: String,
    pub start: u64,
    pub end: u64,
    pub strand: String,
    pub allele_string: String,
    pub ensembl_consequence_type: String,
    pub so_consequence_type: String,
    pub sequence: String,
    /// Transcripts affected by the SNP.
    pub transcript_ids: Vec<String>,
    pub consequence_types: Vec<SnpConsequenceType>,
}

tab_separated_display!(
    Snp; name, chromosome, start, ensembl_consequence_type, so_consequence_type, sequence
);

/// A UniProt protein.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Protein {
    pub accession: String,
    pub name: String,
    pub full_name: String,
    pub gene_name: String,
    pub organism: String,
    /// Ensembl transcripts translating into this protein.
    pub transcript_ids: Vec<String>,
}

tab_separated_display!(Protein; accession, name, full_name, gene_name, organism);

/// A feature annotated on a protein sequence.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProteinFeature {
    pub protein_accession: String,
    #[serde(rename = "type")]
    pub feature_type: String,
    pub start: u64,
    pub end: u64,
    pub original: String,
    pub variation: String,
    pub identifier: String,
    pub description: String,
}

tab_separated_display!(
    ProteinFeature; feature_type, start, end, original, variation, identifier, description
);

/// An interaction between two proteins.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProteinInteraction {
    pub protein_accession: String,
    pub partner_accession: String,
    pub interaction_type: String,
    pub source: String,
}

tab_separated_display!(
    ProteinInteraction; protein_accession, partner_accession, interaction_type, source
);

/// A cross reference into an external database.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Xref {
    pub id: String,
    pub description: String,
    pub db_name: String,
    /// Transcript or protein identifiers that carry this reference.
    pub owner_ids: Vec<String>,
}

tab_separated_display!(Xref; id, description);

/// A cytogenetic band.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Cytoband {
    pub chromosome: String,
    pub start: u64,
    pub end: u64,
    pub name: String,
    pub stain: String,
}

tab_separated_display!(Cytoband; chromosome, start, end, name, stain);

/// A stretch of genome sequence.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenomeSequence {
    pub chromosome: String,
    pub start: u64,
    pub end: u64,
    /// `1` for forward, `-1` for reverse strand.
    pub strand: i8,
    pub sequence: String,
}

impl std::fmt::Display for GenomeSequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.sequence)
    }
}

/// A transcription factor binding site.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Tfbs {
    pub tf_name: String,
    pub target_gene_name: String,
    pub chromosome: String,
    pub start: u64,
    pub end: u64,
    pub cell_type: String,
    pub sequence: String,
    pub score: f64,
}

tab_separated_display!(
    Tfbs; tf_name, target_gene_name, chromosome, start, end, cell_type, sequence, score
);

/// A position weight matrix of a transcription factor.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pwm {
    pub tf_name: String,
    pub source: String,
    #[serde(rename = "type")]
    pub pwm_type: String,
    pub frequency_matrix: String,
}

tab_separated_display!(Pwm; tf_name, source, pwm_type, frequency_matrix);

/// A miRNA precursor gene.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MirnaGene {
    pub accession: String,
    pub mirbase_id: String,
    pub status: String,
    pub sequence: String,
    pub source: String,
    /// miRBase IDs of the mature miRNAs derived from this gene.
    pub mature_ids: Vec<String>,
    /// Ensembl genes hosting this miRNA.
    pub gene_ids: Vec<String>,
}

tab_separated_display!(MirnaGene; accession, mirbase_id, status, sequence, source);

/// A mature miRNA.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MirnaMature {
    pub accession: String,
    pub mirbase_id: String,
    pub sequence: String,
}

tab_separated_display!(MirnaMature; accession, mirbase_id, sequence);

/// A predicted or validated miRNA target site.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MirnaTarget {
    pub mirbase_id: String,
    pub gene_target_name: String,
    pub chromosome: String,
    pub start: u64,
    pub end: u64,
    pub strand: String,
    pub pubmed_id: String,
    pub source: String,
}

tab_separated_display!(
    MirnaTarget; mirbase_id, gene_target_name, chromosome, start, end, strand, pubmed_id, source
);

/// A disease association of a miRNA.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MirnaDisease {
    pub mirbase_id: String,
    pub disease_name: String,
    pub pubmed_id: String,
    pub description: String,
}

tab_separated_display!(MirnaDisease; mirbase_id, disease_name, pubmed_id, description);

/// A somatic mutation with phenotype annotation.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Mutation {
    pub chromosome: String,
    pub start: u64,
    pub end: u64,
    pub gene_name: String,
    pub uniprot_name: String,
    pub ensembl_transcript: String,
    pub primary_site: String,
    pub site_subtype: String,
    pub primary_histology: String,
    pub mutation_cds: String,
    pub mutation_aa: String,
    pub mutation_description: String,
    pub mutation_zygosity: String,
    pub pubmed_id: String,
    pub description: String,
    pub source: String,
}

tab_separated_display!(
    Mutation; chromosome, start, end, gene_name, uniprot_name, ensembl_transcript,
    primary_site, site_subtype, primary_histology, mutation_cds, mutation_aa,
    mutation_description, mutation_zygosity, pubmed_id, description, source
);

/// A regulatory region, e.g., an open chromatin or histone mark peak.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegulatoryRegion {
    pub name: String,
    #[serde(rename = "type")]
    pub region_type: String,
    pub chromosome: String,
    pub start: u64,
    pub end: u64,
    pub cell_type: String,
    pub source: String,
}

tab_separated_display!(
    RegulatoryRegion; name, region_type, chromosome, start, end, cell_type, source
);

/// A conserved region with its conservation score.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConservedRegion {
    pub chromosome: String,
    pub start: u64,
    pub end: u64,
    pub score: f64,
    pub source: String,
}

tab_separated_display!(ConservedRegion; chromosome, start, end, score, source);

/// A CpG island.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CpGIsland {
    pub chromosome: String,
    pub start: u64,
    pub end: u64,
    pub cpg_count: u64,
    pub gc_content: f64,
}

tab_separated_display!(CpGIsland; chromosome, start, end, cpg_count, gc_content);

/// A structural variation from a public study.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StructuralVariation {
    pub display_id: String,
    pub chromosome: String,
    pub start: u64,
    pub end: u64,
    pub strand: String,
    pub so_term: String,
    pub study_name: String,
    pub study_url: String,
    pub study_description: String,
    pub source: String,
    pub source_description: String,
}

tab_separated_display!(
    StructuralVariation; display_id, chromosome, start, end, strand, so_term, study_name,
    study_url, study_description, source, source_description
);

/// A pathway with its participating genes and proteins.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pathway {
    pub id: String,
    pub name: String,
    pub source: String,
    /// Enclosing pathway, `None` for top-level pathways.
    pub parent: Option<String>,
    pub genes: Vec<String>,
    pub proteins: Vec<String>,
    /// Other physical entities (complexes, small molecules).
    pub elements: Vec<String>,
}

tab_separated_display!(Pathway; id, name);

/// Number of features in one bin of a histogram over a region.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IntervalFeatureFrequency {
    pub start: u64,
    pub end: u64,
    /// 0-based index of the bin.
    pub interval: u64,
    /// Number of features overlapping the bin.
    pub absolute: u64,
    /// `absolute` divided by the maximum over all bins.
    pub value: f64,
}

tab_separated_display!(IntervalFeatureFrequency; start, end, interval, absolute, value);

located!(
    Gene,
    Transcript,
    Exon,
    Snp,
    Cytoband,
    Tfbs,
    MirnaTarget,
    Mutation,
    RegulatoryRegion,
    ConservedRegion,
    CpGIsland,
    StructuralVariation,
);
