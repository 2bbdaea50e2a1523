//! Column headers for text output, keyed by entity type.

/// Entity type tags that carry a text output header.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::EnumString,
    strum::Display,
    strum::EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum HeaderTag {
    Gene,
    Transcript,
    Exon,
    Snp,
    SnpPhenotype,
    SnpPopulationFrequency,
    SnpRegulatory,
    GenomicVariantEffect,
    SnpConsequenceType,
    Mutation,
    StructuralVariation,
    Tfbs,
    MirnaGene,
    MirnaMature,
    MirnaTarget,
    MirnaDisease,
    RegulatoryRegion,
    Protein,
    ProteinFeature,
    Xref,
    Pathway,
}

impl HeaderTag {
    /// The comma separated column names, as stored.
    fn columns(self) -> &'static str {
        match self {
            HeaderTag::Gene => "Ensembl gene,external name,external name source,biotype,status,chromosome,start,end,strand,source,description",
            HeaderTag::Transcript => "Ensembl ID,external name,external name source,biotype,status,chromosome,start,end,strand,coding region start,coding region end,cdna coding start,cdna coding end,description",
            HeaderTag::Exon => "Ensembl ID,chromosome,start,end,strand",
            HeaderTag::Snp => "rsID,chromosome,position,Ensembl consequence type,SO consequence type,sequence",
            HeaderTag::SnpPhenotype => "SNP name,source,associated gene name,risk allele,risk allele freq in controls,p-value,phenotype name,phenotype description,study name,study type,study URL,study description",
            HeaderTag::SnpPopulationFrequency => "SNP name,population,source,ref allele,ref allele freq,other allele,other allele freq,ref allele homozygote,ref allele homozygote freq,allele heterozygote,allele heterozygote freq,ref other allele homozygote, ref other allele homozygote freq",
            HeaderTag::SnpRegulatory => "SNP name,feature name,feature type,chromsome,start,end,strand,Ensembl transcript ID,Ensembl gene ID,gene name,biotype",
            HeaderTag::GenomicVariantEffect => "chromosome,position,reference allele,alternative allele,feature ID,feature name,feature type,feature chromsomome,feature start,feature end,feature strand,SNP name,ancestral allele,alternative allele,Ensembl gene ID,Ensembl transcript ID,gene name,SO consequence type ID,SO consequence type name,consequence type description,consequence type category,aminoacid position,aminoacid change,codon change",
            HeaderTag::SnpConsequenceType => "SNP name,chromosome,start,end,strand,allele,transcript ID,gene,SO accession,SO term,label,description",
            HeaderTag::Mutation => "chromosome,start,end,gene_name,uniprot_name,ensembl_transcript,primary_site,site_subtype,primary_histology,mutation_cds,mutation_aa,mutation_description,mutation_zigosity,pubmed_id,description,source",
            HeaderTag::StructuralVariation => "display_id,chromosome,start,end,strand,so_term,study_name,study_url,study_description,source,source_description",
            HeaderTag::Tfbs => "TF name,target gene name,chromosome,start,end,cell type,sequence,score",
            HeaderTag::MirnaGene => "miRBase accession,miRBase ID,status,sequence,source",
            HeaderTag::MirnaMature => "miRBase accession,miRBase ID,sequence",
            HeaderTag::MirnaTarget => "miRBase ID,gene target name,chromosome,start,end,strand,pubmed ID,source",
            HeaderTag::MirnaDisease => "miRBase ID,disease name,pubmed ID,description",
            HeaderTag::RegulatoryRegion => "name,type,chromosome,start,end,cell type,source",
            HeaderTag::Protein => "UniProt accession,protein name,full name,gene name,organism",
            HeaderTag::ProteinFeature => "feature type,aa start,aa end,original,variation,identifier,description",
            HeaderTag::Xref => "ID,description",
            HeaderTag::Pathway => "",
        }
    }

    /// Tab-delimited header line content (without the leading `#`).
    pub fn header(self) -> String {
        self.columns().replace(',', "\t")
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator as _;

    use super::HeaderTag;

    #[test]
    fn header_exon() {
        assert_eq!(
            HeaderTag::Exon.header(),
            "Ensembl ID\tchromosome\tstart\tend\tstrand"
        );
    }

    #[test]
    fn header_pathway_is_empty() {
        assert_eq!(HeaderTag::Pathway.header(), "");
    }

    #[test]
    fn no_commas_left() {
        for tag in HeaderTag::iter() {
            assert!(!tag.header().contains(','), "{}", tag);
        }
    }

    #[rstest::rstest]
    #[case("GENE", true)]
    #[case("SNP_POPULATION_FREQUENCY", true)]
    #[case("MIRNA_MATURE", true)]
    #[case("gene", false)]
    #[case("UNKNOWN", false)]
    fn parse_tag(#[case] tag: &str, #[case] known: bool) {
        assert_eq!(tag.parse::<HeaderTag>().is_ok(), known);
    }

    #[test]
    fn tag_names() {
        assert_eq!(HeaderTag::SnpConsequenceType.to_string(), "SNP_CONSEQUENCE_TYPE");
        assert_eq!(HeaderTag::iter().count(), 21);
    }
}
