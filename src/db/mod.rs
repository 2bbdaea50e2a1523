//! Data access layer.
//!
//! Request handlers never touch storage directly.  They obtain one adaptor per
//! entity type from a [`DbAdaptorFactory`] for the validated species and
//! version, and call its query methods.  Queries keyed by a list of
//! identifiers return one entry per identifier, in input order, with
//! `None` or an empty list marking "not found".

use std::sync::Arc;

pub mod memory;
pub mod model;
pub mod region;

use model::{
    ConservedRegion, CpGIsland, Cytoband, Exon, Gene, GenomeSequence, IntervalFeatureFrequency,
    MirnaDisease, MirnaGene, MirnaMature, MirnaTarget, Mutation, Pathway, Protein,
    ProteinFeature, ProteinInteraction, Pwm, RegulatoryRegion, Snp, SnpConsequenceType,
    StructuralVariation, Tfbs, Transcript, Xref,
};
use region::{Position, Region};

/// Errors raised by the data access layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// No database was loaded for the species/version combination.
    #[error("no database available for species '{species}' and version '{version}'")]
    Unavailable { species: String, version: String },
    /// The query itself could not be answered.
    #[error("invalid query: {0}")]
    InvalidQuery(String),
}

/// Convenience alias for results of adaptor calls.
pub type DbResult<T> = Result<T, DbError>;

/// Access to genes.
pub trait GeneDbAdaptor: Send + Sync {
    /// Genes by stable ID or external name.
    fn get_all_by_id_list(&self, ids: &[String]) -> DbResult<Vec<Option<Gene>>>;
    /// The gene owning each transcript.
    fn get_all_by_transcript_id_list(&self, ids: &[String]) -> DbResult<Vec<Option<Gene>>>;
    fn get_all_by_region_list(&self, regions: &[Region]) -> DbResult<Vec<Vec<Gene>>>;
    /// Genes hosting each mature miRNA.
    fn get_all_by_mirna_mature_list(&self, ids: &[String]) -> DbResult<Vec<Vec<Gene>>>;
    /// Genes targeted by each mature miRNA.
    fn get_all_targets_by_mirna_mature_list(&self, ids: &[String])
        -> DbResult<Vec<Vec<Gene>>>;
    /// Genes with binding sites of each transcription factor.
    fn get_all_targets_by_tf_name_list(&self, names: &[String]) -> DbResult<Vec<Vec<Gene>>>;
    fn get_all_interval_frequencies(
        &self,
        region: &Region,
        interval: u64,
    ) -> DbResult<Vec<IntervalFeatureFrequency>>;

    fn get_all_by_position_list(&self, positions: &[Position]) -> DbResult<Vec<Vec<Gene>>> {
        self.get_all_by_region_list(&positions.iter().map(Region::from).collect::<Vec<_>>())
    }
}

/// Access to transcripts.
pub trait TranscriptDbAdaptor: Send + Sync {
    fn get_all_by_id_list(&self, ids: &[String]) -> DbResult<Vec<Option<Transcript>>>;
    fn get_all_by_gene_id_list(&self, ids: &[String]) -> DbResult<Vec<Vec<Transcript>>>;
    fn get_all_by_exon_id_list(&self, ids: &[String]) -> DbResult<Vec<Vec<Transcript>>>;
    /// Transcripts of the genes hosting each mature miRNA.
    fn get_all_by_mirna_mature_list(&self, ids: &[String]) -> DbResult<Vec<Vec<Transcript>>>;
    fn get_all_by_region_list(&self, regions: &[Region]) -> DbResult<Vec<Vec<Transcript>>>;
    /// Spliced sequence of each transcript, concatenating its exons.
    fn get_all_sequences_by_id_list(&self, ids: &[String]) -> DbResult<Vec<Option<String>>>;

    fn get_all_regions_by_id_list(&self, ids: &[String]) -> DbResult<Vec<Option<Region>>> {
        Ok(self
            .get_all_by_id_list(ids)?
            .into_iter()
            .map(|tx| tx.map(|tx| Region::new(tx.chromosome, tx.start, tx.end)))
            .collect())
    }

    fn get_all_by_position_list(
        &self,
        positions: &[Position],
    ) -> DbResult<Vec<Vec<Transcript>>> {
        self.get_all_by_region_list(&positions.iter().map(Region::from).collect::<Vec<_>>())
    }
}

/// Access to exons.
pub trait ExonDbAdaptor: Send + Sync {
    fn get_all_by_id_list(&self, ids: &[String]) -> DbResult<Vec<Option<Exon>>>;
    fn get_all_by_transcript_id_list(&self, ids: &[String]) -> DbResult<Vec<Vec<Exon>>>;
    fn get_all_by_gene_id_list(&self, ids: &[String]) -> DbResult<Vec<Vec<Exon>>>;
    /// Exons overlapping each SNP.
    fn get_all_by_snp_id_list(&self, ids: &[String]) -> DbResult<Vec<Vec<Exon>>>;
    fn get_all_by_region_list(&self, regions: &[Region]) -> DbResult<Vec<Vec<Exon>>>;

    fn get_all_sequences_by_id_list(&self, ids: &[String]) -> DbResult<Vec<Option<String>>> {
        Ok(self
            .get_all_by_id_list(ids)?
            .into_iter()
            .map(|exon| exon.map(|exon| exon.sequence))
            .collect())
    }

    fn get_all_regions_by_id_list(&self, ids: &[String]) -> DbResult<Vec<Option<Region>>> {
        Ok(self
            .get_all_by_id_list(ids)?
            .into_iter()
            .map(|exon| exon.map(|exon| Region::new(exon.chromosome, exon.start, exon.end)))
            .collect())
    }
}

/// Access to SNPs and their consequence types.
pub trait SnpDbAdaptor: Send + Sync {
    fn get_all_by_id_list(&self, ids: &[String]) -> DbResult<Vec<Option<Snp>>>;
    fn get_all_by_gene_id_list(&self, ids: &[String]) -> DbResult<Vec<Vec<Snp>>>;
    fn get_all_by_transcript_id_list(&self, ids: &[String]) -> DbResult<Vec<Vec<Snp>>>;
    fn get_all_by_region_list(&self, regions: &[Region]) -> DbResult<Vec<Vec<Snp>>>;
    fn get_all_interval_frequencies(
        &self,
        region: &Region,
        interval: u64,
    ) -> DbResult<Vec<IntervalFeatureFrequency>>;

    fn get_all_consequence_types_by_id_list(
        &self,
        ids: &[String],
    ) -> DbResult<Vec<Vec<SnpConsequenceType>>> {
        Ok(self
            .get_all_by_id_list(ids)?
            .into_iter()
            .map(|snp| snp.map(|snp| snp.consequence_types).unwrap_or_default())
            .collect())
    }

    fn get_all_by_position_list(&self, positions: &[Position]) -> DbResult<Vec<Vec<Snp>>> {
        self.get_all_by_region_list(&positions.iter().map(Region::from).collect::<Vec<_>>())
    }
}

/// Access to proteins, their features and interactions.
pub trait ProteinDbAdaptor: Send + Sync {
    /// Proteins by accession or name.
    fn get_all_by_id_list(&self, ids: &[String]) -> DbResult<Vec<Option<Protein>>>;
    fn get_all_by_gene_name_list(&self, names: &[String]) -> DbResult<Vec<Vec<Protein>>>;
    fn get_all_features_by_id_list(&self, ids: &[String]) -> DbResult<Vec<Vec<ProteinFeature>>>;
    /// Features of the proteins translated from each transcript.
    fn get_all_features_by_transcript_id_list(
        &self,
        ids: &[String],
    ) -> DbResult<Vec<Vec<ProteinFeature>>>;
    /// Interactions of each protein, optionally restricted to `sources`.
    fn get_all_interactions_by_id_list(
        &self,
        ids: &[String],
        sources: &[String],
    ) -> DbResult<Vec<Vec<ProteinInteraction>>>;
}

/// Access to cross references.
pub trait XrefDbAdaptor: Send + Sync {
    /// Cross references of each owner, restricted to `db_names` unless empty.
    fn get_all_by_db_name_list(
        &self,
        ids: &[String],
        db_names: &[String],
    ) -> DbResult<Vec<Vec<Xref>>>;
}

/// Access to the karyotype.
pub trait CytobandDbAdaptor: Send + Sync {
    fn get_all_by_chromosome_list(&self, chromosomes: &[String]) -> DbResult<Vec<Vec<Cytoband>>>;
    fn get_all_by_region_list(&self, regions: &[Region]) -> DbResult<Vec<Vec<Cytoband>>>;
    /// Names of all chromosomes with cytobands, in karyotype order.
    fn get_all_chromosome_names(&self) -> DbResult<Vec<String>>;
}

/// Access to the genome sequence.
pub trait GenomeSequenceDbAdaptor: Send + Sync {
    /// Sequence of each region on the given strand (`-1` gives the reverse
    /// complement).
    fn get_all_by_region_list(
        &self,
        regions: &[Region],
        strand: i8,
    ) -> DbResult<Vec<Option<GenomeSequence>>>;
}

/// Access to transcription factor binding sites and matrices.
pub trait TfbsDbAdaptor: Send + Sync {
    fn get_all_by_tf_name_list(&self, names: &[String]) -> DbResult<Vec<Vec<Tfbs>>>;
    fn get_all_by_target_gene_name_list(&self, names: &[String]) -> DbResult<Vec<Vec<Tfbs>>>;
    fn get_all_pwm_by_tf_name_list(&self, names: &[String]) -> DbResult<Vec<Vec<Pwm>>>;
    fn get_all_by_region_list(&self, regions: &[Region]) -> DbResult<Vec<Vec<Tfbs>>>;
    /// Distinct `(tf name, cell type)` pairs, optionally restricted to cell types.
    fn get_all_annotation(&self, cell_types: &[String]) -> DbResult<Vec<(String, String)>>;
    fn get_all_interval_frequencies(
        &self,
        region: &Region,
        interval: u64,
    ) -> DbResult<Vec<IntervalFeatureFrequency>>;
}

/// Access to miRNA genes, matures, targets and diseases.
pub trait MirnaDbAdaptor: Send + Sync {
    fn get_all_mirna_genes_by_name_list(&self, names: &[String])
        -> DbResult<Vec<Option<MirnaGene>>>;
    fn get_all_mirna_matures_by_name_list(
        &self,
        names: &[String],
    ) -> DbResult<Vec<Option<MirnaMature>>>;
    fn get_all_mirna_genes_by_mirna_mature_list(
        &self,
        names: &[String],
    ) -> DbResult<Vec<Vec<MirnaGene>>>;
    fn get_all_mirna_targets_by_mirna_gene_list(
        &self,
        names: &[String],
    ) -> DbResult<Vec<Vec<MirnaTarget>>>;
    /// Targets of each mature miRNA, optionally restricted to `sources`.
    fn get_all_mirna_targets_by_mirna_mature_list(
        &self,
        names: &[String],
        sources: &[String],
    ) -> DbResult<Vec<Vec<MirnaTarget>>>;
    fn get_all_mirna_targets_by_gene_name_list(
        &self,
        names: &[String],
    ) -> DbResult<Vec<Vec<MirnaTarget>>>;
    fn get_all_mirna_diseases_by_mirna_gene_list(
        &self,
        names: &[String],
    ) -> DbResult<Vec<Vec<MirnaDisease>>>;
    fn get_all_mirna_diseases_by_mirna_mature_list(
        &self,
        names: &[String],
    ) -> DbResult<Vec<Vec<MirnaDisease>>>;
    fn get_all_mirna_targets_by_region_list(
        &self,
        regions: &[Region],
    ) -> DbResult<Vec<Vec<MirnaTarget>>>;
    /// Distinct `(miRBase ID, source)` pairs of targets, optionally
    /// restricted to `sources`.
    fn get_all_annotation(&self, sources: &[String]) -> DbResult<Vec<(String, String)>>;
    fn get_all_mirna_target_interval_frequencies(
        &self,
        region: &Region,
        interval: u64,
    ) -> DbResult<Vec<IntervalFeatureFrequency>>;
}

/// Access to somatic mutations.
pub trait MutationDbAdaptor: Send + Sync {
    fn get_all_by_gene_name_list(&self, names: &[String]) -> DbResult<Vec<Vec<Mutation>>>;
    fn get_all_by_transcript_id_list(&self, ids: &[String]) -> DbResult<Vec<Vec<Mutation>>>;
    fn get_all_by_region_list(&self, regions: &[Region]) -> DbResult<Vec<Vec<Mutation>>>;
    fn get_all_interval_frequencies(
        &self,
        region: &Region,
        interval: u64,
    ) -> DbResult<Vec<IntervalFeatureFrequency>>;
}

/// Access to regulatory regions.
pub trait RegulatoryRegionDbAdaptor: Send + Sync {
    /// Regulatory regions, optionally restricted to the given types.
    fn get_all_by_region_list(
        &self,
        regions: &[Region],
        types: &[String],
    ) -> DbResult<Vec<Vec<RegulatoryRegion>>>;
    fn get_all_interval_frequencies(
        &self,
        region: &Region,
        interval: u64,
    ) -> DbResult<Vec<IntervalFeatureFrequency>>;
}

/// Access to conserved regions.
pub trait ConservedRegionDbAdaptor: Send + Sync {
    fn get_all_by_region_list(&self, regions: &[Region]) -> DbResult<Vec<Vec<ConservedRegion>>>;
    fn get_all_interval_frequencies(
        &self,
        region: &Region,
        interval: u64,
    ) -> DbResult<Vec<IntervalFeatureFrequency>>;
}

/// Access to CpG islands.
pub trait CpGIslandDbAdaptor: Send + Sync {
    fn get_all_by_region_list(&self, regions: &[Region]) -> DbResult<Vec<Vec<CpGIsland>>>;
    fn get_all_interval_frequencies(
        &self,
        region: &Region,
        interval: u64,
    ) -> DbResult<Vec<IntervalFeatureFrequency>>;
}

/// Access to structural variation.
pub trait StructuralVariationDbAdaptor: Send + Sync {
    fn get_all_by_region_list(
        &self,
        regions: &[Region],
    ) -> DbResult<Vec<Vec<StructuralVariation>>>;
    fn get_all_interval_frequencies(
        &self,
        region: &Region,
        interval: u64,
    ) -> DbResult<Vec<IntervalFeatureFrequency>>;
}

/// Access to pathways.
pub trait PathwayDbAdaptor: Send + Sync {
    /// All pathways whose name contains `search` (ignoring case), only
    /// top-level ones when `top_level_only` is set.
    fn get_all(&self, search: Option<&str>, top_level_only: bool) -> DbResult<Vec<Pathway>>;
    fn get_by_id(&self, id: &str) -> DbResult<Option<Pathway>>;
}

/// Factory handing out adaptors for a species/version combination.
///
/// Both values are expected to have passed validation.
pub trait DbAdaptorFactory: Send + Sync {
    fn gene(&self, species: &str, version: &str) -> DbResult<Arc<dyn GeneDbAdaptor>>;
    fn transcript(&self, species: &str, version: &str) -> DbResult<Arc<dyn TranscriptDbAdaptor>>;
    fn exon(&self, species: &str, version: &str) -> DbResult<Arc<dyn ExonDbAdaptor>>;
    fn snp(&self, species: &str, version: &str) -> DbResult<Arc<dyn SnpDbAdaptor>>;
    fn protein(&self, species: &str, version: &str) -> DbResult<Arc<dyn ProteinDbAdaptor>>;
    fn xref(&self, species: &str, version: &str) -> DbResult<Arc<dyn XrefDbAdaptor>>;
    fn cytoband(&self, species: &str, version: &str) -> DbResult<Arc<dyn CytobandDbAdaptor>>;
    fn genome_sequence(
        &self,
        species: &str,
        version: &str,
    ) -> DbResult<Arc<dyn GenomeSequenceDbAdaptor>>;
    fn tfbs(&self, species: &str, version: &str) -> DbResult<Arc<dyn TfbsDbAdaptor>>;
    fn mirna(&self, species: &str, version: &str) -> DbResult<Arc<dyn MirnaDbAdaptor>>;
    fn mutation(&self, species: &str, version: &str) -> DbResult<Arc<dyn MutationDbAdaptor>>;
    fn regulatory_region(
        &self,
        species: &str,
        version: &str,
    ) -> DbResult<Arc<dyn RegulatoryRegionDbAdaptor>>;
    fn conserved_region(
        &self,
        species: &str,
        version: &str,
    ) -> DbResult<Arc<dyn ConservedRegionDbAdaptor>>;
    fn cpg_island(&self, species: &str, version: &str) -> DbResult<Arc<dyn CpGIslandDbAdaptor>>;
    fn structural_variation(
        &self,
        species: &str,
        version: &str,
    ) -> DbResult<Arc<dyn StructuralVariationDbAdaptor>>;
    fn pathway(&self, species: &str, version: &str) -> DbResult<Arc<dyn PathwayDbAdaptor>>;
}
