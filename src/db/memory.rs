//! In-memory implementation of the adaptors, loaded from JSON documents.
//!
//! The database directory contains one document per version and species at
//! `<dir>/<version>/<species>.json`.  Identifier lookups ignore case.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use itertools::Itertools as _;

use super::model::{
    ConservedRegion, CpGIsland, Cytoband, Exon, Gene, GenomeSequence, IntervalFeatureFrequency,
    Located, MirnaDisease, MirnaGene, MirnaMature, MirnaTarget, Mutation, Pathway, Protein,
    ProteinFeature, ProteinInteraction, Pwm, RegulatoryRegion, Snp, StructuralVariation, Tfbs,
    Transcript, Xref,
};
use super::region::Region;
use super::{
    ConservedRegionDbAdaptor, CpGIslandDbAdaptor, CytobandDbAdaptor, DbAdaptorFactory, DbError,
    DbResult, ExonDbAdaptor, GeneDbAdaptor, GenomeSequenceDbAdaptor, MirnaDbAdaptor,
    MutationDbAdaptor, PathwayDbAdaptor, ProteinDbAdaptor, RegulatoryRegionDbAdaptor,
    SnpDbAdaptor, StructuralVariationDbAdaptor, TfbsDbAdaptor, TranscriptDbAdaptor,
    XrefDbAdaptor,
};

/// Serialized form of one species/version database.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Database {
    pub genes: Vec<Gene>,
    pub transcripts: Vec<Transcript>,
    pub exons: Vec<Exon>,
    pub snps: Vec<Snp>,
    pub proteins: Vec<Protein>,
    pub protein_features: Vec<ProteinFeature>,
    pub protein_interactions: Vec<ProteinInteraction>,
    pub xrefs: Vec<Xref>,
    pub cytobands: Vec<Cytoband>,
    pub sequences: Vec<GenomeSequence>,
    pub tfbs: Vec<Tfbs>,
    pub pwms: Vec<Pwm>,
    pub mirna_genes: Vec<MirnaGene>,
    pub mirna_matures: Vec<MirnaMature>,
    pub mirna_targets: Vec<MirnaTarget>,
    pub mirna_diseases: Vec<MirnaDisease>,
    pub mutations: Vec<Mutation>,
    pub regulatory_regions: Vec<RegulatoryRegion>,
    pub conserved_regions: Vec<ConservedRegion>,
    pub cpg_islands: Vec<CpGIsland>,
    pub structural_variations: Vec<StructuralVariation>,
    pub pathways: Vec<Pathway>,
}

/// Index from lower-cased key to record offset.
type Index = HashMap<String, usize>;

fn build_index<'a, T>(items: &'a [T], keys: impl Fn(&'a T) -> Vec<&'a str>) -> Index {
    let mut index = Index::new();
    for (i, item) in items.iter().enumerate() {
        for key in keys(item) {
            if !key.is_empty() {
                index.entry(key.to_lowercase()).or_insert(i);
            }
        }
    }
    index
}

fn eq(lhs: &str, rhs: &str) -> bool {
    lhs.eq_ignore_ascii_case(rhs)
}

fn contains(values: &[String], value: &str) -> bool {
    values.iter().any(|v| eq(v, value))
}

/// Whether `value` passes an optional filter list (empty list lets all pass).
fn passes(filter: &[String], value: &str) -> bool {
    filter.is_empty() || contains(filter, value)
}

/// One filtered list per key.
fn filter_each<T: Clone, K: AsRef<str>>(
    items: &[T],
    keys: &[K],
    pred: impl Fn(&T, &str) -> bool,
) -> Vec<Vec<T>> {
    keys.iter()
        .map(|key| {
            items
                .iter()
                .filter(|item| pred(item, key.as_ref()))
                .cloned()
                .collect()
        })
        .collect()
}

/// Features overlapping each region.
fn in_regions<T: Clone + Located>(items: &[T], regions: &[Region]) -> Vec<Vec<T>> {
    regions
        .iter()
        .map(|region| {
            items
                .iter()
                .filter(|item| region.overlaps(*item))
                .cloned()
                .collect()
        })
        .collect()
}

/// Upper bound on the number of bins of one histogram.
pub const MAX_HISTOGRAM_BINS: u64 = 10_000;

/// Count features per `interval` sized bin of `region`.
///
/// A whole-chromosome region is clipped to the last feature end on that
/// chromosome. Requests needing more than [`MAX_HISTOGRAM_BINS`] bins are
/// rejected.
pub fn interval_frequencies<T: Located>(
    items: &[T],
    region: &Region,
    interval: u64,
) -> DbResult<Vec<IntervalFeatureFrequency>> {
    if interval == 0 {
        return Err(DbError::InvalidQuery(
            "histogram interval must be positive".to_string(),
        ));
    }

    let on_chrom = items
        .iter()
        .filter(|item| item.chromosome() == region.chromosome)
        .collect::<Vec<_>>();
    let start = region.start.max(1);
    let end = if region.is_whole() {
        on_chrom
            .iter()
            .map(|item| item.end())
            .max()
            .unwrap_or(start)
            .max(start)
    } else {
        region.end
    };
    if end < start {
        return Ok(Vec::new());
    }

    let n_bins = (end - start) / interval + 1;
    if n_bins > MAX_HISTOGRAM_BINS {
        return Err(DbError::InvalidQuery(format!(
            "histogram of {} bins exceeds the maximum of {}, use a larger interval",
            n_bins, MAX_HISTOGRAM_BINS
        )));
    }

    // Each feature opens a run of bins and closes it after its last bin.
    let mut deltas = vec![0_i64; n_bins as usize + 1];
    for item in on_chrom {
        if item.end() < start || item.start() > end {
            continue;
        }
        let first = (item.start().max(start) - start) / interval;
        let last = (item.end().min(end) - start) / interval;
        deltas[first as usize] += 1;
        deltas[last as usize + 1] -= 1;
    }

    let mut running = 0_i64;
    let mut bins = (0..n_bins)
        .map(|index| {
            running += deltas[index as usize];
            let bin_start = start + index * interval;
            IntervalFeatureFrequency {
                start: bin_start,
                end: bin_start.saturating_add(interval - 1).min(end),
                interval: index,
                absolute: running.max(0) as u64,
                value: 0.0,
            }
        })
        .collect::<Vec<_>>();

    let max = bins.iter().map(|bin| bin.absolute).max().unwrap_or(0);
    if max > 0 {
        for bin in bins.iter_mut() {
            bin.value = bin.absolute as f64 / max as f64;
        }
    }
    Ok(bins)
}

/// Reverse complement of a nucleotide sequence, keeping case.
pub fn reverse_complement(sequence: &str) -> String {
    sequence
        .chars()
        .rev()
        .map(|c| match c {
            'A' => 'T',
            'T' => 'A',
            'C' => 'G',
            'G' => 'C',
            'U' => 'A',
            'a' => 't',
            't' => 'a',
            'c' => 'g',
            'g' => 'c',
            'u' => 'a',
            other => other,
        })
        .collect()
}

/// One species/version database held in memory.
#[derive(derivative::Derivative)]
#[derivative(Debug)]
pub struct MemoryDb {
    #[derivative(Debug = "ignore")]
    data: Database,
    #[derivative(Debug = "ignore")]
    gene_index: Index,
    #[derivative(Debug = "ignore")]
    transcript_index: Index,
    #[derivative(Debug = "ignore")]
    exon_index: Index,
    #[derivative(Debug = "ignore")]
    snp_index: Index,
    #[derivative(Debug = "ignore")]
    protein_index: Index,
    #[derivative(Debug = "ignore")]
    mirna_gene_index: Index,
    #[derivative(Debug = "ignore")]
    mirna_mature_index: Index,
    /// Number of genes, for logging.
    pub gene_count: usize,
}

impl MemoryDb {
    /// Build indexes over `data`.
    pub fn new(data: Database) -> Self {
        let gene_index = build_index(&data.genes, |g| {
            vec![g.stable_id.as_str(), g.external_name.as_str()]
        });
        let transcript_index = build_index(&data.transcripts, |t| {
            vec![t.stable_id.as_str(), t.external_name.as_str()]
        });
        let exon_index = build_index(&data.exons, |e| vec![e.stable_id.as_str()]);
        let snp_index = build_index(&data.snps, |s| vec![s.name.as_str()]);
        let protein_index = build_index(&data.proteins, |p| {
            vec![p.accession.as_str(), p.name.as_str()]
        });
        let mirna_gene_index = build_index(&data.mirna_genes, |m| {
            vec![m.mirbase_id.as_str(), m.accession.as_str()]
        });
        let mirna_mature_index = build_index(&data.mirna_matures, |m| {
            vec![m.mirbase_id.as_str(), m.accession.as_str()]
        });
        Self {
            gene_count: data.genes.len(),
            data,
            gene_index,
            transcript_index,
            exon_index,
            snp_index,
            protein_index,
            mirna_gene_index,
            mirna_mature_index,
        }
    }

    /// Load from the JSON document at `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .map_err(|e| anyhow::anyhow!("could not open {}: {}", path.display(), e))?;
        let data: Database = serde_json::from_reader(std::io::BufReader::new(file))
            .map_err(|e| anyhow::anyhow!("could not parse {}: {}", path.display(), e))?;
        Ok(Self::new(data))
    }

    fn lookup<'a, T>(items: &'a [T], index: &Index, id: &str) -> Option<&'a T> {
        index.get(&id.to_lowercase()).map(|&i| &items[i])
    }

    fn lookup_each<T: Clone>(items: &[T], index: &Index, ids: &[String]) -> Vec<Option<T>> {
        ids.iter()
            .map(|id| Self::lookup(items, index, id).cloned())
            .collect()
    }

    fn gene(&self, id: &str) -> Option<&Gene> {
        Self::lookup(&self.data.genes, &self.gene_index, id)
    }

    fn transcript(&self, id: &str) -> Option<&Transcript> {
        Self::lookup(&self.data.transcripts, &self.transcript_index, id)
    }

    fn protein(&self, id: &str) -> Option<&Protein> {
        Self::lookup(&self.data.proteins, &self.protein_index, id)
    }

    fn mirna_gene(&self, id: &str) -> Option<&MirnaGene> {
        Self::lookup(&self.data.mirna_genes, &self.mirna_gene_index, id)
    }

    /// Genes with the given external names, without duplicates.
    fn genes_named<'a>(&self, names: impl Iterator<Item = &'a str>) -> Vec<Gene> {
        names
            .filter_map(|name| self.gene(name))
            .unique_by(|gene| gene.stable_id.clone())
            .cloned()
            .collect()
    }

    fn transcripts_of_gene(&self, gene_id: &str) -> Vec<Transcript> {
        match self.gene(gene_id) {
            Some(gene) => self
                .data
                .transcripts
                .iter()
                .filter(|tx| eq(&tx.gene_stable_id, &gene.stable_id))
                .cloned()
                .collect(),
            None => Vec::new(),
        }
    }

    /// Exons of a transcript, sorted by position.
    fn exons_of_transcript(&self, transcript_id: &str) -> Vec<Exon> {
        self.data
            .exons
            .iter()
            .filter(|exon| contains(&exon.transcript_ids, transcript_id))
            .cloned()
            .sorted_by_key(|exon| exon.start)
            .collect()
    }

    /// Host genes of the miRNA genes producing a mature miRNA.
    fn host_genes_of_mature(&self, mature: &str) -> Vec<Gene> {
        let gene_ids = self
            .data
            .mirna_genes
            .iter()
            .filter(|m| contains(&m.mature_ids, mature))
            .flat_map(|m| m.gene_ids.iter().map(String::as_str))
            .collect::<Vec<_>>();
        self.genes_named(gene_ids.into_iter())
    }

    /// miRBase IDs of a miRNA gene and its matures.
    fn mirna_family(&self, name: &str) -> Vec<String> {
        match self.mirna_gene(name) {
            Some(gene) => std::iter::once(gene.mirbase_id.clone())
                .chain(gene.mature_ids.iter().cloned())
                .collect(),
            None => Vec::new(),
        }
    }
}

impl GeneDbAdaptor for MemoryDb {
    fn get_all_by_id_list(&self, ids: &[String]) -> DbResult<Vec<Option<Gene>>> {
        Ok(Self::lookup_each(&self.data.genes, &self.gene_index, ids))
    }

    fn get_all_by_transcript_id_list(&self, ids: &[String]) -> DbResult<Vec<Option<Gene>>> {
        Ok(ids
            .iter()
            .map(|id| {
                self.transcript(id)
                    .and_then(|tx| self.gene(&tx.gene_stable_id))
                    .cloned()
            })
            .collect())
    }

    fn get_all_by_region_list(&self, regions: &[Region]) -> DbResult<Vec<Vec<Gene>>> {
        Ok(in_regions(&self.data.genes, regions))
    }

    fn get_all_by_mirna_mature_list(&self, ids: &[String]) -> DbResult<Vec<Vec<Gene>>> {
        Ok(ids.iter().map(|id| self.host_genes_of_mature(id)).collect())
    }

    fn get_all_targets_by_mirna_mature_list(
        &self,
        ids: &[String],
    ) -> DbResult<Vec<Vec<Gene>>> {
        Ok(ids
            .iter()
            .map(|id| {
                self.genes_named(
                    self.data
                        .mirna_targets
                        .iter()
                        .filter(|t| eq(&t.mirbase_id, id))
                        .map(|t| t.gene_target_name.as_str()),
                )
            })
            .collect())
    }

    fn get_all_targets_by_tf_name_list(&self, names: &[String]) -> DbResult<Vec<Vec<Gene>>> {
        Ok(names
            .iter()
            .map(|name| {
                self.genes_named(
                    self.data
                        .tfbs
                        .iter()
                        .filter(|t| eq(&t.tf_name, name))
                        .map(|t| t.target_gene_name.as_str()),
                )
            })
            .collect())
    }

    fn get_all_interval_frequencies(
        &self,
        region: &Region,
        interval: u64,
    ) -> DbResult<Vec<IntervalFeatureFrequency>> {
        interval_frequencies(&self.data.genes, region, interval)
    }
}

impl TranscriptDbAdaptor for MemoryDb {
    fn get_all_by_id_list(&self, ids: &[String]) -> DbResult<Vec<Option<Transcript>>> {
        Ok(Self::lookup_each(
            &self.data.transcripts,
            &self.transcript_index,
            ids,
        ))
    }

    fn get_all_by_gene_id_list(&self, ids: &[String]) -> DbResult<Vec<Vec<Transcript>>> {
        Ok(ids.iter().map(|id| self.transcripts_of_gene(id)).collect())
    }

    fn get_all_by_exon_id_list(&self, ids: &[String]) -> DbResult<Vec<Vec<Transcript>>> {
        Ok(ids
            .iter()
            .map(|id| {
                Self::lookup(&self.data.exons, &self.exon_index, id)
                    .map(|exon| {
                        exon.transcript_ids
                            .iter()
                            .filter_map(|tx_id| self.transcript(tx_id))
                            .cloned()
                            .collect()
                    })
                    .unwrap_or_default()
            })
            .collect())
    }

    fn get_all_by_mirna_mature_list(&self, ids: &[String]) -> DbResult<Vec<Vec<Transcript>>> {
        Ok(ids
            .iter()
            .map(|id| {
                self.host_genes_of_mature(id)
                    .iter()
                    .flat_map(|gene| self.transcripts_of_gene(&gene.stable_id))
                    .collect()
            })
            .collect())
    }

    fn get_all_by_region_list(&self, regions: &[Region]) -> DbResult<Vec<Vec<Transcript>>> {
        Ok(in_regions(&self.data.transcripts, regions))
    }

    fn get_all_sequences_by_id_list(&self, ids: &[String]) -> DbResult<Vec<Option<String>>> {
        Ok(ids
            .iter()
            .map(|id| {
                self.transcript(id).map(|tx| {
                    let spliced = self
                        .exons_of_transcript(&tx.stable_id)
                        .iter()
                        .map(|exon| exon.sequence.as_str())
                        .collect::<String>();
                    if tx.strand == "-1" {
                        reverse_complement(&spliced)
                    } else {
                        spliced
                    }
                })
            })
            .collect())
    }
}

impl ExonDbAdaptor for MemoryDb {
    fn get_all_by_id_list(&self, ids: &[String]) -> DbResult<Vec<Option<Exon>>> {
        Ok(Self::lookup_each(&self.data.exons, &self.exon_index, ids))
    }

    fn get_all_by_transcript_id_list(&self, ids: &[String]) -> DbResult<Vec<Vec<Exon>>> {
        Ok(ids
            .iter()
            .map(|id| match self.transcript(id) {
                Some(tx) => self.exons_of_transcript(&tx.stable_id),
                None => Vec::new(),
            })
            .collect())
    }

    fn get_all_by_gene_id_list(&self, ids: &[String]) -> DbResult<Vec<Vec<Exon>>> {
        Ok(ids
            .iter()
            .map(|id| {
                self.transcripts_of_gene(id)
                    .iter()
                    .flat_map(|tx| self.exons_of_transcript(&tx.stable_id))
                    .unique_by(|exon| exon.stable_id.clone())
                    .sorted_by_key(|exon| exon.start)
                    .collect()
            })
            .collect())
    }

    fn get_all_by_snp_id_list(&self, ids: &[String]) -> DbResult<Vec<Vec<Exon>>> {
        Ok(ids
            .iter()
            .map(|id| match Self::lookup(&self.data.snps, &self.snp_index, id) {
                Some(snp) => {
                    let region = Region::new(&snp.chromosome, snp.start, snp.end);
                    self.data
                        .exons
                        .iter()
                        .filter(|exon| region.overlaps(*exon))
                        .cloned()
                        .collect()
                }
                None => Vec::new(),
            })
            .collect())
    }

    fn get_all_by_region_list(&self, regions: &[Region]) -> DbResult<Vec<Vec<Exon>>> {
        Ok(in_regions(&self.data.exons, regions))
    }
}

impl SnpDbAdaptor for MemoryDb {
    fn get_all_by_id_list(&self, ids: &[String]) -> DbResult<Vec<Option<Snp>>> {
        Ok(Self::lookup_each(&self.data.snps, &self.snp_index, ids))
    }

    fn get_all_by_gene_id_list(&self, ids: &[String]) -> DbResult<Vec<Vec<Snp>>> {
        Ok(ids
            .iter()
            .map(|id| match self.gene(id) {
                Some(gene) => {
                    let region = Region::new(&gene.chromosome, gene.start, gene.end);
                    self.data
                        .snps
                        .iter()
                        .filter(|snp| region.overlaps(*snp))
                        .cloned()
                        .collect()
                }
                None => Vec::new(),
            })
            .collect())
    }

    fn get_all_by_transcript_id_list(&self, ids: &[String]) -> DbResult<Vec<Vec<Snp>>> {
        Ok(filter_each(&self.data.snps, ids, |snp, id| {
            contains(&snp.transcript_ids, id)
        }))
    }

    fn get_all_by_region_list(&self, regions: &[Region]) -> DbResult<Vec<Vec<Snp>>> {
        Ok(in_regions(&self.data.snps, regions))
    }

    fn get_all_interval_frequencies(
        &self,
        region: &Region,
        interval: u64,
    ) -> DbResult<Vec<IntervalFeatureFrequency>> {
        interval_frequencies(&self.data.snps, region, interval)
    }
}

impl ProteinDbAdaptor for MemoryDb {
    fn get_all_by_id_list(&self, ids: &[String]) -> DbResult<Vec<Option<Protein>>> {
        Ok(Self::lookup_each(
            &self.data.proteins,
            &self.protein_index,
            ids,
        ))
    }

    fn get_all_by_gene_name_list(&self, names: &[String]) -> DbResult<Vec<Vec<Protein>>> {
        Ok(filter_each(&self.data.proteins, names, |protein, name| {
            eq(&protein.gene_name, name)
        }))
    }

    fn get_all_features_by_id_list(
        &self,
        ids: &[String],
    ) -> DbResult<Vec<Vec<ProteinFeature>>> {
        Ok(ids
            .iter()
            .map(|id| match self.protein(id) {
                Some(protein) => self
                    .data
                    .protein_features
                    .iter()
                    .filter(|f| eq(&f.protein_accession, &protein.accession))
                    .cloned()
                    .collect(),
                None => Vec::new(),
            })
            .collect())
    }

    fn get_all_features_by_transcript_id_list(
        &self,
        ids: &[String],
    ) -> DbResult<Vec<Vec<ProteinFeature>>> {
        Ok(ids
            .iter()
            .map(|id| {
                let accessions = self
                    .data
                    .proteins
                    .iter()
                    .filter(|p| contains(&p.transcript_ids, id))
                    .map(|p| p.accession.clone())
                    .collect::<Vec<_>>();
                self.data
                    .protein_features
                    .iter()
                    .filter(|f| contains(&accessions, &f.protein_accession))
                    .cloned()
                    .collect()
            })
            .collect())
    }

    fn get_all_interactions_by_id_list(
        &self,
        ids: &[String],
        sources: &[String],
    ) -> DbResult<Vec<Vec<ProteinInteraction>>> {
        Ok(ids
            .iter()
            .map(|id| match self.protein(id) {
                Some(protein) => self
                    .data
                    .protein_interactions
                    .iter()
                    .filter(|i| {
                        (eq(&i.protein_accession, &protein.accession)
                            || eq(&i.partner_accession, &protein.accession))
                            && passes(sources, &i.source)
                    })
                    .cloned()
                    .collect(),
                None => Vec::new(),
            })
            .collect())
    }
}

impl XrefDbAdaptor for MemoryDb {
    fn get_all_by_db_name_list(
        &self,
        ids: &[String],
        db_names: &[String],
    ) -> DbResult<Vec<Vec<Xref>>> {
        Ok(filter_each(&self.data.xrefs, ids, |xref, id| {
            contains(&xref.owner_ids, id) && passes(db_names, &xref.db_name)
        }))
    }
}

impl CytobandDbAdaptor for MemoryDb {
    fn get_all_by_chromosome_list(
        &self,
        chromosomes: &[String],
    ) -> DbResult<Vec<Vec<Cytoband>>> {
        Ok(filter_each(&self.data.cytobands, chromosomes, |band, chrom| {
            eq(&band.chromosome, chrom)
        }))
    }

    fn get_all_by_region_list(&self, regions: &[Region]) -> DbResult<Vec<Vec<Cytoband>>> {
        Ok(in_regions(&self.data.cytobands, regions))
    }

    fn get_all_chromosome_names(&self) -> DbResult<Vec<String>> {
        Ok(self
            .data
            .cytobands
            .iter()
            .map(|band| band.chromosome.clone())
            .unique()
            .collect())
    }
}

impl GenomeSequenceDbAdaptor for MemoryDb {
    fn get_all_by_region_list(
        &self,
        regions: &[Region],
        strand: i8,
    ) -> DbResult<Vec<Option<GenomeSequence>>> {
        Ok(regions
            .iter()
            .map(|region| {
                let chunk = self.data.sequences.iter().find(|chunk| {
                    chunk.chromosome == region.chromosome
                        && (region.is_whole()
                            || (chunk.start <= region.start && region.end <= chunk.end))
                })?;
                let (start, end) = if region.is_whole() {
                    (chunk.start, chunk.end)
                } else {
                    (region.start, region.end)
                };
                let from = usize::try_from(start - chunk.start).ok()?;
                let to = usize::try_from(end - chunk.start + 1).ok()?;
                let forward = chunk.sequence.get(from..to)?;
                let sequence = if strand < 0 {
                    reverse_complement(forward)
                } else {
                    forward.to_string()
                };
                Some(GenomeSequence {
                    chromosome: region.chromosome.clone(),
                    start,
                    end,
                    strand: if strand < 0 { -1 } else { 1 },
                    sequence,
                })
            })
            .collect())
    }
}

impl TfbsDbAdaptor for MemoryDb {
    fn get_all_by_tf_name_list(&self, names: &[String]) -> DbResult<Vec<Vec<Tfbs>>> {
        Ok(filter_each(&self.data.tfbs, names, |tfbs, name| {
            eq(&tfbs.tf_name, name)
        }))
    }

    fn get_all_by_target_gene_name_list(&self, names: &[String]) -> DbResult<Vec<Vec<Tfbs>>> {
        Ok(filter_each(&self.data.tfbs, names, |tfbs, name| {
            eq(&tfbs.target_gene_name, name)
        }))
    }

    fn get_all_pwm_by_tf_name_list(&self, names: &[String]) -> DbResult<Vec<Vec<Pwm>>> {
        Ok(filter_each(&self.data.pwms, names, |pwm, name| {
            eq(&pwm.tf_name, name)
        }))
    }

    fn get_all_by_region_list(&self, regions: &[Region]) -> DbResult<Vec<Vec<Tfbs>>> {
        Ok(in_regions(&self.data.tfbs, regions))
    }

    fn get_all_annotation(&self, cell_types: &[String]) -> DbResult<Vec<(String, String)>> {
        Ok(self
            .data
            .tfbs
            .iter()
            .filter(|tfbs| passes(cell_types, &tfbs.cell_type))
            .map(|tfbs| (tfbs.tf_name.clone(), tfbs.cell_type.clone()))
            .unique()
            .sorted()
            .collect())
    }

    fn get_all_interval_frequencies(
        &self,
        region: &Region,
        interval: u64,
    ) -> DbResult<Vec<IntervalFeatureFrequency>> {
        interval_frequencies(&self.data.tfbs, region, interval)
    }
}

impl MirnaDbAdaptor for MemoryDb {
    fn get_all_mirna_genes_by_name_list(
        &self,
        names: &[String],
    ) -> DbResult<Vec<Option<MirnaGene>>> {
        Ok(Self::lookup_each(
            &self.data.mirna_genes,
            &self.mirna_gene_index,
            names,
        ))
    }

    fn get_all_mirna_matures_by_name_list(
        &self,
        names: &[String],
    ) -> DbResult<Vec<Option<MirnaMature>>> {
        Ok(Self::lookup_each(
            &self.data.mirna_matures,
            &self.mirna_mature_index,
            names,
        ))
    }

    fn get_all_mirna_genes_by_mirna_mature_list(
        &self,
        names: &[String],
    ) -> DbResult<Vec<Vec<MirnaGene>>> {
        Ok(filter_each(&self.data.mirna_genes, names, |gene, name| {
            contains(&gene.mature_ids, name)
        }))
    }

    fn get_all_mirna_targets_by_mirna_gene_list(
        &self,
        names: &[String],
    ) -> DbResult<Vec<Vec<MirnaTarget>>> {
        Ok(names
            .iter()
            .map(|name| {
                let family = self.mirna_family(name);
                self.data
                    .mirna_targets
                    .iter()
                    .filter(|t| contains(&family, &t.mirbase_id))
                    .cloned()
                    .collect()
            })
            .collect())
    }

    fn get_all_mirna_targets_by_mirna_mature_list(
        &self,
        names: &[String],
        sources: &[String],
    ) -> DbResult<Vec<Vec<MirnaTarget>>> {
        Ok(filter_each(&self.data.mirna_targets, names, |t, name| {
            eq(&t.mirbase_id, name) && passes(sources, &t.source)
        }))
    }

    fn get_all_mirna_targets_by_gene_name_list(
        &self,
        names: &[String],
    ) -> DbResult<Vec<Vec<MirnaTarget>>> {
        Ok(filter_each(&self.data.mirna_targets, names, |t, name| {
            eq(&t.gene_target_name, name)
        }))
    }

    fn get_all_mirna_diseases_by_mirna_gene_list(
        &self,
        names: &[String],
    ) -> DbResult<Vec<Vec<MirnaDisease>>> {
        Ok(names
            .iter()
            .map(|name| {
                let family = self.mirna_family(name);
                self.data
                    .mirna_diseases
                    .iter()
                    .filter(|d| contains(&family, &d.mirbase_id))
                    .cloned()
                    .collect()
            })
            .collect())
    }

    fn get_all_mirna_diseases_by_mirna_mature_list(
        &self,
        names: &[String],
    ) -> DbResult<Vec<Vec<MirnaDisease>>> {
        Ok(filter_each(&self.data.mirna_diseases, names, |d, name| {
            eq(&d.mirbase_id, name)
        }))
    }

    fn get_all_mirna_targets_by_region_list(
        &self,
        regions: &[Region],
    ) -> DbResult<Vec<Vec<MirnaTarget>>> {
        Ok(in_regions(&self.data.mirna_targets, regions))
    }

    fn get_all_annotation(&self, sources: &[String]) -> DbResult<Vec<(String, String)>> {
        Ok(self
            .data
            .mirna_targets
            .iter()
            .filter(|t| passes(sources, &t.source))
            .map(|t| (t.mirbase_id.clone(), t.source.clone()))
            .unique()
            .sorted()
            .collect())
    }

    fn get_all_mirna_target_interval_frequencies(
        &self,
        region: &Region,
        interval: u64,
    ) -> DbResult<Vec<IntervalFeatureFrequency>> {
        interval_frequencies(&self.data.mirna_targets, region, interval)
    }
}

impl MutationDbAdaptor for MemoryDb {
    fn get_all_by_gene_name_list(&self, names: &[String]) -> DbResult<Vec<Vec<Mutation>>> {
        Ok(filter_each(&self.data.mutations, names, |m, name| {
            eq(&m.gene_name, name)
        }))
    }

    fn get_all_by_transcript_id_list(&self, ids: &[String]) -> DbResult<Vec<Vec<Mutation>>> {
        Ok(filter_each(&self.data.mutations, ids, |m, id| {
            eq(&m.ensembl_transcript, id)
        }))
    }

    fn get_all_by_region_list(&self, regions: &[Region]) -> DbResult<Vec<Vec<Mutation>>> {
        Ok(in_regions(&self.data.mutations, regions))
    }

    fn get_all_interval_frequencies(
        &self,
        region: &Region,
        interval: u64,
    ) -> DbResult<Vec<IntervalFeatureFrequency>> {
        interval_frequencies(&self.data.mutations, region, interval)
    }
}

impl RegulatoryRegionDbAdaptor for MemoryDb {
    fn get_all_by_region_list(
        &self,
        regions: &[Region],
        types: &[String],
    ) -> DbResult<Vec<Vec<RegulatoryRegion>>> {
        Ok(in_regions(&self.data.regulatory_regions, regions)
            .into_iter()
            .map(|found| {
                found
                    .into_iter()
                    .filter(|r| passes(types, &r.region_type))
                    .collect()
            })
            .collect())
    }

    fn get_all_interval_frequencies(
        &self,
        region: &Region,
        interval: u64,
    ) -> DbResult<Vec<IntervalFeatureFrequency>> {
        interval_frequencies(&self.data.regulatory_regions, region, interval)
    }
}

impl ConservedRegionDbAdaptor for MemoryDb {
    fn get_all_by_region_list(&self, regions: &[Region]) -> DbResult<Vec<Vec<ConservedRegion>>> {
        Ok(in_regions(&self.data.conserved_regions, regions))
    }

    fn get_all_interval_frequencies(
        &self,
        region: &Region,
        interval: u64,
    ) -> DbResult<Vec<IntervalFeatureFrequency>> {
        interval_frequencies(&self.data.conserved_regions, region, interval)
    }
}

impl CpGIslandDbAdaptor for MemoryDb {
    fn get_all_by_region_list(&self, regions: &[Region]) -> DbResult<Vec<Vec<CpGIsland>>> {
        Ok(in_regions(&self.data.cpg_islands, regions))
    }

    fn get_all_interval_frequencies(
        &self,
        region: &Region,
        interval: u64,
    ) -> DbResult<Vec<IntervalFeatureFrequency>> {
        interval_frequencies(&self.data.cpg_islands, region, interval)
    }
}

impl StructuralVariationDbAdaptor for MemoryDb {
    fn get_all_by_region_list(
        &self,
        regions: &[Region],
    ) -> DbResult<Vec<Vec<StructuralVariation>>> {
        Ok(in_regions(&self.data.structural_variations, regions))
    }

    fn get_all_interval_frequencies(
        &self,
        region: &Region,
        interval: u64,
    ) -> DbResult<Vec<IntervalFeatureFrequency>> {
        interval_frequencies(&self.data.structural_variations, region, interval)
    }
}

impl PathwayDbAdaptor for MemoryDb {
    fn get_all(&self, search: Option<&str>, top_level_only: bool) -> DbResult<Vec<Pathway>> {
        let search = search.map(str::to_lowercase);
        Ok(self
            .data
            .pathways
            .iter()
            .filter(|p| !top_level_only || p.parent.is_none())
            .filter(|p| match search.as_deref() {
                Some(search) => p.name.to_lowercase().contains(search),
                None => true,
            })
            .cloned()
            .collect())
    }

    fn get_by_id(&self, id: &str) -> DbResult<Option<Pathway>> {
        Ok(self
            .data
            .pathways
            .iter()
            .find(|p| eq(&p.id, id) || eq(&p.name, id))
            .cloned())
    }
}

/// Factory over in-memory databases keyed by `(species, version)`.
#[derive(Default, derivative::Derivative)]
#[derivative(Debug)]
pub struct MemoryDbAdaptorFactory {
    dbs: HashMap<(String, String), Arc<MemoryDb>>,
}

impl MemoryDbAdaptorFactory {
    /// Register `db` for the given species and version.
    pub fn insert(&mut self, species: &str, version: &str, db: MemoryDb) {
        self.dbs
            .insert((species.to_string(), version.to_string()), Arc::new(db));
    }

    /// Number of loaded databases.
    pub fn len(&self) -> usize {
        self.dbs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dbs.is_empty()
    }

    /// Load all `<version>/<species>.json` documents below `path`.
    pub fn load_dir(path: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        let path = path.as_ref();
        let mut result = Self::default();

        let version_dirs = std::fs::read_dir(path)
            .map_err(|e| anyhow::anyhow!("could not read {}: {}", path.display(), e))?;
        for version_dir in version_dirs {
            let version_dir = version_dir?.path();
            if !version_dir.is_dir() {
                continue;
            }
            let Some(version) = version_dir.file_name().and_then(|s| s.to_str()) else {
                continue;
            };

            for entry in std::fs::read_dir(&version_dir)? {
                let entry = entry?.path();
                if entry.extension().and_then(|s| s.to_str()) != Some("json") {
                    continue;
                }
                let Some(species) = entry.file_stem().and_then(|s| s.to_str()) else {
                    continue;
                };

                tracing::info!("  - loading {} ({} / {})", entry.display(), version, species);
                let db = MemoryDb::from_path(&entry)?;
                tracing::debug!("    {} genes", db.gene_count);
                result.insert(species, version, db);
            }
        }

        Ok(result)
    }

    fn get(&self, species: &str, version: &str) -> DbResult<Arc<MemoryDb>> {
        self.dbs
            .get(&(species.to_string(), version.to_string()))
            .cloned()
            .ok_or_else(|| DbError::Unavailable {
                species: species.to_string(),
                version: version.to_string(),
            })
    }
}

/// Implement the factory methods by coercing the shared `MemoryDb`.
macro_rules! factory_methods {
    ($($name:ident => $adaptor:ident),+ $(,)?) => {
        $(
            fn $name(&self, species: &str, version: &str) -> DbResult<Arc<dyn $adaptor>> {
                Ok(self.get(species, version)? as Arc<dyn $adaptor>)
            }
        )+
    };
}

impl DbAdaptorFactory for MemoryDbAdaptorFactory {
    factory_methods!(
        gene => GeneDbAdaptor,
        transcript => TranscriptDbAdaptor,
        exon => ExonDbAdaptor,
        snp => SnpDbAdaptor,
        protein => ProteinDbAdaptor,
        xref => XrefDbAdaptor,
        cytoband => CytobandDbAdaptor,
        genome_sequence => GenomeSequenceDbAdaptor,
        tfbs => TfbsDbAdaptor,
        mirna => MirnaDbAdaptor,
        mutation => MutationDbAdaptor,
        regulatory_region => RegulatoryRegionDbAdaptor,
        conserved_region => ConservedRegionDbAdaptor,
        cpg_island => CpGIslandDbAdaptor,
        structural_variation => StructuralVariationDbAdaptor,
        pathway => PathwayDbAdaptor,
    );
}

#[cfg(test)]
pub(crate) mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    pub(crate) const TEST_DB_DIR: &str = "tests/data/db";

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn db() -> Result<MemoryDb, anyhow::Error> {
        MemoryDb::from_path(format!("{}/v3/hsapiens.json", TEST_DB_DIR))
    }

    #[test]
    fn load_dir() -> Result<(), anyhow::Error> {
        let factory = MemoryDbAdaptorFactory::load_dir(TEST_DB_DIR)?;

        assert_eq!(factory.len(), 1);
        assert!(factory.gene("hsapiens", "v3").is_ok());
        assert!(matches!(
            factory.gene("hsapiens", "v4"),
            Err(DbError::Unavailable { .. })
        ));

        Ok(())
    }

    #[test]
    fn genes_by_id_keep_positions() -> Result<(), anyhow::Error> {
        let db = db()?;
        let genes = GeneDbAdaptor::get_all_by_id_list(
            &db,
            &ids(&["brca2", "NOTAGENE", "ENSG00000141510"]),
        )?;

        assert_eq!(genes.len(), 3);
        assert_eq!(genes[0].as_ref().map(|g| g.stable_id.as_str()), Some("ENSG00000139618"));
        assert!(genes[1].is_none());
        assert_eq!(genes[2].as_ref().map(|g| g.external_name.as_str()), Some("TP53"));

        Ok(())
    }

    #[test]
    fn transcript_relations() -> Result<(), anyhow::Error> {
        let db = db()?;

        let genes = GeneDbAdaptor::get_all_by_transcript_id_list(&db, &ids(&["ENST00000269305"]))?;
        assert_eq!(genes[0].as_ref().map(|g| g.external_name.as_str()), Some("TP53"));

        let txs = TranscriptDbAdaptor::get_all_by_gene_id_list(&db, &ids(&["BRCA2", "NOPE"]))?;
        assert_eq!(txs[0].len(), 1);
        assert!(txs[1].is_empty());

        let txs = TranscriptDbAdaptor::get_all_by_exon_id_list(&db, &ids(&["ENSE00001484009"]))?;
        assert_eq!(txs[0][0].stable_id, "ENST00000380152");

        Ok(())
    }

    #[test]
    fn transcript_sequences() -> Result<(), anyhow::Error> {
        let db = db()?;
        let seqs = TranscriptDbAdaptor::get_all_sequences_by_id_list(
            &db,
            &ids(&["ENST00000380152", "ENST00000269305", "ENST0"]),
        )?;

        assert_eq!(
            seqs,
            vec![Some("ACGTGGCC".to_string()), Some("CGTT".to_string()), None]
        );

        Ok(())
    }

    #[test]
    fn exons_sorted_by_start() -> Result<(), anyhow::Error> {
        let db = db()?;
        let exons = ExonDbAdaptor::get_all_by_transcript_id_list(&db, &ids(&["ENST00000380152"]))?;

        assert_eq!(
            exons[0]
                .iter()
                .map(|e| e.stable_id.as_str())
                .collect::<Vec<_>>(),
            vec!["ENSE00001484009", "ENSE00001184784"]
        );

        let by_snp = ExonDbAdaptor::get_all_by_snp_id_list(&db, &ids(&["rs80357713"]))?;
        assert_eq!(by_snp[0][0].stable_id, "ENSE00001184784");

        Ok(())
    }

    #[test]
    fn snp_consequence_types() -> Result<(), anyhow::Error> {
        let db = db()?;
        let cts = SnpDbAdaptor::get_all_consequence_types_by_id_list(
            &db,
            &ids(&["rs80357713", "rs28934578", "rs0"]),
        )?;

        assert_eq!(cts.iter().map(Vec::len).collect::<Vec<_>>(), vec![1, 0, 0]);
        assert_eq!(cts[0][0].so_term, "missense_variant");

        Ok(())
    }

    #[test]
    fn region_queries() -> Result<(), anyhow::Error> {
        let db = db()?;
        let regions = Region::parse_list("13:32889000-32890000,17,1")?;

        let genes = GeneDbAdaptor::get_all_by_region_list(&db, &regions)?;
        assert_eq!(genes.iter().map(Vec::len).collect::<Vec<_>>(), vec![1, 1, 0]);

        let histones = RegulatoryRegionDbAdaptor::get_all_by_region_list(
            &db,
            &regions[..1],
            &ids(&["histone"]),
        )?;
        assert_eq!(histones[0].len(), 1);
        assert_eq!(histones[0][0].name, "H3K4me3");

        Ok(())
    }

    #[test]
    fn genome_sequence() -> Result<(), anyhow::Error> {
        let db = db()?;
        let regions = Region::parse_list("13:32889601-32889606,13:1-10")?;

        let forward = GenomeSequenceDbAdaptor::get_all_by_region_list(&db, &regions, 1)?;
        assert_eq!(forward[0].as_ref().map(|s| s.sequence.as_str()), Some("AAAACC"));
        assert!(forward[1].is_none());

        let reverse = GenomeSequenceDbAdaptor::get_all_by_region_list(&db, &regions, -1)?;
        assert_eq!(reverse[0].as_ref().map(|s| s.sequence.as_str()), Some("GGTTTT"));
        assert_eq!(reverse[0].as_ref().map(|s| s.strand), Some(-1));

        Ok(())
    }

    #[test]
    fn protein_interactions_by_source() -> Result<(), anyhow::Error> {
        let db = db()?;

        let all = db.get_all_interactions_by_id_list(&ids(&["P53_HUMAN"]), &[])?;
        assert_eq!(all[0].len(), 2);

        let reactome = db.get_all_interactions_by_id_list(&ids(&["P04637"]), &ids(&["reactome"]))?;
        assert_eq!(reactome[0].len(), 1);
        assert_eq!(reactome[0][0].partner_accession, "Q00987");

        let brca2 = db.get_all_interactions_by_id_list(&ids(&["P51587"]), &[])?;
        assert_eq!(brca2[0].len(), 1);

        Ok(())
    }

    #[test]
    fn xrefs_by_db_name() -> Result<(), anyhow::Error> {
        let db = db()?;

        let go = db.get_all_by_db_name_list(&ids(&["ENST00000380152"]), &ids(&["go"]))?;
        assert_eq!(go[0].len(), 1);
        assert_eq!(go[0][0].id, "GO:0006281");

        let all = db.get_all_by_db_name_list(&ids(&["ENST00000380152"]), &[])?;
        assert_eq!(all[0].len(), 2);

        Ok(())
    }

    #[test]
    fn mirna_relations() -> Result<(), anyhow::Error> {
        let db = db()?;

        let genes = GeneDbAdaptor::get_all_by_mirna_mature_list(&db, &ids(&["hsa-let-7a-5p"]))?;
        assert_eq!(genes[0][0].external_name, "BRCA2");

        let targets =
            GeneDbAdaptor::get_all_targets_by_mirna_mature_list(&db, &ids(&["hsa-let-7a-5p"]))?;
        assert_eq!(
            targets[0]
                .iter()
                .map(|g| g.external_name.as_str())
                .collect::<Vec<_>>(),
            vec!["TP53", "BRCA2"]
        );

        let by_gene = db.get_all_mirna_targets_by_mirna_gene_list(&ids(&["hsa-let-7a-1"]))?;
        assert_eq!(by_gene[0].len(), 2);

        let tarbase = db.get_all_mirna_targets_by_mirna_mature_list(
            &ids(&["hsa-let-7a-5p"]),
            &ids(&["TarBase"]),
        )?;
        assert_eq!(tarbase[0].len(), 1);

        let diseases = db.get_all_mirna_diseases_by_mirna_gene_list(&ids(&["MI0000060"]))?;
        assert_eq!(diseases[0][0].disease_name, "lung cancer");

        Ok(())
    }

    #[test]
    fn annotations() -> Result<(), anyhow::Error> {
        let db = db()?;

        assert_eq!(
            TfbsDbAdaptor::get_all_annotation(&db, &[])?,
            vec![
                ("E2F1".to_string(), "HeLa".to_string()),
                ("TP53".to_string(), "K562".to_string()),
            ]
        );
        assert_eq!(
            TfbsDbAdaptor::get_all_annotation(&db, &ids(&["k562"]))?,
            vec![("TP53".to_string(), "K562".to_string())]
        );
        assert_eq!(MirnaDbAdaptor::get_all_annotation(&db, &[])?.len(), 2);

        Ok(())
    }

    #[test]
    fn pathways() -> Result<(), anyhow::Error> {
        let db = db()?;

        assert_eq!(db.get_all(None, false)?.len(), 2);
        assert_eq!(db.get_all(None, true)?.len(), 1);
        assert_eq!(db.get_all(Some("homologous"), false)?[0].id, "REACT_1913");
        assert_eq!(
            db.get_by_id("dna repair")?.map(|p| p.id),
            Some("REACT_216".to_string())
        );
        assert!(db.get_by_id("REACT_0")?.is_none());

        Ok(())
    }

    #[test]
    fn histogram_bins() -> Result<(), anyhow::Error> {
        let items = vec![
            Exon {
                chromosome: "1".into(),
                start: 10,
                end: 20,
                ..Default::default()
            },
            Exon {
                chromosome: "1".into(),
                start: 15,
                end: 35,
                ..Default::default()
            },
        ];
        let bins = interval_frequencies(&items, &Region::new("1", 1, 40), 10)?;

        assert_eq!(
            bins.iter().map(|b| (b.start, b.end)).collect::<Vec<_>>(),
            vec![(1, 10), (11, 20), (21, 30), (31, 40)]
        );
        assert_eq!(
            bins.iter().map(|b| b.absolute).collect::<Vec<_>>(),
            vec![1, 2, 1, 1]
        );
        assert_eq!(bins[1].value, 1.0);
        assert_eq!(bins[0].value, 0.5);

        let whole = interval_frequencies(&items, &Region::whole("1"), 20)?;
        assert_eq!(whole.last().map(|b| b.end), Some(35));

        assert!(interval_frequencies(&items, &Region::whole("1"), 0).is_err());

        Ok(())
    }

    #[rstest::rstest]
    #[case(1, 10_000, 1, true)]
    #[case(1, 10_001, 1, false)]
    #[case(1, 1_000_000_000, 1, false)]
    #[case(1, 1_000_000_000, 100_000, true)]
    fn histogram_bin_count_is_bounded(
        #[case] start: u64,
        #[case] end: u64,
        #[case] interval: u64,
        #[case] accepted: bool,
    ) {
        let items = vec![Exon {
            chromosome: "1".into(),
            start: 5,
            end: 250_000,
            ..Default::default()
        }];

        let result = interval_frequencies(&items, &Region::new("1", start, end), interval);

        assert_eq!(result.is_ok(), accepted);
        if let Ok(bins) = result {
            assert!(bins.len() as u64 <= MAX_HISTOGRAM_BINS);
            assert_eq!(bins.iter().map(|b| b.absolute).max(), Some(1));
        }
    }

    #[rstest::rstest]
    #[case("ACGT", "ACGT")]
    #[case("AAAC", "GTTT")]
    #[case("acgN", "Ncgt")]
    fn reverse_complement(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(super::reverse_complement(input), expected);
    }
}
