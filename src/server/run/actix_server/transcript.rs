//! Endpoints below `/{version}/{species}/feature/transcript`.

use actix_web::{
    get,
    web::{self, Data, Path},
    HttpRequest, HttpResponse,
};
use itertools::izip;

use crate::common::split_ids;
use crate::db::model::{
    Exon, Gene, MirnaTarget, Mutation, ProteinFeature, Snp, Tfbs, Transcript, Xref,
};
use crate::db::{DbAdaptorFactory, DbResult};
use crate::reference::headers::HeaderTag;
use crate::server::response::render::{json_text, TextContext, TextRecord};

use super::{usage, CustomError, IdsPath, RequestContext, WebServerData};

/// A transcript together with everything known about it.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptFullInfo {
    #[serde(flatten)]
    pub transcript: Transcript,
    pub gene: Option<Gene>,
    pub exons: Vec<Exon>,
    pub snps: Vec<Snp>,
    pub mutations: Vec<Mutation>,
    /// GO annotation.
    pub go: Vec<Xref>,
    /// InterPro domains.
    pub interpro: Vec<Xref>,
    /// Binding sites targeting the transcript's gene.
    pub tfbs: Vec<Tfbs>,
    /// miRNA target sites in the transcript's gene.
    pub mirna_targets: Vec<MirnaTarget>,
    pub protein_features: Vec<ProteinFeature>,
    /// Reactome pathways.
    pub reactome: Vec<Xref>,
}

/// The text form is the JSON document.
impl TextRecord for TranscriptFullInfo {
    fn to_text(&self, ctx: &TextContext<'_>) -> String {
        json_text(self, ctx)
    }
}

/// Assemble full information for each of `ids`, `None` for unknown transcripts.
fn full_info(
    db: &dyn DbAdaptorFactory,
    species: &str,
    version: &str,
    ids: &[String],
) -> DbResult<Vec<Option<TranscriptFullInfo>>> {
    let xref_db = |db_name: &str| -> DbResult<Vec<Vec<Xref>>> {
        db.xref(species, version)?
            .get_all_by_db_name_list(ids, &[db_name.to_string()])
    };

    let transcripts = db.transcript(species, version)?.get_all_by_id_list(ids)?;
    let genes = db.gene(species, version)?.get_all_by_transcript_id_list(ids)?;
    let gene_names = genes
        .iter()
        .map(|gene| {
            gene.as_ref()
                .map(|gene| gene.external_name.clone())
                .unwrap_or_default()
        })
        .collect::<Vec<_>>();

    let exons = db.exon(species, version)?.get_all_by_transcript_id_list(ids)?;
    let snps = db.snp(species, version)?.get_all_by_transcript_id_list(ids)?;
    let mutations = db
        .mutation(species, version)?
        .get_all_by_transcript_id_list(ids)?;
    let go = xref_db("go")?;
    let interpro = xref_db("interpro")?;
    let reactome = xref_db("reactome")?;
    let tfbs = db
        .tfbs(species, version)?
        .get_all_by_target_gene_name_list(&gene_names)?;
    let mirna_targets = db
        .mirna(species, version)?
        .get_all_mirna_targets_by_gene_name_list(&gene_names)?;
    let protein_features = db
        .protein(species, version)?
        .get_all_features_by_transcript_id_list(ids)?;

    Ok(izip!(
        transcripts,
        genes,
        exons,
        snps,
        mutations,
        go,
        interpro,
        tfbs,
        mirna_targets,
        protein_features,
        reactome
    )
    .map(
        |(
            transcript,
            gene,
            exons,
            snps,
            mutations,
            go,
            interpro,
            tfbs,
            mirna_targets,
            protein_features,
            reactome,
        )| {
            transcript.map(|transcript| TranscriptFullInfo {
                transcript,
                gene,
                exons,
                snps,
                mutations,
                go,
                interpro,
                tfbs,
                mirna_targets,
                protein_features,
                reactome,
            })
        },
    )
    .collect())
}

#[allow(clippy::unused_async)]
#[get("/{version}/{species}/feature/transcript/{ids}/info")]
async fn handle_info(
    data: Data<WebServerData>,
    path: IdsPath,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species, ids) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    let transcripts = ctx.query(|db, species, version| {
        db.transcript(species, version)?
            .get_all_by_id_list(&split_ids(&ids))
    })?;
    Ok(ctx
        .renderer()
        .with_query(&ids)
        .render(&transcripts, Some(HeaderTag::Transcript)))
}

#[allow(clippy::unused_async)]
#[get("/{version}/{species}/feature/transcript/{ids}/fullinfo")]
async fn handle_fullinfo(
    data: Data<WebServerData>,
    path: IdsPath,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species, ids) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    let infos =
        ctx.query(|db, species, version| full_info(db, species, version, &split_ids(&ids)))?;
    Ok(ctx.renderer().with_query(&ids).render(&infos, None))
}

#[allow(clippy::unused_async)]
#[get("/{version}/{species}/feature/transcript/{ids}/gene")]
async fn handle_gene(
    data: Data<WebServerData>,
    path: IdsPath,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species, ids) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    let genes = ctx.query(|db, species, version| {
        db.gene(species, version)?
            .get_all_by_transcript_id_list(&split_ids(&ids))
    })?;
    Ok(ctx
        .renderer()
        .with_query(&ids)
        .render(&genes, Some(HeaderTag::Gene)))
}

#[allow(clippy::unused_async)]
#[get("/{version}/{species}/feature/transcript/{ids}/exon")]
async fn handle_exon(
    data: Data<WebServerData>,
    path: IdsPath,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species, ids) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    let exons = ctx.query(|db, species, version| {
        db.exon(species, version)?
            .get_all_by_transcript_id_list(&split_ids(&ids))
    })?;
    Ok(ctx
        .renderer()
        .with_query(&ids)
        .render(&exons, Some(HeaderTag::Exon)))
}

/// Spliced sequences, reverse complemented for the minus strand.
#[allow(clippy::unused_async)]
#[get("/{version}/{species}/feature/transcript/{ids}/sequence")]
async fn handle_sequence(
    data: Data<WebServerData>,
    path: IdsPath,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species, ids) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    let sequences = ctx.query(|db, species, version| {
        db.transcript(species, version)?
            .get_all_sequences_by_id_list(&split_ids(&ids))
    })?;
    Ok(ctx.renderer().with_query(&ids).render(&sequences, None))
}

#[allow(clippy::unused_async)]
#[get("/{version}/{species}/feature/transcript/{ids}/region")]
async fn handle_region(
    data: Data<WebServerData>,
    path: IdsPath,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species, ids) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    let regions = ctx.query(|db, species, version| {
        db.transcript(species, version)?
            .get_all_regions_by_id_list(&split_ids(&ids))
    })?;
    Ok(ctx.renderer().with_query(&ids).render(&regions, None))
}

#[allow(clippy::unused_async)]
#[get("/{version}/{species}/feature/transcript/{ids}/snp")]
async fn handle_snp(
    data: Data<WebServerData>,
    path: IdsPath,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species, ids) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    let snps = ctx.query(|db, species, version| {
        db.snp(species, version)?
            .get_all_by_transcript_id_list(&split_ids(&ids))
    })?;
    Ok(ctx
        .renderer()
        .with_query(&ids)
        .render(&snps, Some(HeaderTag::Snp)))
}

#[allow(clippy::unused_async)]
#[get("/{version}/{species}/feature/transcript/{ids}/mutation")]
async fn handle_mutation(
    data: Data<WebServerData>,
    path: IdsPath,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species, ids) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    let mutations = ctx.query(|db, species, version| {
        db.mutation(species, version)?
            .get_all_by_transcript_id_list(&split_ids(&ids))
    })?;
    Ok(ctx
        .renderer()
        .with_query(&ids)
        .render(&mutations, Some(HeaderTag::Mutation)))
}

#[allow(clippy::unused_async)]
#[get("/{version}/{species}/feature/transcript/{ids}/protein_feature")]
async fn handle_protein_feature(
    data: Data<WebServerData>,
    path: IdsPath,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species, ids) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    let features = ctx.query(|db, species, version| {
        db.protein(species, version)?
            .get_all_features_by_transcript_id_list(&split_ids(&ids))
    })?;
    Ok(ctx
        .renderer()
        .with_query(&ids)
        .render(&features, Some(HeaderTag::ProteinFeature)))
}

#[allow(clippy::unused_async)]
#[get("/{version}/{species}/feature/transcript/help")]
async fn handle_help(
    data: Data<WebServerData>,
    path: Path<(String, String)>,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    Ok(ctx.renderer().render_text(usage(&[
        "/{ids}/info",
        "/{ids}/fullinfo",
        "/{ids}/gene",
        "/{ids}/exon",
        "/{ids}/sequence",
        "/{ids}/region",
        "/{ids}/snp",
        "/{ids}/mutation",
        "/{ids}/protein_feature",
    ])))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(handle_help)
        .service(handle_info)
        .service(handle_fullinfo)
        .service(handle_gene)
        .service(handle_exon)
        .service(handle_sequence)
        .service(handle_region)
        .service(handle_snp)
        .service(handle_mutation)
        .service(handle_protein_feature);
}
