//! Endpoints below `/{version}/{species}/feature/exon`.

use actix_web::{
    get,
    web::{self, Data, Path},
    HttpRequest, HttpResponse,
};

use crate::common::split_ids;
use crate::reference::headers::HeaderTag;

use super::{usage, CustomError, IdsPath, RequestContext, WebServerData};

#[allow(clippy::unused_async)]
#[get("/{version}/{species}/feature/exon/{ids}/info")]
async fn handle_info(
    data: Data<WebServerData>,
    path: IdsPath,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species, ids) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    let exons = ctx.query(|db, species, version| {
        db.exon(species, version)?
            .get_all_by_id_list(&split_ids(&ids))
    })?;
    Ok(ctx
        .renderer()
        .with_query(&ids)
        .render(&exons, Some(HeaderTag::Exon)))
}

/// Forward strand sequences of the exons.
#[allow(clippy::unused_async)]
#[get("/{version}/{species}/feature/exon/{ids}/sequence")]
async fn handle_sequence(
    data: Data<WebServerData>,
    path: IdsPath,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species, ids) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    let sequences = ctx.query(|db, species, version| {
        db.exon(species, version)?
            .get_all_sequences_by_id_list(&split_ids(&ids))
    })?;
    Ok(ctx.renderer().with_query(&ids).render(&sequences, None))
}

#[allow(clippy::unused_async)]
#[get("/{version}/{species}/feature/exon/{ids}/region")]
async fn handle_region(
    data: Data<WebServerData>,
    path: IdsPath,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species, ids) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    let regions = ctx.query(|db, species, version| {
        db.exon(species, version)?
            .get_all_regions_by_id_list(&split_ids(&ids))
    })?;
    Ok(ctx.renderer().with_query(&ids).render(&regions, None))
}

#[allow(clippy::unused_async)]
#[get("/{version}/{species}/feature/exon/{ids}/transcript")]
async fn handle_transcript(
    data: Data<WebServerData>,
    path: IdsPath,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species, ids) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    let transcripts = ctx.query(|db, species, version| {
        db.transcript(species, version)?
            .get_all_by_exon_id_list(&split_ids(&ids))
    })?;
    Ok(ctx
        .renderer()
        .with_query(&ids)
        .render(&transcripts, Some(HeaderTag::Transcript)))
}

/// Exons overlapping the given SNPs.
#[allow(clippy::unused_async)]
#[get("/{version}/{species}/feature/exon/{snps}/bysnp")]
async fn handle_by_snp(
    data: Data<WebServerData>,
    path: IdsPath,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species, snps) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    let exons = ctx.query(|db, species, version| {
        db.exon(species, version)?
            .get_all_by_snp_id_list(&split_ids(&snps))
    })?;
    Ok(ctx
        .renderer()
        .with_query(&snps)
        .render(&exons, Some(HeaderTag::Exon)))
}

#[allow(clippy::unused_async)]
#[get("/{version}/{species}/feature/exon/help")]
async fn handle_help(
    data: Data<WebServerData>,
    path: Path<(String, String)>,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    Ok(ctx.renderer().render_text(usage(&[
        "/{ids}/info",
        "/{ids}/sequence",
        "/{ids}/region",
        "/{ids}/transcript",
        "/{snps}/bysnp",
    ])))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(handle_help)
        .service(handle_info)
        .service(handle_sequence)
        .service(handle_region)
        .service(handle_transcript)
        .service(handle_by_snp);
}
