//! Endpoints below `/{version}/{species}/genomic/position`.

use actix_web::{
    get,
    web::{self, Data, Path},
    HttpRequest, HttpResponse,
};

use crate::db::region::Position;
use crate::reference::headers::HeaderTag;

use super::{usage, CustomError, IdsPath, RequestContext, WebServerData};

fn parse_positions(ctx: &RequestContext<'_>, positions: &str) -> Result<Vec<Position>, CustomError> {
    Position::parse_list(positions)
        .map_err(|e| ctx.error(anyhow::anyhow!("position not valid: {}", e)))
}

/// Genes overlapping each position.
#[allow(clippy::unused_async)]
#[get("/{version}/{species}/genomic/position/{positions}/gene")]
async fn handle_gene(
    data: Data<WebServerData>,
    path: IdsPath,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species, positions) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    let position_list = parse_positions(&ctx, &positions)?;
    let genes = ctx.query(|db, species, version| {
        db.gene(species, version)?
            .get_all_by_position_list(&position_list)
    })?;
    Ok(ctx
        .renderer()
        .with_query(&positions)
        .render(&genes, Some(HeaderTag::Gene)))
}

#[allow(clippy::unused_async)]
#[get("/{version}/{species}/genomic/position/{positions}/transcript")]
async fn handle_transcript(
    data: Data<WebServerData>,
    path: IdsPath,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species, positions) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    let position_list = parse_positions(&ctx, &positions)?;
    let transcripts = ctx.query(|db, species, version| {
        db.transcript(species, version)?
            .get_all_by_position_list(&position_list)
    })?;
    Ok(ctx
        .renderer()
        .with_query(&positions)
        .render(&transcripts, Some(HeaderTag::Transcript)))
}

#[allow(clippy::unused_async)]
#[get("/{version}/{species}/genomic/position/{positions}/snp")]
async fn handle_snp(
    data: Data<WebServerData>,
    path: IdsPath,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species, positions) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    let position_list = parse_positions(&ctx, &positions)?;
    let snps = ctx.query(|db, species, version| {
        db.snp(species, version)?
            .get_all_by_position_list(&position_list)
    })?;
    Ok(ctx
        .renderer()
        .with_query(&positions)
        .render(&snps, Some(HeaderTag::Snp)))
}

#[allow(clippy::unused_async)]
#[get("/{version}/{species}/genomic/position/help")]
async fn handle_help(
    data: Data<WebServerData>,
    path: Path<(String, String)>,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    Ok(ctx.renderer().render_text(usage(&[
        "/{positions}/gene",
        "/{positions}/transcript",
        "/{positions}/snp",
    ])))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(handle_help)
        .service(handle_gene)
        .service(handle_transcript)
        .service(handle_snp);
}
