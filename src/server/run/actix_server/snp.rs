//! Endpoints below `/{version}/{species}/feature/snp`.

use actix_web::{
    get,
    web::{self, Data, Path},
    HttpRequest, HttpResponse,
};

use crate::common::split_ids;
use crate::reference::headers::HeaderTag;

use super::{usage, CustomError, IdsPath, RequestContext, WebServerData};

#[allow(clippy::unused_async)]
#[get("/{version}/{species}/feature/snp/{ids}/info")]
async fn handle_info(
    data: Data<WebServerData>,
    path: IdsPath,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species, ids) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    let snps = ctx.query(|db, species, version| {
        db.snp(species, version)?
            .get_all_by_id_list(&split_ids(&ids))
    })?;
    Ok(ctx
        .renderer()
        .with_query(&ids)
        .render(&snps, Some(HeaderTag::Snp)))
}

#[allow(clippy::unused_async)]
#[get("/{version}/{species}/feature/snp/{ids}/consequence_type")]
async fn handle_consequence_type(
    data: Data<WebServerData>,
    path: IdsPath,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species, ids) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    let consequence_types = ctx.query(|db, species, version| {
        db.snp(species, version)?
            .get_all_consequence_types_by_id_list(&split_ids(&ids))
    })?;
    Ok(ctx
        .renderer()
        .with_query(&ids)
        .render(&consequence_types, Some(HeaderTag::SnpConsequenceType)))
}

#[allow(clippy::unused_async)]
#[get("/{version}/{species}/feature/snp/help")]
async fn handle_help(
    data: Data<WebServerData>,
    path: Path<(String, String)>,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    Ok(ctx
        .renderer()
        .render_text(usage(&["/{ids}/info", "/{ids}/consequence_type"])))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(handle_help).service(handle_info).service(handle_consequence_type);
}
