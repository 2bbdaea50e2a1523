//! Endpoints below `/{version}/{species}/network/pathway`.

use actix_web::{
    get,
    web::{self, Data, Path},
    HttpRequest, HttpResponse,
};

use crate::db::model::Pathway;
use crate::reference::headers::HeaderTag;
use crate::server::response::params::is_true;

use super::{usage, CustomError, IdsPath, RequestContext, WebServerData};

/// Pathways matching `search`; `subpathways=false` keeps top-level ones only.
#[allow(clippy::unused_async)]
#[get("/{version}/{species}/network/pathway/list")]
async fn handle_list(
    data: Data<WebServerData>,
    path: Path<(String, String)>,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    let top_level_only = ctx
        .param("subpathways")
        .map(|value| !is_true(value))
        .unwrap_or(false);
    let search = ctx.param("search").filter(|value| !value.is_empty());
    let pathways = ctx.query(|db, species, version| {
        db.pathway(species, version)?.get_all(search, top_level_only)
    })?;
    Ok(ctx.renderer().render(&pathways, Some(HeaderTag::Pathway)))
}

/// Look up one pathway by ID or name.
fn pathway(ctx: &RequestContext<'_>, id: &str) -> Result<Option<Pathway>, CustomError> {
    ctx.query(|db, species, version| db.pathway(species, version)?.get_by_id(id))
}

#[allow(clippy::unused_async)]
#[get("/{version}/{species}/network/pathway/{id}/info")]
async fn handle_info(
    data: Data<WebServerData>,
    path: IdsPath,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species, id) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    let found = pathway(&ctx, &id)?;
    Ok(ctx
        .renderer()
        .with_query(&id)
        .render(&[found], Some(HeaderTag::Pathway)))
}

/// Names of the genes taking part in the pathway.
#[allow(clippy::unused_async)]
#[get("/{version}/{species}/network/pathway/{id}/gene")]
async fn handle_gene(
    data: Data<WebServerData>,
    path: IdsPath,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species, id) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    let genes = pathway(&ctx, &id)?.map(|pathway| pathway.genes);
    Ok(ctx.renderer().with_query(&id).render(&[genes], None))
}

/// Accessions of the proteins taking part in the pathway.
#[allow(clippy::unused_async)]
#[get("/{version}/{species}/network/pathway/{id}/protein")]
async fn handle_protein(
    data: Data<WebServerData>,
    path: IdsPath,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species, id) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    let proteins = pathway(&ctx, &id)?.map(|pathway| pathway.proteins);
    Ok(ctx.renderer().with_query(&id).render(&[proteins], None))
}

#[allow(clippy::unused_async)]
#[get("/{version}/{species}/network/pathway/help")]
async fn handle_help(
    data: Data<WebServerData>,
    path: Path<(String, String)>,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    Ok(ctx.renderer().render_text(usage(&[
        "/list?subpathways=&search=",
        "/{id}/info",
        "/{id}/gene",
        "/{id}/protein",
    ])))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(handle_help)
        .service(handle_list)
        .service(handle_info)
        .service(handle_gene)
        .service(handle_protein);
}
