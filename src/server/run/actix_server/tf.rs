//! Endpoints below `/{version}/{species}/regulatory/tf`.
//!
//! Transcription factors are identified by their gene name.

use actix_web::{
    get,
    web::{self, Data, Path},
    HttpRequest, HttpResponse,
};

use crate::common::split_ids;
use crate::reference::headers::HeaderTag;

use super::{usage, CustomError, IdsPath, RequestContext, WebServerData};

/// Binding sites of each factor; `info` and `tfbs` answer the same.
fn binding_sites(ctx: &RequestContext<'_>, ids: &str) -> Result<HttpResponse, CustomError> {
    let sites = ctx.query(|db, species, version| {
        db.tfbs(species, version)?
            .get_all_by_tf_name_list(&split_ids(ids))
    })?;
    Ok(ctx
        .renderer()
        .with_query(ids)
        .render(&sites, Some(HeaderTag::Tfbs)))
}

#[allow(clippy::unused_async)]
#[get("/{version}/{species}/regulatory/tf/{ids}/info")]
async fn handle_info(
    data: Data<WebServerData>,
    path: IdsPath,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species, ids) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    binding_sites(&ctx, &ids)
}

#[allow(clippy::unused_async)]
#[get("/{version}/{species}/regulatory/tf/{ids}/tfbs")]
async fn handle_tfbs(
    data: Data<WebServerData>,
    path: IdsPath,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species, ids) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    binding_sites(&ctx, &ids)
}

/// Genes with binding sites of each factor.
#[allow(clippy::unused_async)]
#[get("/{version}/{species}/regulatory/tf/{ids}/gene")]
async fn handle_gene(
    data: Data<WebServerData>,
    path: IdsPath,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species, ids) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    let genes = ctx.query(|db, species, version| {
        db.gene(species, version)?
            .get_all_targets_by_tf_name_list(&split_ids(&ids))
    })?;
    Ok(ctx
        .renderer()
        .with_query(&ids)
        .render(&genes, Some(HeaderTag::Gene)))
}

#[allow(clippy::unused_async)]
#[get("/{version}/{species}/regulatory/tf/{ids}/pwm")]
async fn handle_pwm(
    data: Data<WebServerData>,
    path: IdsPath,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species, ids) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    let matrices = ctx.query(|db, species, version| {
        db.tfbs(species, version)?
            .get_all_pwm_by_tf_name_list(&split_ids(&ids))
    })?;
    Ok(ctx.renderer().with_query(&ids).render(&matrices, None))
}

/// Distinct factor and cell type pairs, optionally restricted by `celltype`.
#[allow(clippy::unused_async)]
#[get("/{version}/{species}/regulatory/tf/annotation")]
async fn handle_annotation(
    data: Data<WebServerData>,
    path: Path<(String, String)>,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    let cell_types = ctx.param_list("celltype");
    let pairs = ctx.query(|db, species, version| {
        db.tfbs(species, version)?.get_all_annotation(&cell_types)
    })?;
    Ok(ctx.renderer().render(&pairs, None))
}

#[allow(clippy::unused_async)]
#[get("/{version}/{species}/regulatory/tf/help")]
async fn handle_help(
    data: Data<WebServerData>,
    path: Path<(String, String)>,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    Ok(ctx.renderer().render_text(usage(&[
        "/{ids}/info",
        "/{ids}/tfbs",
        "/{ids}/gene",
        "/{ids}/pwm",
        "/annotation?celltype=",
    ])))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(handle_help)
        .service(handle_annotation)
        .service(handle_info)
        .service(handle_tfbs)
        .service(handle_gene)
        .service(handle_pwm);
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::super::test::{get_json, get_text};

    #[rstest::rstest]
    #[case("info")]
    #[case("tfbs")]
    #[actix_web::test]
    async fn binding_sites(#[case] resource: &str) -> Result<(), anyhow::Error> {
        let uri = format!("/v3/hsapiens/regulatory/tf/E2F1,FOXA1/{}?header=false", resource);
        let body = get_text(&uri).await?;

        assert_eq!(
            body,
            "E2F1\tBRCA2\t13\t32889500\t32889520\tHeLa\tTTTCGCGC\t0.93//not found"
        );

        Ok(())
    }

    #[actix_web::test]
    async fn target_genes() -> Result<(), anyhow::Error> {
        let body = get_json("/v3/hsapiens/regulatory/tf/TP53/gene?of=json").await?;

        assert_eq!(body[0][0]["externalName"], "BRCA2");

        Ok(())
    }

    #[actix_web::test]
    async fn matrices() -> Result<(), anyhow::Error> {
        let body = get_json("/v3/hsapiens/regulatory/tf/E2F1,TP53/pwm?of=json").await?;

        assert_eq!(body[0][0]["type"], "MA0024.1");
        assert_eq!(body[1], serde_json::json!([]));

        Ok(())
    }

    #[rstest::rstest]
    #[case("", "E2F1\tHeLa//TP53\tK562")]
    #[case("?celltype=K562", "TP53\tK562")]
    #[case("?celltype=HepG2", "")]
    #[actix_web::test]
    async fn handle_annotation(#[case] query: &str, #[case] expected: &str) -> Result<(), anyhow::Error> {
        let uri = format!("/v3/hsapiens/regulatory/tf/annotation{}", query);

        assert_eq!(get_text(&uri).await?, expected);

        Ok(())
    }
}
