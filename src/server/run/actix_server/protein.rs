//! Endpoints below `/{version}/{species}/feature/protein`.
//!
//! Proteins are looked up by UniProt accession or name.

use actix_web::{
    get,
    web::{self, Data, Path},
    HttpRequest, HttpResponse,
};

use crate::common::split_ids;
use crate::reference::headers::HeaderTag;

use super::{usage, CustomError, IdsPath, RequestContext, WebServerData};

#[allow(clippy::unused_async)]
#[get("/{version}/{species}/feature/protein/{ids}/info")]
async fn handle_info(
    data: Data<WebServerData>,
    path: IdsPath,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species, ids) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    let proteins = ctx.query(|db, species, version| {
        db.protein(species, version)?
            .get_all_by_id_list(&split_ids(&ids))
    })?;
    Ok(ctx
        .renderer()
        .with_query(&ids)
        .render(&proteins, Some(HeaderTag::Protein)))
}

#[allow(clippy::unused_async)]
#[get("/{version}/{species}/feature/protein/{ids}/feature")]
async fn handle_feature(
    data: Data<WebServerData>,
    path: IdsPath,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species, ids) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    let features = ctx.query(|db, species, version| {
        db.protein(species, version)?
            .get_all_features_by_id_list(&split_ids(&ids))
    })?;
    Ok(ctx
        .renderer()
        .with_query(&ids)
        .render(&features, Some(HeaderTag::ProteinFeature)))
}

/// Cross references, restricted to the databases in `dbname` if given.
#[allow(clippy::unused_async)]
#[get("/{version}/{species}/feature/protein/{ids}/xref")]
async fn handle_xref(
    data: Data<WebServerData>,
    path: IdsPath,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species, ids) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    let db_names = ctx.param_list("dbname");
    let xrefs = ctx.query(|db, species, version| {
        db.xref(species, version)?
            .get_all_by_db_name_list(&split_ids(&ids), &db_names)
    })?;
    Ok(ctx
        .renderer()
        .with_query(&ids)
        .render(&xrefs, Some(HeaderTag::Xref)))
}

/// Interactions, restricted to the sources in `source` if given.
#[allow(clippy::unused_async)]
#[get("/{version}/{species}/feature/protein/{ids}/interaction")]
async fn handle_interaction(
    data: Data<WebServerData>,
    path: IdsPath,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species, ids) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    let sources = ctx.param_list("source");
    let interactions = ctx.query(|db, species, version| {
        db.protein(species, version)?
            .get_all_interactions_by_id_list(&split_ids(&ids), &sources)
    })?;
    Ok(ctx.renderer().with_query(&ids).render(&interactions, None))
}

#[allow(clippy::unused_async)]
#[get("/{version}/{species}/feature/protein/help")]
async fn handle_help(
    data: Data<WebServerData>,
    path: Path<(String, String)>,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    Ok(ctx.renderer().render_text(usage(&[
        "/{ids}/info",
        "/{ids}/feature",
        "/{ids}/xref?dbname=",
        "/{ids}/interaction?source=",
    ])))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(handle_help)
        .service(handle_info)
        .service(handle_feature)
        .service(handle_xref)
        .service(handle_interaction);
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::super::test::{get_json, get_text};

    #[actix_web::test]
    async fn info_by_accession_and_name() -> Result<(), anyhow::Error> {
        let body = get_json("/v3/hsapiens/feature/protein/P51587,P53_HUMAN/info?of=json").await?;

        assert_eq!(body[0]["geneName"], "BRCA2");
        assert_eq!(body[1]["accession"], "P04637");

        Ok(())
    }

    #[actix_web::test]
    async fn features() -> Result<(), anyhow::Error> {
        let body = get_json("/v3/hsapiens/feature/protein/P04637/feature?of=json").await?;

        assert_eq!(body[0][0]["type"], "DNA-binding region");

        Ok(())
    }

    #[rstest::rstest]
    #[case("", "GO:0006281\tDNA repair")]
    #[case("?dbname=go", "GO:0006281\tDNA repair")]
    #[case("?dbname=interpro", "not found")]
    #[actix_web::test]
    async fn xrefs_by_db_name(
        #[case] query: &str,
        #[case] expected: &str,
    ) -> Result<(), anyhow::Error> {
        let uri = format!("/v3/hsapiens/feature/protein/P51587/xref{}", query);
        let body = get_text(&uri).await?;

        assert_eq!(body, format!("#ID\tdescription\n{}", expected));

        Ok(())
    }

    #[rstest::rstest]
    #[case("of=json", 2)]
    #[case("source=intact&of=json", 1)]
    #[case("source=intact,reactome&of=json", 2)]
    #[case("source=biogrid&of=json", 0)]
    #[actix_web::test]
    async fn interactions_by_source(
        #[case] query: &str,
        #[case] count: usize,
    ) -> Result<(), anyhow::Error> {
        let uri = format!("/v3/hsapiens/feature/protein/P04637/interaction?{}", query);
        let body = get_json(&uri).await?;

        assert_eq!(body[0].as_array().map(Vec::len), Some(count));

        Ok(())
    }
}
