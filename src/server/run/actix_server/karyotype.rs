//! Endpoints below `/{version}/{species}/feature/karyotype`.

use actix_web::{
    get,
    web::{self, Data, Path},
    HttpRequest, HttpResponse,
};

use crate::common::split_ids;

use super::{usage, CustomError, IdsPath, RequestContext, WebServerData};

/// Cytobands of each chromosome.
#[allow(clippy::unused_async)]
#[get("/{version}/{species}/feature/karyotype/{chromosomes}/cytoband")]
async fn handle_cytoband(
    data: Data<WebServerData>,
    path: IdsPath,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species, chromosomes) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    let bands = ctx.query(|db, species, version| {
        db.cytoband(species, version)?
            .get_all_by_chromosome_list(&split_ids(&chromosomes))
    })?;
    Ok(ctx.renderer().with_query(&chromosomes).render(&bands, None))
}

/// Names of all chromosomes in the karyotype.
fn chromosome_names(ctx: &RequestContext<'_>) -> Result<HttpResponse, CustomError> {
    let names = ctx.query(|db, species, version| {
        db.cytoband(species, version)?.get_all_chromosome_names()
    })?;
    Ok(ctx.renderer().render(&names, None))
}

#[allow(clippy::unused_async)]
#[get("/{version}/{species}/feature/karyotype/chromosome")]
async fn handle_chromosomes(
    data: Data<WebServerData>,
    path: Path<(String, String)>,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    chromosome_names(&ctx)
}

/// Same as the chromosome listing; the chromosome is ignored.
#[allow(clippy::unused_async)]
#[get("/{version}/{species}/feature/karyotype/{chromosome}/chromosome")]
async fn handle_chromosome(
    data: Data<WebServerData>,
    path: IdsPath,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species, _) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    chromosome_names(&ctx)
}

#[allow(clippy::unused_async)]
#[get("/{version}/{species}/feature/karyotype/help")]
async fn handle_help(
    data: Data<WebServerData>,
    path: Path<(String, String)>,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    Ok(ctx.renderer().render_text(usage(&[
        "/{chromosomes}/cytoband",
        "/chromosome",
        "/{chromosome}/chromosome",
    ])))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(handle_help)
        .service(handle_chromosomes)
        .service(handle_cytoband)
        .service(handle_chromosome);
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::super::test::get_text;

    #[actix_web::test]
    async fn cytobands() -> Result<(), anyhow::Error> {
        let body = get_text(
            "/v3/hsapiens/feature/karyotype/13,Y/cytoband?query_separator=;&result_separator=newline",
        )
        .await?;

        assert_eq!(
            body,
            "13\t31500001\t34300000\tq13.1\tgpos50;13\t34300001\t34700000\tq13.2\tgneg\nnot found"
        );

        Ok(())
    }

    #[rstest::rstest]
    #[case("/v3/hsapiens/feature/karyotype/chromosome")]
    #[case("/v3/hsapiens/feature/karyotype/17/chromosome")]
    #[actix_web::test]
    async fn chromosome_names(#[case] uri: &str) -> Result<(), anyhow::Error> {
        assert_eq!(get_text(uri).await?, "13//17");

        Ok(())
    }
}
