//! Endpoints below `/{version}/{species}/regulatory/mirna_gene`.
//!
//! Targets and diseases of a miRNA gene include those of its matures.

use actix_web::{
    get,
    web::{self, Data, Path},
    HttpRequest, HttpResponse,
};

use crate::common::split_ids;
use crate::reference::headers::HeaderTag;

use super::{usage, CustomError, IdsPath, RequestContext, WebServerData};

#[allow(clippy::unused_async)]
#[get("/{version}/{species}/regulatory/mirna_gene/{ids}/info")]
async fn handle_info(
    data: Data<WebServerData>,
    path: IdsPath,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species, ids) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    let genes = ctx.query(|db, species, version| {
        db.mirna(species, version)?
            .get_all_mirna_genes_by_name_list(&split_ids(&ids))
    })?;
    Ok(ctx
        .renderer()
        .with_query(&ids)
        .render(&genes, Some(HeaderTag::MirnaGene)))
}

#[allow(clippy::unused_async)]
#[get("/{version}/{species}/regulatory/mirna_gene/{ids}/target")]
async fn handle_target(
    data: Data<WebServerData>,
    path: IdsPath,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species, ids) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    let targets = ctx.query(|db, species, version| {
        db.mirna(species, version)?
            .get_all_mirna_targets_by_mirna_gene_list(&split_ids(&ids))
    })?;
    Ok(ctx
        .renderer()
        .with_query(&ids)
        .render(&targets, Some(HeaderTag::MirnaTarget)))
}

#[allow(clippy::unused_async)]
#[get("/{version}/{species}/regulatory/mirna_gene/{ids}/disease")]
async fn handle_disease(
    data: Data<WebServerData>,
    path: IdsPath,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species, ids) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    let diseases = ctx.query(|db, species, version| {
        db.mirna(species, version)?
            .get_all_mirna_diseases_by_mirna_gene_list(&split_ids(&ids))
    })?;
    Ok(ctx
        .renderer()
        .with_query(&ids)
        .render(&diseases, Some(HeaderTag::MirnaDisease)))
}

#[allow(clippy::unused_async)]
#[get("/{version}/{species}/regulatory/mirna_gene/help")]
async fn handle_help(
    data: Data<WebServerData>,
    path: Path<(String, String)>,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    Ok(ctx.renderer().render_text(usage(&[
        "/{ids}/info",
        "/{ids}/target",
        "/{ids}/disease",
    ])))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(handle_help)
        .service(handle_info)
        .service(handle_target)
        .service(handle_disease);
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::super::test::{get_json, get_text};

    #[actix_web::test]
    async fn info_text() -> Result<(), anyhow::Error> {
        let body =
            get_text("/v3/hsapiens/regulatory/mirna_gene/hsa-let-7a-1,hsa-mir-21/info").await?;

        assert_eq!(
            body,
            "#miRBase accession\tmiRBase ID\tstatus\tsequence\tsource\n\
             MI0000060\thsa-let-7a-1\tok\tUGGGAUGAGGUAGUAGGUUGUAUAGUU\tmiRBase//not found"
        );

        Ok(())
    }

    #[actix_web::test]
    async fn targets_of_matures() -> Result<(), anyhow::Error> {
        let body = get_json("/v3/hsapiens/regulatory/mirna_gene/hsa-let-7a-1/target?of=json").await?;
        let targets = body[0]
            .as_array()
            .map(|targets| {
                targets
                    .iter()
                    .filter_map(|t| t["geneTargetName"].as_str())
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        assert_eq!(targets, vec!["TP53", "BRCA2"]);

        Ok(())
    }

    #[actix_web::test]
    async fn diseases() -> Result<(), anyhow::Error> {
        let body =
            get_text("/v3/hsapiens/regulatory/mirna_gene/hsa-let-7a-1/disease?header=false").await?;

        assert_eq!(body, "hsa-let-7a-5p\tlung cancer\t15944707\tdown-regulated");

        Ok(())
    }
}
