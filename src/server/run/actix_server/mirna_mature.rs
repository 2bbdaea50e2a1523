//! Endpoints below `/{version}/{species}/regulatory/mirna_mature`.

use actix_web::{
    get,
    web::{self, Data, Path},
    HttpRequest, HttpResponse,
};
use itertools::izip;

use crate::common::split_ids;
use crate::db::model::{Gene, MirnaDisease, MirnaGene, MirnaMature, Transcript};
use crate::db::{DbAdaptorFactory, DbResult};
use crate::reference::headers::HeaderTag;
use crate::server::response::render::{json_text, TextContext, TextRecord};

use super::{usage, CustomError, IdsPath, RequestContext, WebServerData};

/// The mature miRNA and the precursors it is processed from.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MirnaRecords {
    pub mirna_mature: MirnaMature,
    pub mirna_genes: Vec<MirnaGene>,
}

/// A mature miRNA with its host genes, targets and diseases.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MirnaMatureFullInfo {
    pub mirna: MirnaRecords,
    /// Genes hosting the precursors.
    pub genes: Vec<Gene>,
    pub transcripts: Vec<Transcript>,
    pub target_genes: Vec<Gene>,
    pub mirna_diseases: Vec<MirnaDisease>,
}

impl TextRecord for MirnaMatureFullInfo {
    fn to_text(&self, ctx: &TextContext<'_>) -> String {
        json_text(self, ctx)
    }
}

fn full_info(
    db: &dyn DbAdaptorFactory,
    species: &str,
    version: &str,
    ids: &[String],
) -> DbResult<Vec<Option<MirnaMatureFullInfo>>> {
    let mirna = db.mirna(species, version)?;
    let gene = db.gene(species, version)?;

    let matures = mirna.get_all_mirna_matures_by_name_list(ids)?;
    let mirna_genes = mirna.get_all_mirna_genes_by_mirna_mature_list(ids)?;
    let genes = gene.get_all_by_mirna_mature_list(ids)?;
    let transcripts = db
        .transcript(species, version)?
        .get_all_by_mirna_mature_list(ids)?;
    let target_genes = gene.get_all_targets_by_mirna_mature_list(ids)?;
    let mirna_diseases = mirna.get_all_mirna_diseases_by_mirna_mature_list(ids)?;

    Ok(izip!(
        matures,
        mirna_genes,
        genes,
        transcripts,
        target_genes,
        mirna_diseases
    )
    .map(
        |(mature, mirna_genes, genes, transcripts, target_genes, mirna_diseases)| {
            mature.map(|mirna_mature| MirnaMatureFullInfo {
                mirna: MirnaRecords {
                    mirna_mature,
                    mirna_genes,
                },
                genes,
                transcripts,
                target_genes,
                mirna_diseases,
            })
        },
    )
    .collect())
}

#[allow(clippy::unused_async)]
#[get("/{version}/{species}/regulatory/mirna_mature/{ids}/info")]
async fn handle_info(
    data: Data<WebServerData>,
    path: IdsPath,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species, ids) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    let matures = ctx.query(|db, species, version| {
        db.mirna(species, version)?
            .get_all_mirna_matures_by_name_list(&split_ids(&ids))
    })?;
    Ok(ctx
        .renderer()
        .with_query(&ids)
        .render(&matures, Some(HeaderTag::MirnaMature)))
}

#[allow(clippy::unused_async)]
#[get("/{version}/{species}/regulatory/mirna_mature/{ids}/fullinfo")]
async fn handle_fullinfo(
    data: Data<WebServerData>,
    path: IdsPath,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species, ids) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    let records = ctx.query(|db, species, version| {
        full_info(db, species, version, &split_ids(&ids))
    })?;
    Ok(ctx.renderer().with_query(&ids).render(&records, None))
}

/// Genes hosting the precursors of each mature miRNA.
#[allow(clippy::unused_async)]
#[get("/{version}/{species}/regulatory/mirna_mature/{ids}/gene")]
async fn handle_gene(
    data: Data<WebServerData>,
    path: IdsPath,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species, ids) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    let genes = ctx.query(|db, species, version| {
        db.gene(species, version)?
            .get_all_by_mirna_mature_list(&split_ids(&ids))
    })?;
    Ok(ctx
        .renderer()
        .with_query(&ids)
        .render(&genes, Some(HeaderTag::Gene)))
}

#[allow(clippy::unused_async)]
#[get("/{version}/{species}/regulatory/mirna_mature/{ids}/mirna_gene")]
async fn handle_mirna_gene(
    data: Data<WebServerData>,
    path: IdsPath,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species, ids) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    let genes = ctx.query(|db, species, version| {
        db.mirna(species, version)?
            .get_all_mirna_genes_by_mirna_mature_list(&split_ids(&ids))
    })?;
    Ok(ctx
        .renderer()
        .with_query(&ids)
        .render(&genes, Some(HeaderTag::MirnaGene)))
}

/// Genes regulated by each mature miRNA.
#[allow(clippy::unused_async)]
#[get("/{version}/{species}/regulatory/mirna_mature/{ids}/target_gene")]
async fn handle_target_gene(
    data: Data<WebServerData>,
    path: IdsPath,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species, ids) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    let genes = ctx.query(|db, species, version| {
        db.gene(species, version)?
            .get_all_targets_by_mirna_mature_list(&split_ids(&ids))
    })?;
    Ok(ctx
        .renderer()
        .with_query(&ids)
        .render(&genes, Some(HeaderTag::Gene)))
}

/// Binding sites of each mature miRNA, restricted to `source` if given.
#[allow(clippy::unused_async)]
#[get("/{version}/{species}/regulatory/mirna_mature/{ids}/target")]
async fn handle_target(
    data: Data<WebServerData>,
    path: IdsPath,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species, ids) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    let sources = ctx.param_list("source");
    let targets = ctx.query(|db, species, version| {
        db.mirna(species, version)?
            .get_all_mirna_targets_by_mirna_mature_list(&split_ids(&ids), &sources)
    })?;
    Ok(ctx
        .renderer()
        .with_query(&ids)
        .render(&targets, Some(HeaderTag::MirnaTarget)))
}

#[allow(clippy::unused_async)]
#[get("/{version}/{species}/regulatory/mirna_mature/{ids}/disease")]
async fn handle_disease(
    data: Data<WebServerData>,
    path: IdsPath,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species, ids) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    let diseases = ctx.query(|db, species, version| {
        db.mirna(species, version)?
            .get_all_mirna_diseases_by_mirna_mature_list(&split_ids(&ids))
    })?;
    Ok(ctx
        .renderer()
        .with_query(&ids)
        .render(&diseases, Some(HeaderTag::MirnaDisease)))
}

/// Distinct miRNA and target source pairs.
#[allow(clippy::unused_async)]
#[get("/{version}/{species}/regulatory/mirna_mature/annotation")]
async fn handle_annotation(
    data: Data<WebServerData>,
    path: Path<(String, String)>,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    let sources = ctx.param_list("source");
    let pairs = ctx.query(|db, species, version| {
        db.mirna(species, version)?.get_all_annotation(&sources)
    })?;
    Ok(ctx.renderer().render(&pairs, None))
}

#[allow(clippy::unused_async)]
#[get("/{version}/{species}/regulatory/mirna_mature/help")]
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
        "/{ids}/mirna_gene",
        "/{ids}/target_gene",
        "/{ids}/target?source=",
        "/{ids}/disease",
        "/annotation?source=",
    ])))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(handle_help)
        .service(handle_annotation)
        .service(handle_info)
        .service(handle_fullinfo)
        .service(handle_gene)
        .service(handle_mirna_gene)
        .service(handle_target_gene)
        .service(handle_target)
        .service(handle_disease);
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::super::test::{get_json, get_text};

    #[actix_web::test]
    async fn handle_fullinfo() -> Result<(), anyhow::Error> {
        let body =
            get_json("/v3/hsapiens/regulatory/mirna_mature/hsa-let-7a-5p,hsa-miR-21/fullinfo?of=json")
                .await?;

        assert_eq!(body[0]["mirna"]["mirnaMature"]["accession"], "MIMAT0000062");
        assert_eq!(body[0]["mirna"]["mirnaGenes"][0]["mirbaseId"], "hsa-let-7a-1");
        assert_eq!(body[0]["genes"][0]["externalName"], "BRCA2");
        assert_eq!(body[0]["transcripts"][0]["stableId"], "ENST00000380152");
        assert_eq!(body[0]["targetGenes"].as_array().map(Vec::len), Some(2));
        assert_eq!(body[0]["mirnaDiseases"][0]["diseaseName"], "lung cancer");
        assert_eq!(body[1], serde_json::Value::Null);

        Ok(())
    }

    #[rstest::rstest]
    #[case("gene", "ENSG00000139618")]
    #[case("target_gene", "ENSG00000141510")]
    #[actix_web::test]
    async fn genes(#[case] resource: &str, #[case] first: &str) -> Result<(), anyhow::Error> {
        let uri = format!(
            "/v3/hsapiens/regulatory/mirna_mature/hsa-let-7a-5p/{}?of=json",
            resource
        );
        let body = get_json(&uri).await?;

        assert_eq!(body[0][0]["stableId"], first);

        Ok(())
    }

    #[rstest::rstest]
    #[case("of=json", 2)]
    #[case("source=TarBase&of=json", 1)]
    #[case("source=miRecords,TarBase&of=json", 2)]
    #[actix_web::test]
    async fn targets_by_source(
        #[case] query: &str,
        #[case] count: usize,
    ) -> Result<(), anyhow::Error> {
        let uri = format!(
            "/v3/hsapiens/regulatory/mirna_mature/hsa-let-7a-5p/target?{}",
            query
        );
        let body = get_json(&uri).await?;

        assert_eq!(body[0].as_array().map(Vec::len), Some(count));

        Ok(())
    }

    #[rstest::rstest]
    #[case("", "hsa-let-7a-5p\tTarBase//hsa-let-7a-5p\tmiRecords")]
    #[case("?source=miRecords", "hsa-let-7a-5p\tmiRecords")]
    #[actix_web::test]
    async fn handle_annotation(#[case] query: &str, #[case] expected: &str) -> Result<(), anyhow::Error> {
        let uri = format!("/v3/hsapiens/regulatory/mirna_mature/annotation{}", query);

        assert_eq!(get_text(&uri).await?, expected);

        Ok(())
    }

    #[actix_web::test]
    async fn mirna_genes_and_diseases() -> Result<(), anyhow::Error> {
        let genes = get_text(
            "/v3/hsapiens/regulatory/mirna_mature/hsa-let-7a-5p/mirna_gene?header=false",
        )
        .await?;
        assert_eq!(
            genes,
            "MI0000060\thsa-let-7a-1\tok\tUGGGAUGAGGUAGUAGGUUGUAUAGUU\tmiRBase"
        );

        let diseases =
            get_json("/v3/hsapiens/regulatory/mirna_mature/hsa-let-7a-5p/disease?of=json").await?;
        assert_eq!(diseases[0][0]["pubmedId"], "15944707");

        Ok(())
    }
}
