//! Endpoints below `/{version}/{species}/feature/gene`.
//!
//! Genes are looked up by Ensembl stable ID or external name.

use actix_web::{
    get,
    web::{self, Data, Path},
    HttpRequest, HttpResponse,
};

use crate::common::split_ids;
use crate::reference::headers::HeaderTag;

use super::{usage, CustomError, IdsPath, RequestContext, WebServerData};

#[allow(clippy::unused_async)]
#[get("/{version}/{species}/feature/gene/{ids}/info")]
async fn handle_info(
    data: Data<WebServerData>,
    path: IdsPath,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species, ids) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    let genes = ctx.query(|db, species, version| {
        db.gene(species, version)?
            .get_all_by_id_list(&split_ids(&ids))
    })?;
    Ok(ctx
        .renderer()
        .with_query(&ids)
        .render(&genes, Some(HeaderTag::Gene)))
}

#[allow(clippy::unused_async)]
#[get("/{version}/{species}/feature/gene/{ids}/transcript")]
async fn handle_transcript(
    data: Data<WebServerData>,
    path: IdsPath,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species, ids) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    let transcripts = ctx.query(|db, species, version| {
        db.transcript(species, version)?
            .get_all_by_gene_id_list(&split_ids(&ids))
    })?;
    Ok(ctx
        .renderer()
        .with_query(&ids)
        .render(&transcripts, Some(HeaderTag::Transcript)))
}

#[allow(clippy::unused_async)]
#[get("/{version}/{species}/feature/gene/{ids}/exon")]
async fn handle_exon(
    data: Data<WebServerData>,
    path: IdsPath,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species, ids) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    let exons = ctx.query(|db, species, version| {
        db.exon(species, version)?
            .get_all_by_gene_id_list(&split_ids(&ids))
    })?;
    Ok(ctx
        .renderer()
        .with_query(&ids)
        .render(&exons, Some(HeaderTag::Exon)))
}

#[allow(clippy::unused_async)]
#[get("/{version}/{species}/feature/gene/{ids}/snp")]
async fn handle_snp(
    data: Data<WebServerData>,
    path: IdsPath,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species, ids) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    let snps = ctx.query(|db, species, version| {
        db.snp(species, version)?
            .get_all_by_gene_id_list(&split_ids(&ids))
    })?;
    Ok(ctx
        .renderer()
        .with_query(&ids)
        .render(&snps, Some(HeaderTag::Snp)))
}

/// Proteins encoded by the genes, matched by gene name.
#[allow(clippy::unused_async)]
#[get("/{version}/{species}/feature/gene/{ids}/protein")]
async fn handle_protein(
    data: Data<WebServerData>,
    path: IdsPath,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species, ids) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    let proteins = ctx.query(|db, species, version| {
        db.protein(species, version)?
            .get_all_by_gene_name_list(&split_ids(&ids))
    })?;
    Ok(ctx
        .renderer()
        .with_query(&ids)
        .render(&proteins, Some(HeaderTag::Protein)))
}

#[allow(clippy::unused_async)]
#[get("/{version}/{species}/feature/gene/{ids}/mutation")]
async fn handle_mutation(
    data: Data<WebServerData>,
    path: IdsPath,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species, ids) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    let mutations = ctx.query(|db, species, version| {
        db.mutation(species, version)?
            .get_all_by_gene_name_list(&split_ids(&ids))
    })?;
    Ok(ctx
        .renderer()
        .with_query(&ids)
        .render(&mutations, Some(HeaderTag::Mutation)))
}

/// Transcription factor binding sites targeting the genes.
#[allow(clippy::unused_async)]
#[get("/{version}/{species}/feature/gene/{ids}/tfbs")]
async fn handle_tfbs(
    data: Data<WebServerData>,
    path: IdsPath,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species, ids) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    let sites = ctx.query(|db, species, version| {
        db.tfbs(species, version)?
            .get_all_by_target_gene_name_list(&split_ids(&ids))
    })?;
    Ok(ctx
        .renderer()
        .with_query(&ids)
        .render(&sites, Some(HeaderTag::Tfbs)))
}

#[allow(clippy::unused_async)]
#[get("/{version}/{species}/feature/gene/help")]
async fn handle_help(
    data: Data<WebServerData>,
    path: Path<(String, String)>,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    Ok(ctx.renderer().render_text(usage(&[
        "/{ids}/info",
        "/{ids}/transcript",
        "/{ids}/exon",
        "/{ids}/snp",
        "/{ids}/protein",
        "/{ids}/mutation",
        "/{ids}/tfbs",
    ])))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(handle_help)
        .service(handle_info)
        .service(handle_transcript)
        .service(handle_exon)
        .service(handle_snp)
        .service(handle_protein)
        .service(handle_mutation)
        .service(handle_tfbs);
}

#[cfg(test)]
mod test {
    use actix_web::http::header;
    use pretty_assertions::assert_eq;

    use super::super::test::{get, get_json, get_text, header_value};

    #[actix_web::test]
    async fn info_keeps_positions() -> Result<(), anyhow::Error> {
        let body = get_text("/v3/hsapiens/feature/gene/BRCA2,FOO,ENSG00000141510/info?header=false")
            .await?;
        let items = body.split("//").collect::<Vec<_>>();

        assert_eq!(items.len(), 3);
        assert!(items[0].starts_with("ENSG00000139618\tBRCA2\tHGNC\tprotein_coding"));
        assert_eq!(items[1], "not found");
        assert!(items[2].starts_with("ENSG00000141510\tTP53\t"));

        Ok(())
    }

    #[actix_web::test]
    async fn info_header_line() -> Result<(), anyhow::Error> {
        let body = get_text("/latest/hsapiens/feature/gene/TP53/info").await?;

        assert_eq!(
            body.lines().next(),
            Some(
                "#Ensembl gene\texternal name\texternal name source\tbiotype\tstatus\t\
                 chromosome\tstart\tend\tstrand\tsource\tdescription"
            )
        );

        Ok(())
    }

    #[actix_web::test]
    async fn info_json_keeps_null() -> Result<(), anyhow::Error> {
        let body = get_json("/v3/hsapiens/feature/gene/FOO,TP53/info?of=json").await?;

        assert_eq!(body[0], serde_json::Value::Null);
        assert_eq!(body[1]["stableId"], "ENSG00000141510");
        assert_eq!(body[1]["strand"], "-1");

        Ok(())
    }

    #[actix_web::test]
    async fn transcripts_and_exons() -> Result<(), anyhow::Error> {
        let transcripts = get_json("/v3/hsapiens/feature/gene/BRCA2/transcript?of=json").await?;
        assert_eq!(transcripts[0][0]["stableId"], "ENST00000380152");

        let exons = get_json("/v3/hsapiens/feature/gene/ENSG00000139618/exon?of=json").await?;
        assert_eq!(exons[0].as_array().map(Vec::len), Some(2));

        Ok(())
    }

    #[actix_web::test]
    async fn related_by_name() -> Result<(), anyhow::Error> {
        let proteins = get_json("/v3/hsapiens/feature/gene/TP53/protein?of=json").await?;
        assert_eq!(proteins[0][0]["accession"], "P04637");

        let mutations = get_json("/v3/hsapiens/feature/gene/TP53/mutation?of=json").await?;
        assert_eq!(mutations[0][0]["mutationAa"], "p.R248Q");

        let sites = get_json("/v3/hsapiens/feature/gene/BRCA2,TP53/tfbs?of=json").await?;
        assert_eq!(sites[0].as_array().map(Vec::len), Some(2));
        assert_eq!(sites[1], serde_json::json!([]));

        Ok(())
    }

    #[actix_web::test]
    async fn xml_output() -> Result<(), anyhow::Error> {
        let response = get("/v3/hsapiens/feature/gene/BRCA2/info?of=xml").await?;

        assert_eq!(
            header_value(&response, header::CONTENT_TYPE).as_deref(),
            Some("text/xml")
        );

        Ok(())
    }

    #[actix_web::test]
    async fn handle_help() -> Result<(), anyhow::Error> {
        let body = get_text("/v3/hsapiens/feature/gene/help").await?;

        assert!(body.starts_with("Usage:\n\t/{ids}/info\n"));

        Ok(())
    }
}
