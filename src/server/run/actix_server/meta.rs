//! Endpoints describing the service itself: species, versions and the
//! resource categories below a species.

use actix_web::{
    get,
    web::{Data, Path},
    HttpRequest, HttpResponse,
};

use crate::reference::species::{self, Species, SPECIES};
use crate::server::response::params::{FormatQuery, OutputFormat};

use super::{CustomError, RequestContext, WebServerData};

/// Data versions of the supported species.
const VERSION_MESSAGE: &str = "Homo sapiens\tEnsembl 64\n\
    Mus musculus\tEnsembl 65\n\
    Rattus norvegicus\tEnsembl 65\n\
    Drosophila melanogaster\tEnsembl 65\n\
    Canis familiaris\tEnsembl 65\n\
    ...\n\n\
    The rest of nfo will be added soon, sorry for the inconveniences. \
    You can find mor info at:\n\n\
    http://docs.bioinfo.cipf.es/projects/variant/wiki/Databases";

const CATEGORIES: &str = "feature\ngenomic\nnetwork\nregulatory";

/// Resources of a category, all categories if `category` is unknown.
fn category_resources(category: &str) -> &'static str {
    match category.to_ascii_lowercase().as_str() {
        "feature" => "exon\ngene\nkaryotype\nprotein\nsnp\ntranscript",
        "genomic" => "position\nregion\nvariant",
        "network" => "pathway",
        "regulatory" => "mirna_gene\nmirna_mature\ntf",
        _ => CATEGORIES,
    }
}

/// Render the species catalog, as JSON list for `of=json`.
fn species_catalog(ctx: &RequestContext<'_>) -> HttpResponse {
    if ctx.options.output_format == OutputFormat::Json {
        ctx.renderer().render(SPECIES, None)
    } else {
        ctx.renderer().render_text(species::catalog_text())
    }
}

/// Text for the categories endpoints; the catalog for unknown species.
fn categories_or_catalog(ctx: &RequestContext<'_>, species: &str, text: &str) -> HttpResponse {
    if species::is_known(species) {
        ctx.renderer().render_text(text)
    } else {
        species_catalog(ctx)
    }
}

/// The catalog of known species.
#[allow(clippy::unused_async)]
#[utoipa::path(
    get,
    operation_id = "species",
    params(
        ("version" = String, Path, description = "API version or `latest`."),
        FormatQuery,
    ),
    responses(
        (status = 200, description = "Species catalog, tab-separated or JSON.", body = [Species]),
    )
)]
#[get("/{version}/species")]
pub async fn handle_species(
    data: Data<WebServerData>,
    path: Path<String>,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let ctx = RequestContext::for_version(&data, &req, &path)?;
    Ok(species_catalog(&ctx))
}

/// Data versions of the supported species.
#[allow(clippy::unused_async)]
#[utoipa::path(
    get,
    operation_id = "version",
    params(("version" = String, Path, description = "API version or `latest`.")),
    responses((status = 200, description = "Data versions as plain text.", body = String))
)]
#[get("/{version}/version")]
pub async fn handle_version(
    data: Data<WebServerData>,
    path: Path<String>,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let ctx = RequestContext::for_version(&data, &req, &path)?;
    Ok(ctx.renderer().render_text(VERSION_MESSAGE))
}

#[allow(clippy::unused_async)]
#[utoipa::path(
    get,
    operation_id = "help",
    params(("version" = String, Path, description = "API version or `latest`.")),
    responses((status = 200, description = "Help text.", body = String))
)]
#[get("/{version}/help")]
pub async fn handle_help(
    data: Data<WebServerData>,
    path: Path<String>,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let ctx = RequestContext::for_version(&data, &req, &path)?;
    Ok(ctx.renderer().render_text("No help available"))
}

/// Configured chromosome names of a species.
#[allow(clippy::unused_async)]
#[utoipa::path(
    get,
    operation_id = "chromosomes",
    params(
        ("version" = String, Path, description = "API version or `latest`."),
        ("species" = String, Path, description = "Species code, e.g., `hsapiens`."),
    ),
    responses((status = 200, description = "Comma separated chromosome names.", body = String))
)]
#[get("/{version}/{species}/chromosomes")]
pub async fn handle_chromosomes(
    data: Data<WebServerData>,
    path: Path<(String, String)>,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species) = path.into_inner();
    let ctx = RequestContext::for_version(&data, &req, &version)?;
    let chromosomes = ctx.config().chromosomes(&species).unwrap_or_default();
    Ok(ctx.renderer().render_text(chromosomes))
}

/// Resource categories available for a species.
#[allow(clippy::unused_async)]
#[utoipa::path(
    get,
    operation_id = "categories",
    params(
        ("version" = String, Path, description = "API version or `latest`."),
        ("species" = String, Path, description = "Species code, e.g., `hsapiens`."),
    ),
    responses((status = 200, description = "Categories, one per line.", body = String))
)]
#[get("/{version}/{species}")]
pub async fn handle_categories(
    data: Data<WebServerData>,
    path: Path<(String, String)>,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species) = path.into_inner();
    let ctx = RequestContext::for_version(&data, &req, &version)?;
    Ok(categories_or_catalog(&ctx, &species, CATEGORIES))
}

/// Resources available in a category.
#[allow(clippy::unused_async)]
#[utoipa::path(
    get,
    operation_id = "category",
    params(
        ("version" = String, Path, description = "API version or `latest`."),
        ("species" = String, Path, description = "Species code, e.g., `hsapiens`."),
        ("category" = String, Path, description = "One of `feature`, `genomic`, `network`, `regulatory`."),
    ),
    responses((status = 200, description = "Resources, one per line.", body = String))
)]
#[get("/{version}/{species}/{category}")]
pub async fn handle_category(
    data: Data<WebServerData>,
    path: Path<(String, String, String)>,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species, category) = path.into_inner();
    let ctx = RequestContext::for_version(&data, &req, &version)?;
    Ok(categories_or_catalog(
        &ctx,
        &species,
        category_resources(&category),
    ))
}

/// Same as the category listing; the subcategory is ignored.
#[allow(clippy::unused_async)]
#[get("/{version}/{species}/{category}/{subcategory}")]
pub async fn handle_subcategory(
    data: Data<WebServerData>,
    path: Path<(String, String, String, String)>,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species, category, _) = path.into_inner();
    let ctx = RequestContext::for_version(&data, &req, &version)?;
    Ok(categories_or_catalog(
        &ctx,
        &species,
        category_resources(&category),
    ))
}

#[cfg(test)]
mod test {
    use actix_web::http::header;
    use pretty_assertions::assert_eq;

    use super::super::test::{get, get_json, get_text, header_value};

    #[actix_web::test]
    async fn species_text() -> Result<(), anyhow::Error> {
        let body = get_text("/latest/species").await?;

        assert_eq!(body.lines().count(), 47);
        assert!(body.starts_with("hsa\thuman\tHomo sapiens\tGRCh37.p7\n"));

        Ok(())
    }

    #[actix_web::test]
    async fn species_json() -> Result<(), anyhow::Error> {
        let response = get("/v3/species?of=json").await?;
        assert_eq!(
            header_value(&response, header::CONTENT_TYPE).as_deref(),
            Some("application/json")
        );

        let body = get_json("/v3/species?of=json").await?;
        assert_eq!(body.as_array().map(Vec::len), Some(47));
        assert_eq!(
            body[11],
            serde_json::json!({
                "species": "hsapiens",
                "common": "",
                "scientific": "",
                "assembly": ""
            })
        );

        Ok(())
    }

    #[actix_web::test]
    async fn help_and_version() -> Result<(), anyhow::Error> {
        assert_eq!(get_text("/v3/help").await?, "No help available");
        let version = get_text("/v3/version").await?;
        assert!(version.starts_with("Homo sapiens\tEnsembl 64\n"));
        assert!(version.contains("...\n\nThe rest of nfo will be added soon, sorry"));
        assert!(version
            .ends_with("mor info at:\n\nhttp://docs.bioinfo.cipf.es/projects/variant/wiki/Databases"));

        Ok(())
    }

    #[rstest::rstest]
    #[case("/v3/hsapiens", "feature\ngenomic\nnetwork\nregulatory")]
    #[case("/v3/hsapiens/feature", "exon\ngene\nkaryotype\nprotein\nsnp\ntranscript")]
    #[case("/v3/hsapiens/GENOMIC", "position\nregion\nvariant")]
    #[case("/v3/hsapiens/network", "pathway")]
    #[case("/v3/hsapiens/regulatory/tf", "mirna_gene\nmirna_mature\ntf")]
    #[case("/v3/hsapiens/other", "feature\ngenomic\nnetwork\nregulatory")]
    #[actix_web::test]
    async fn category_listings(
        #[case] uri: &str,
        #[case] expected: &str,
    ) -> Result<(), anyhow::Error> {
        assert_eq!(get_text(uri).await?, expected);

        Ok(())
    }

    #[actix_web::test]
    async fn unknown_species_gives_catalog() -> Result<(), anyhow::Error> {
        let body = get_text("/v3/unicorn").await?;

        assert_eq!(body.lines().count(), 47);

        Ok(())
    }

    #[actix_web::test]
    async fn handle_chromosomes() -> Result<(), anyhow::Error> {
        let body = get_text("/v3/hsapiens/chromosomes").await?;

        insta::assert_snapshot!(body, @"1,2,3,4,5,6,7,8,9,10,11,12,13,14,15,16,17,18,19,20,21,22,X,Y,MT");
        assert_eq!(get_text("/v3/mmu/chromosomes").await?, "");

        Ok(())
    }
}
