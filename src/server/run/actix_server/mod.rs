//! Run the server.

use std::sync::Arc;

use actix_web::{
    body::BoxBody,
    http::StatusCode,
    web::{self, Data, Path},
    HttpRequest, HttpResponse, ResponseError,
};
use utoipa::OpenApi as _;

use crate::common::config::ServerConfig;
use crate::db::{DbAdaptorFactory, DbResult};
use crate::server::response::{
    error::{self, cors_header, error_body},
    params::{first, query_map, FormatOptions, OutputFormat, QueryMap},
    render::ResponseRenderer,
    validate::{self, VersionSpecies},
    TEXT_PLAIN,
};

pub mod exon;
pub mod gene;
pub mod karyotype;
pub mod meta;
pub mod mirna_gene;
pub mod mirna_mature;
pub mod pathway;
pub mod position;
pub mod protein;
pub mod region;
pub mod snp;
pub mod tf;
pub mod transcript;

/// Failure of a request, reported in-band with status 200.
#[derive(Debug, serde::Serialize, utoipa::ToSchema)]
pub struct CustomError {
    err: String,
    #[serde(skip)]
    output_format: OutputFormat,
}

impl std::fmt::Display for CustomError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.err)
    }
}

impl CustomError {
    fn new(err: anyhow::Error, options: &FormatOptions) -> Self {
        CustomError {
            err: err.to_string(),
            output_format: options.output_format.clone(),
        }
    }
}

impl ResponseError for CustomError {
    fn status_code(&self) -> StatusCode {
        StatusCode::OK
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        tracing::debug!("error response: {}", &self.err);
        HttpResponse::Ok()
            .content_type(TEXT_PLAIN)
            .insert_header(cors_header())
            .body(error_body(&self.output_format, &self.err))
    }
}

/// Data structure for the web server data.
#[derive(derivative::Derivative)]
#[derivative(Debug)]
pub struct WebServerData {
    /// Versions, species and credentials.
    pub config: ServerConfig,
    /// Source of the per-entity adaptors.
    #[derivative(Debug = "ignore")]
    pub db: Arc<dyn DbAdaptorFactory>,
}

impl WebServerData {
    pub fn new(config: ServerConfig, db: Arc<dyn DbAdaptorFactory>) -> Self {
        Self { config, db }
    }
}

/// Per-request state: parsed options and the validated version and species.
///
/// Construction fails before any data access if validation fails.
pub struct RequestContext<'a> {
    data: &'a WebServerData,
    query: QueryMap,
    pub options: FormatOptions,
    pub target: VersionSpecies,
}

impl<'a> RequestContext<'a> {
    /// Validate `version` and `species` for a data endpoint.
    pub fn new(
        data: &'a WebServerData,
        req: &HttpRequest,
        version: &str,
        species: &str,
    ) -> Result<Self, CustomError> {
        let query = query_map(req.query_string());
        let options = FormatOptions::from_query(&query);
        let target = validate::validate(&data.config, Some(version), Some(species), &options)
            .map_err(|e| CustomError::new(e.into(), &options))?;
        tracing::debug!("{} for {:?}", req.path(), &target);

        Ok(Self {
            data,
            query,
            options,
            target,
        })
    }

    /// Validate only `version`, for endpoints not bound to a species.
    pub fn for_version(
        data: &'a WebServerData,
        req: &HttpRequest,
        version: &str,
    ) -> Result<Self, CustomError> {
        let query = query_map(req.query_string());
        let options = FormatOptions::from_query(&query);
        let version = validate::validate_version(&data.config, Some(version), &options)
            .map_err(|e| CustomError::new(e.into(), &options))?;

        Ok(Self {
            data,
            query,
            options,
            target: VersionSpecies {
                version,
                species: String::new(),
            },
        })
    }

    pub fn config(&self) -> &ServerConfig {
        &self.data.config
    }

    /// First value of an endpoint specific query parameter.
    pub fn param(&self, key: &str) -> Option<&str> {
        first(&self.query, &[key])
    }

    /// Comma separated values of a query parameter, empty when absent.
    pub fn param_list(&self, key: &str) -> Vec<String> {
        self.param(key)
            .filter(|value| !value.is_empty())
            .map(crate::common::split_ids)
            .unwrap_or_default()
    }

    /// Run `f` against the adaptor factory for the validated species and version.
    pub fn query<T>(
        &self,
        f: impl FnOnce(&dyn DbAdaptorFactory, &str, &str) -> DbResult<T>,
    ) -> Result<T, CustomError> {
        f(
            self.data.db.as_ref(),
            &self.target.species,
            &self.target.version,
        )
        .map_err(|e| self.error(e.into()))
    }

    pub fn error(&self, err: anyhow::Error) -> CustomError {
        CustomError::new(err, &self.options)
    }

    pub fn renderer(&self) -> ResponseRenderer<'_> {
        ResponseRenderer::new(&self.options, &self.data.config.not_found)
    }
}

/// Path of endpoints taking `{version}`, `{species}` and a comma separated list.
pub type IdsPath = Path<(String, String, String)>;

/// Text listing the resources below an endpoint group.
pub fn usage(resources: &[&str]) -> String {
    let mut text = String::from("Usage:\n");
    for resource in resources {
        text.push('\t');
        text.push_str(resource);
        text.push('\n');
    }
    text
}

/// Answer for routes that match no endpoint.
async fn unknown_route(req: HttpRequest) -> HttpResponse {
    error::error_message(format!("resource not found: {}", req.path()))
}

/// Register all endpoints, most specific routes first.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(meta::handle_species)
        .service(meta::handle_version)
        .service(meta::handle_help);
    gene::configure(cfg);
    transcript::configure(cfg);
    exon::configure(cfg);
    protein::configure(cfg);
    snp::configure(cfg);
    karyotype::configure(cfg);
    region::configure(cfg);
    position::configure(cfg);
    tf::configure(cfg);
    mirna_gene::configure(cfg);
    mirna_mature::configure(cfg);
    pathway::configure(cfg);
    cfg.service(meta::handle_chromosomes)
        .service(meta::handle_categories)
        .service(meta::handle_category)
        .service(meta::handle_subcategory)
        .default_service(web::to(unknown_route));
}

/// Main entry point for running the REST server.
#[allow(clippy::unused_async)]
pub async fn main(args: &super::Args, data: Data<WebServerData>) -> std::io::Result<()> {
    actix_web::HttpServer::new(move || {
        actix_web::App::new()
            .app_data(data.clone())
            .service(
                utoipa_swagger_ui::SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", super::openapi::ApiDoc::openapi()),
            )
            .configure(configure)
            .wrap(actix_web::middleware::Logger::default())
    })
    .bind((args.listen_host.as_str(), args.listen_port))?
    .run()
    .await
}

#[cfg(test)]
pub(crate) mod test {
    use actix_web::{dev::ServiceResponse, http::header, test as actix_test, App};

    use crate::common::config::ServerConfig;
    use crate::db::memory::{test::TEST_DB_DIR, MemoryDbAdaptorFactory};
    use pretty_assertions::assert_eq;

    use super::*;

    pub(crate) const TEST_CONFIG: &str = "tests/data/config.yaml";

    pub(crate) fn web_server_data() -> Result<Data<WebServerData>, anyhow::Error> {
        let config = ServerConfig::load(TEST_CONFIG)?;
        let db = MemoryDbAdaptorFactory::load_dir(TEST_DB_DIR)?;
        Ok(Data::new(WebServerData::new(config, Arc::new(db))))
    }

    /// Response of a GET request against all endpoints.
    pub(crate) async fn get(uri: &str) -> Result<ServiceResponse, anyhow::Error> {
        let app = actix_test::init_service(
            App::new()
                .app_data(web_server_data()?)
                .configure(configure),
        )
        .await;
        let req = actix_test::TestRequest::get().uri(uri).to_request();
        Ok(actix_test::call_service(&app, req).await)
    }

    /// Body of a GET request as text.
    pub(crate) async fn get_text(uri: &str) -> Result<String, anyhow::Error> {
        let response = get(uri).await?;
        assert_eq!(response.status(), StatusCode::OK);
        let body = actix_test::read_body(response).await;
        Ok(String::from_utf8(body.to_vec())?)
    }

    /// Body of a GET request parsed as JSON.
    pub(crate) async fn get_json(uri: &str) -> Result<serde_json::Value, anyhow::Error> {
        Ok(serde_json::from_str(&get_text(uri).await?)?)
    }

    pub(crate) fn header_value(response: &ServiceResponse, name: header::HeaderName) -> Option<String> {
        response
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    #[actix_web::test]
    async fn invalid_version_is_in_band() -> Result<(), anyhow::Error> {
        let response = get("/v1/hsapiens/feature/gene/BRCA2/info").await?;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            header_value(&response, header::ACCESS_CONTROL_ALLOW_ORIGIN).as_deref(),
            Some("*")
        );
        let body = actix_test::read_body(response).await;
        assert_eq!(&body[..], b"An error occurred: Version not valid: 'v1'");

        Ok(())
    }

    #[actix_web::test]
    async fn invalid_species_as_json() -> Result<(), anyhow::Error> {
        let body = get_json("/latest/mmu/feature/gene/BRCA2/info?of=json").await?;

        assert_eq!(
            body,
            serde_json::json!({ "error": "Species not valid: 'mmu' for version: 'v3'" })
        );

        Ok(())
    }

    #[actix_web::test]
    async fn private_version_requires_credentials() -> Result<(), anyhow::Error> {
        let body = get_text("/v4/hsapiens/feature/gene/BRCA2/info").await?;
        assert_eq!(body, "An error occurred: No user or password valid");

        let body = get_text("/v4/hsapiens/feature/gene/BRCA2/info?user=admin&password=secret")
            .await?;
        assert_eq!(
            body,
            "An error occurred: no database available for species 'hsapiens' and version 'v4'"
        );

        Ok(())
    }

    #[actix_web::test]
    async fn missing_database_is_reported() -> Result<(), anyhow::Error> {
        let body = get_text("/v3/hsa/feature/gene/BRCA2/info").await?;

        assert_eq!(
            body,
            "An error occurred: no database available for species 'hsa' and version 'v3'"
        );

        Ok(())
    }

    #[actix_web::test]
    async fn unknown_route() -> Result<(), anyhow::Error> {
        let body = get_text("/v3/hsapiens/feature/gene/BRCA2/info/extra").await?;

        assert_eq!(
            body,
            "ERROR: resource not found: /v3/hsapiens/feature/gene/BRCA2/info/extra"
        );

        Ok(())
    }

    #[test]
    fn usage_lists_resources() {
        insta::assert_snapshot!(usage(&["/{ids}/info", "/help"]).replace('\t', "  ").trim_end(), @r###"
        Usage:
          /{ids}/info
          /help
        "###);
    }
}
