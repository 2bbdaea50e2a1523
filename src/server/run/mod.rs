use std::path::PathBuf;
use std::sync::Arc;

use crate::common::config::ServerConfig;
use crate::db::memory::MemoryDbAdaptorFactory;

/// Implementation of Actix server.
pub mod actix_server;

/// Module with OpenAPI documentation.
pub mod openapi {
    use crate::reference::species::Species;

    use super::actix_server::{meta, CustomError};

    /// Utoipa-based `OpenAPI` generation helper.
    #[derive(utoipa::OpenApi)]
    #[openapi(
        info(title = "CellBase web services"),
        paths(
            meta::handle_species,
            meta::handle_version,
            meta::handle_help,
            meta::handle_chromosomes,
            meta::handle_categories,
            meta::handle_category,
        ),
        components(schemas(CustomError, Species))
    )]
    pub struct ApiDoc;
}

/// Command line arguments for `server run` command.
#[derive(clap::Parser, Debug)]
#[command(about = "Run CellBase REST API server", long_about = None)]
pub struct Args {
    /// Path to the YAML server configuration.
    #[arg(long)]
    pub path_config: PathBuf,

    /// Directory with one sub directory per version holding `<species>.json` databases.
    #[arg(long)]
    pub path_db: PathBuf,

    /// Whether to suppress printing hints.
    #[arg(long, default_value_t = false)]
    pub suppress_hints: bool,

    /// IP to listen on.
    #[arg(long, default_value = "127.0.0.1")]
    pub listen_host: String,

    /// Port to listen on.
    #[arg(long, default_value_t = 8080)]
    pub listen_port: u16,
}

/// Print some hints via `tracing::info!`.
fn print_hints(args: &Args, config: &ServerConfig) {
    tracing::info!(
        "Launching server main on http://{}:{} ...",
        args.listen_host.as_str(),
        args.listen_port
    );

    if args.suppress_hints {
        return;
    }

    let prefix = format!(
        "  try: http://{host}:{port}/{version}/hsapiens/",
        host = args.listen_host,
        port = args.listen_port,
        version = config.latest_version.as_deref().unwrap_or("latest"),
    );
    for example in [
        "feature/gene/BRCA2/info",
        "feature/transcript/ENST00000380152/fullinfo?of=json",
        "feature/snp/rs80357713/consequence_type",
        "genomic/region/13:32889611-32889700/gene",
        "genomic/region/13?histogram=true&interval=100000&of=json",
        "regulatory/mirna_mature/hsa-let-7a-5p/target?source=TarBase",
        "network/pathway/list?subpathways=false",
    ] {
        tracing::info!("{}{}", prefix, example);
    }
    tracing::info!(
        "  API documentation: http://{}:{}/swagger-ui/",
        args.listen_host.as_str(),
        args.listen_port
    );
}

/// Main entry point for `server run` sub command.
///
/// # Errors
///
/// In the case that there is an error running the server.
pub async fn run(args_common: &crate::common::Args, args: &Args) -> Result<(), anyhow::Error> {
    tracing::info!("args_common = {:?}", &args_common);
    tracing::info!("args = {:?}", &args);

    if let Some(log::Level::Trace | log::Level::Debug) = args_common.verbose.log_level() {
        std::env::set_var("RUST_LOG", "debug");
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    tracing::info!("Loading configuration...");
    let config = ServerConfig::load(&args.path_config)?;
    tracing::debug!("config = {:?}", &config);

    tracing::info!("Loading databases...");
    let before_loading = std::time::Instant::now();
    let db = MemoryDbAdaptorFactory::load_dir(&args.path_db)?;
    if db.is_empty() {
        tracing::warn!("No databases found below {}", args.path_db.display());
    }
    tracing::info!(
        "...done loading {} database(s) {:?}",
        db.len(),
        before_loading.elapsed()
    );

    print_hints(args, &config);
    let data = actix_web::web::Data::new(actix_server::WebServerData::new(config, Arc::new(db)));
    actix_server::main(args, data).await?;

    tracing::info!("All done. Have a nice day!");
    Ok(())
}
