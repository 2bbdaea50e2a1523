//! Dump the OpenAPI schema of the REST API server.

use std::{
    fs::File,
    io::{self, Write},
    path::PathBuf,
};

use utoipa::OpenApi as _;

use crate::server::run::openapi::ApiDoc;

/// Serialization of the dumped schema.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum SchemaFormat {
    #[default]
    Yaml,
    Json,
}

/// Command line arguments for `server schema` sub command.
#[derive(clap::Parser, Debug, Clone)]
#[command(author, version, about = "Dump REST API schema", long_about = None)]
pub struct Args {
    /// Path to the output file.  Use stdout if missing.
    #[arg(long)]
    pub output_file: Option<PathBuf>,

    /// Output serialization.
    #[arg(long, value_enum, default_value_t = SchemaFormat::Yaml)]
    pub format: SchemaFormat,
}

impl Args {
    /// Get writeable output file or stdout.
    fn get_output(&self) -> Result<Box<dyn Write>, io::Error> {
        match self.output_file {
            Some(ref path) => File::create(path).map(|f| Box::new(f) as Box<dyn Write>),
            None => Ok(Box::new(io::stdout())),
        }
    }
}

/// The schema of all documented endpoints in `format`.
pub fn render_schema(format: SchemaFormat) -> Result<String, anyhow::Error> {
    let api = ApiDoc::openapi();
    match format {
        SchemaFormat::Yaml => api
            .to_yaml()
            .map_err(|e| anyhow::anyhow!("Failed to convert OpenAPI to YAML: {}", e)),
        SchemaFormat::Json => api
            .to_pretty_json()
            .map_err(|e| anyhow::anyhow!("Failed to convert OpenAPI to JSON: {}", e)),
    }
}

/// Main entry point for `server schema` sub command.
///
/// # Errors
///
/// If the schema cannot be serialized or written.
pub fn run(args_common: &crate::common::Args, args: &Args) -> Result<(), anyhow::Error> {
    tracing::info!("args_common = {:?}", &args_common);
    tracing::info!("args = {:?}", &args);

    let schema = render_schema(args.format)?;
    let mut output = args
        .get_output()
        .map_err(|e| anyhow::anyhow!("Failed to open output file: {}", e))?;
    write!(output, "{}", &schema).map_err(|e| anyhow::anyhow!("Failed to write output: {}", e))?;

    tracing::info!("All done. Have a nice day!");
    Ok(())
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use temp_testdir::TempDir;

    use super::*;

    #[test]
    fn json_documents_meta_endpoints() -> Result<(), anyhow::Error> {
        let schema: serde_json::Value = serde_json::from_str(&render_schema(SchemaFormat::Json)?)?;
        let mut paths = schema["paths"]
            .as_object()
            .map(|paths| paths.keys().cloned().collect::<Vec<_>>())
            .unwrap_or_default();
        paths.sort();

        assert_eq!(
            paths,
            vec![
                "/{version}/help",
                "/{version}/species",
                "/{version}/version",
                "/{version}/{species}",
                "/{version}/{species}/chromosomes",
                "/{version}/{species}/{category}",
            ]
        );
        assert!(schema["components"]["schemas"]["Species"].is_object());

        Ok(())
    }

    #[test]
    fn run_writes_yaml_file() -> Result<(), anyhow::Error> {
        let tmp_dir = TempDir::default();
        let output_file = tmp_dir.join("openapi.yaml");
        let args = Args {
            output_file: Some(output_file.clone()),
            format: SchemaFormat::Yaml,
        };

        run(&crate::common::Args::default(), &args)?;

        let written = std::fs::read_to_string(&output_file)?;
        assert!(written.contains("openapi:"));
        assert!(written.contains("/{version}/species"));

        Ok(())
    }
}
