//! Validation of the version and species path segments.

use crate::common::config::ServerConfig;

use super::params::FormatOptions;

/// Literal version resolved to the configured latest version.
pub const LATEST: &str = "latest";

/// Reasons for rejecting a request before any data access.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Version not valid: '{0}'")]
    Version(String),
    #[error("Species not valid: '{species}' for version: '{version}'")]
    Species { species: String, version: String },
    #[error("No user or password valid")]
    Credentials,
}

/// Validated version and species of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionSpecies {
    /// Concrete version, `latest` already resolved.
    pub version: String,
    pub species: String,
}

/// Resolve `latest` and check that the version is configured.
///
/// Private versions additionally require the configured credentials.
pub fn validate_version(
    config: &ServerConfig,
    version: Option<&str>,
    options: &FormatOptions,
) -> Result<String, ValidationError> {
    let version = version
        .filter(|version| !version.is_empty())
        .ok_or_else(|| ValidationError::Version(String::new()))?;
    let resolved = if version == LATEST {
        config
            .latest_version
            .as_deref()
            .ok_or_else(|| ValidationError::Version(version.to_string()))?
    } else {
        version
    };

    let entry = config
        .version(resolved)
        .ok_or_else(|| ValidationError::Version(resolved.to_string()))?;
    if entry.private
        && (config.private_user != options.user || config.private_password != options.password)
    {
        return Err(ValidationError::Credentials);
    }

    Ok(entry.name.clone())
}

/// Check version and species, in this order.
pub fn validate(
    config: &ServerConfig,
    version: Option<&str>,
    species: Option<&str>,
    options: &FormatOptions,
) -> Result<VersionSpecies, ValidationError> {
    let version = validate_version(config, version, options)?;
    let species = species.filter(|species| !species.is_empty());

    match (species, config.version(&version)) {
        (Some(species), Some(entry)) if entry.allows_species(species) => Ok(VersionSpecies {
            version,
            species: species.to_string(),
        }),
        (species, _) => Err(ValidationError::Species {
            species: species.unwrap_or_default().to_string(),
            version,
        }),
    }
}
