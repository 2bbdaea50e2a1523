//! Process-wide server configuration, loaded once from a YAML file.

use std::path::Path;

use indexmap::IndexMap;

/// Placeholder used in text output for identifiers without a result.
pub const DEFAULT_NOT_FOUND: &str = "not found";

/// One API version and the species it serves.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct VersionEntry {
    /// Version name as it appears in the URL, e.g., `v3`.
    pub name: String,
    /// Species codes allowed for this version.
    #[serde(default)]
    pub species: Vec<String>,
    /// Private versions require the configured user and password.
    #[serde(default)]
    pub private: bool,
}

impl VersionEntry {
    /// Whether `species` is served by this version (exact match).
    pub fn allows_species(&self, species: &str) -> bool {
        self.species.iter().any(|s| s == species)
    }
}

/// Read-only configuration shared by all request handlers.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Concrete version that `latest` resolves to.
    pub latest_version: Option<String>,
    /// Available versions, in configuration order.
    pub versions: Vec<VersionEntry>,
    /// User name that unlocks private versions.
    pub private_user: String,
    /// Password that unlocks private versions.
    pub private_password: String,
    /// Comma separated chromosome names per species.
    pub chromosomes: IndexMap<String, String>,
    /// Text placeholder for "no result".
    pub not_found: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            latest_version: None,
            versions: Vec::new(),
            private_user: String::new(),
            private_password: String::new(),
            chromosomes: IndexMap::new(),
            not_found: DEFAULT_NOT_FOUND.to_string(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from the YAML file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("could not read config file {}: {}", path.display(), e)
        })?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(content: &str) -> Result<Self, anyhow::Error> {
        let config: ServerConfig = serde_yaml::from_str(content)
            .map_err(|e| anyhow::anyhow!("could not parse config YAML: {}", e))?;
        if let Some(latest) = config.latest_version.as_ref() {
            if config.version(latest).is_none() {
                tracing::warn!(
                    "latest version {:?} is not among the configured versions",
                    latest
                );
            }
        }
        Ok(config)
    }

    /// Look up a version entry by name.
    pub fn version(&self, name: &str) -> Option<&VersionEntry> {
        self.versions.iter().find(|entry| entry.name == name)
    }

    /// Chromosome list configured for `species`, key matched ignoring case.
    pub fn chromosomes(&self, species: &str) -> Option<&str> {
        self.chromosomes
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(species))
            .map(|(_, value)| value.as_str())
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    const CONFIG: &str = r#"
latest_version: v3
versions:
  - name: v3
    species: [hsa, hsapiens]
  - name: v4
    species: [hsapiens]
    private: true
private_user: admin
private_password: secret
chromosomes:
  hsapiens: "1,2,X"
"#;

    #[test]
    fn from_yaml() -> Result<(), anyhow::Error> {
        let config = ServerConfig::from_yaml(CONFIG)?;

        assert_eq!(config.latest_version.as_deref(), Some("v3"));
        assert_eq!(config.versions.len(), 2);
        assert!(!config.versions[0].private);
        assert!(config.versions[1].private);
        assert_eq!(config.not_found, DEFAULT_NOT_FOUND);

        Ok(())
    }

    #[test]
    fn version_lookup() -> Result<(), anyhow::Error> {
        let config = ServerConfig::from_yaml(CONFIG)?;

        assert!(config.version("v3").is_some_and(|v| v.allows_species("hsa")));
        assert!(config.version("v4").is_some_and(|v| !v.allows_species("hsa")));
        assert!(config.version("v5").is_none());

        Ok(())
    }

    #[test]
    fn chromosomes_ignore_case() -> Result<(), anyhow::Error> {
        let config = ServerConfig::from_yaml(CONFIG)?;

        assert_eq!(config.chromosomes("HSAPIENS"), Some("1,2,X"));
        assert_eq!(config.chromosomes("mmusculus"), None);

        Ok(())
    }

    #[test]
    fn load_from_file() -> Result<(), anyhow::Error> {
        let temp = temp_testdir::TempDir::default();
        let path = temp.join("config.yaml");
        std::fs::write(&path, CONFIG)?;

        let config = ServerConfig::load(&path)?;
        assert_eq!(config.private_user, "admin");

        Ok(())
    }

    #[test]
    fn load_missing_file() {
        assert!(ServerConfig::load("/does/not/exist.yaml").is_err());
    }

    #[test]
    fn empty_yaml_gives_defaults() -> Result<(), anyhow::Error> {
        assert_eq!(ServerConfig::from_yaml("{}")?, ServerConfig::default());

        Ok(())
    }
}
