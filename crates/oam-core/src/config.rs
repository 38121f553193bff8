use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::extract::{DEFAULT_EXTERNAL_TAG, Extractor};
use crate::merge::CombineOptions;
use crate::select::SelectionOptions;

/// Top-level project configuration loaded from `.oam.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OamConfig {
    /// Base document the sources are merged into.
    pub template: String,
    /// Source documents. Directories expand to the `*.yaml`, `*.yml` and
    /// `*.json` files they contain.
    pub inputs: Vec<String>,
    /// Directory of upstream documents matched to sources by title.
    pub upstream: Option<String>,
    pub output: String,
    pub selection: SelectionConfig,
    pub extract: ExtractConfig,
}

impl Default for OamConfig {
    fn default() -> Self {
        Self {
            template: "base.yaml".to_string(),
            inputs: vec!["apis".to_string()],
            upstream: None,
            output: "docs".to_string(),
            selection: SelectionConfig::default(),
            extract: ExtractConfig::default(),
        }
    }
}

impl OamConfig {
    pub fn selection_options(&self) -> SelectionOptions {
        SelectionOptions {
            domain: self.selection.domain.clone(),
            excluded: self.selection.excluded.clone(),
        }
    }

    pub fn combine_options(&self) -> CombineOptions {
        CombineOptions::new(self.selection.domain.clone())
    }

    /// The extractor to run, if extraction is enabled.
    pub fn extractor(&self) -> Option<Extractor> {
        self.extract
            .enabled
            .then(|| Extractor::new(self.extract.tag.clone()))
    }
}

/// Which sources take part in a run.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Substring identifying the public server. Empty accepts every source
    /// and leaves the template's servers in place.
    pub domain: String,
    /// Titles that are never merged.
    pub excluded: Vec<String>,
}

/// Tag-scoped extraction before merging.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    pub enabled: bool,
    pub tag: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            tag: DEFAULT_EXTERNAL_TAG.to_string(),
        }
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".oam.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<OamConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let config: OamConfig =
        serde_yaml_ng::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# oam configuration - https://github.com/urmzd/openapi-merge
template: base.yaml     # document the sources are merged into
inputs:                 # files, or directories of *.yaml / *.json
  - apis
# upstream: upstream    # directory of documents overriding parameter styles
output: docs

selection:
  domain: ""            # only merge sources with a server URL containing this;
                        # the first such server becomes the composite's server
  excluded: []
    # - Legacy API

extract:
  enabled: false        # keep only operations tagged below, prune unused schemas
  tag: external
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OamConfig::default();
        assert_eq!(config.template, "base.yaml");
        assert_eq!(config.inputs, vec!["apis".to_string()]);
        assert_eq!(config.output, "docs");
        assert!(config.upstream.is_none());
        assert!(config.selection.domain.is_empty());
        assert!(!config.extract.enabled);
        assert_eq!(config.extract.tag, "external");
        assert!(config.extractor().is_none());
    }

    #[test]
    fn test_parse_config_yaml() {
        let yaml = r#"
template: templates/platform.yaml
inputs:
  - apis/orders.yaml
  - apis/billing
upstream: upstream
output: public
selection:
  domain: api.example.org
  excluded: [Legacy API]
extract:
  enabled: true
  tag: partner
"#;
        let config: OamConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.template, "templates/platform.yaml");
        assert_eq!(config.inputs.len(), 2);
        assert_eq!(config.upstream.as_deref(), Some("upstream"));
        assert_eq!(config.output, "public");
        assert_eq!(config.selection_options().excluded, vec!["Legacy API"]);
        assert_eq!(config.combine_options().domain, "api.example.org");
        assert_eq!(config.extractor().unwrap().tag(), "partner");
    }

    #[test]
    fn test_parse_minimal_config() {
        let yaml = "output: site\n";
        let config: OamConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.output, "site");
        // Defaults applied
        assert_eq!(config.template, "base.yaml");
        assert_eq!(config.extract.tag, "external");
    }

    #[test]
    fn test_default_content_parses() {
        let config: OamConfig = serde_yaml_ng::from_str(default_config_content()).unwrap();
        assert_eq!(config.inputs, vec!["apis".to_string()]);
        assert!(!config.extract.enabled);
    }

    #[test]
    fn test_load_config_missing_and_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        assert!(load_config(&path).unwrap().is_none());

        std::fs::write(&path, "inputs: {not: [a list\n").unwrap();
        assert!(matches!(
            load_config(&path),
            Err(ConfigError::Parse { .. })
        ));

        std::fs::write(&path, default_config_content()).unwrap();
        let config = load_config(&path).unwrap().unwrap();
        assert_eq!(config.output, "docs");
    }
}
