use crate::error::{CodemodError, Result};
use crate::template::TemplateSource;
use log::debug;
use serde_derive::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "crudgen.toml";

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct CodegenConfig {
    /// Directory holding one JSON descriptor per entity.
    pub entities_dir: PathBuf,
    /// Root the route directories are generated under.
    pub output_dir: PathBuf,
    /// Replaces the built-in templates when set.
    pub templates_dir: Option<PathBuf>,
    /// Module prefix of the generated REST client endpoints.
    pub api_import_base: String,
    pub force: bool,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            entities_dir: PathBuf::from(".jhipster"),
            output_dir: PathBuf::from("src/app/(protected)"),
            templates_dir: None,
            api_import_base: "@/core/api/generated/spring/endpoints".into(),
            force: false,
        }
    }
}

impl CodegenConfig {
    /// Read `path`, falling back to defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let text = fs::read_to_string(path).map_err(|e| CodemodError::io(path, e))?;

        toml::from_str(&text).map_err(|e| {
            CodemodError::runtime(format!("invalid config {}: {e}", path.display())).with_source(e)
        })
    }

    pub fn template_source(&self) -> TemplateSource {
        TemplateSource::from_dir(self.templates_dir.as_deref())
    }

    /// Route directory an entity's files are generated into.
    pub fn route_dir(&self, route_name: &str) -> PathBuf {
        self.output_dir.join(route_name)
    }
}

/// Write the default configuration, refusing to clobber an existing file.
pub fn write_config(path: &Path, config: &CodegenConfig, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(CodemodError::validation(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }

    let text = toml::to_string_pretty(config).map_err(|e| {
        CodemodError::runtime("failed to serialize config").with_source(e)
    })?;

    fs::write(path, text).map_err(|e| CodemodError::io(path, e))
}
