use crate::config::CodegenConfig;
use crate::entity_schema::{
    list_entity_files, normalize, parse_entity, read_entity_value, resolve_entity_file,
};
use crate::error::{CodemodError, Result};
use crate::template::{ManifestEntry, Template, MANIFEST};
use crate::types::EntityMeta;
use crate::validation::{validate_entity, validate_entity_file, validate_output_dir, validate_templates};
use log::{info, warn};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};

///
/// GenerationReport
///

#[derive(Debug)]
pub struct GenerationReport {
    pub entity: String,
    pub route_dir: PathBuf,
    pub files: Vec<PathBuf>,
    pub dry_run: bool,
}

///
/// RenderedFile
/// path is relative to the output root
///

#[derive(Debug)]
pub struct RenderedFile {
    pub path: PathBuf,
    pub contents: String,
}

///
/// PageGenerator
/// templates are checked and parsed once, then reused for every entity
///

pub struct PageGenerator<'a> {
    config: &'a CodegenConfig,
    templates: Vec<(&'static ManifestEntry, Template)>,
    dry_run: bool,
}

impl<'a> PageGenerator<'a> {
    pub fn new(config: &'a CodegenConfig) -> Result<Self> {
        let source = config.template_source();
        validate_templates(&source)?;

        let templates = MANIFEST
            .iter()
            .map(|entry| {
                let text = source.load(entry)?;
                Ok((entry, Template::parse(entry.template, &text)?))
            })
            .collect::<Result<Vec<_>>>()?;

        info!("loaded {} templates from {source}", templates.len());

        Ok(Self {
            config,
            templates,
            dry_run: false,
        })
    }

    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Render every applicable manifest entry without touching the disk.
    pub fn render(&self, meta: &EntityMeta) -> Result<Vec<RenderedFile>> {
        let data = json!({ "entity": meta });

        self.templates
            .iter()
            .filter(|(entry, _)| entry.applies_to(meta))
            .map(|(entry, template)| {
                Ok(RenderedFile {
                    path: entry.output_path(meta),
                    contents: template.render(&data)?,
                })
            })
            .collect::<Result<Vec<_>>>()
            .map_err(|e| e.in_entity(meta.class_name.clone()))
    }

    /// Generate the entity named `name` (class name, kebab name or file stem).
    pub fn generate_entity(&self, name: &str) -> Result<GenerationReport> {
        let path = resolve_entity_file(&self.config.entities_dir, name)?;

        self.generate_file(&path)
    }

    /// Generate every descriptor in the entities directory. The first
    /// failure aborts the run.
    pub fn generate_all(&self) -> Result<Vec<GenerationReport>> {
        let files = list_entity_files(&self.config.entities_dir)?;

        if files.is_empty() {
            warn!(
                "no entity descriptors in {}",
                self.config.entities_dir.display()
            );
        }

        files.iter().map(|path| self.generate_file(path)).collect()
    }

    pub fn generate_file(&self, path: &Path) -> Result<GenerationReport> {
        let value = if self.dry_run {
            let mut value = read_entity_value(path)?;
            validate_entity(&mut value).map_err(|e| e.in_entity(file_stem(path)))?;
            value
        } else {
            validate_entity_file(path)?
        };

        let descriptor = parse_entity(value)?;
        let meta = normalize(&descriptor, &self.config.api_import_base);
        let route_dir = self.config.route_dir(&meta.route_name);

        info!(
            "generating {} -> {}",
            meta.class_name,
            route_dir.display()
        );

        // a failed render must not leave an empty route directory behind
        let rendered = self.render(&meta)?;

        if !self.dry_run {
            validate_output_dir(&route_dir, self.config.force)
                .map_err(|e| e.in_entity(meta.class_name.clone()))?;
        }

        let mut files = Vec::new();
        for file in rendered {
            let target = self.config.output_dir.join(&file.path);

            if self.dry_run {
                info!("would write {}", target.display());
            } else {
                write_file(&target, &file.contents)
                    .map_err(|e| e.in_entity(meta.class_name.clone()))?;
            }
            files.push(target);
        }

        Ok(GenerationReport {
            entity: meta.class_name,
            route_dir,
            files,
            dry_run: self.dry_run,
        })
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

// Existing files are overwritten unconditionally.
fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| CodemodError::io(parent, e))?;
    }

    if path.exists() {
        warn!("overwriting {}", path.display());
    }

    fs::write(path, contents).map_err(|e| CodemodError::io(path, e))?;
    info!("wrote {}", path.display());

    Ok(())
}
