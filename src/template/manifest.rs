use crate::error::{CodemodError, Result};
use crate::types::EntityMeta;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

///
/// ManifestEntry
/// one template and where its output lands, relative to the output root
///

#[derive(Clone, Copy, Debug)]
pub struct ManifestEntry {
    pub template: &'static str,
    pub output: &'static str, // `{route}` and `{file}` are substituted
    pub skip_read_only: bool,
    builtin: &'static str,
}

impl ManifestEntry {
    pub fn output_path(&self, meta: &EntityMeta) -> PathBuf {
        let relative = self
            .output
            .replace("{route}", &meta.route_name)
            .replace("{file}", &meta.file_name);

        relative.split('/').collect()
    }

    pub fn applies_to(&self, meta: &EntityMeta) -> bool {
        !(self.skip_read_only && meta.read_only)
    }
}

pub const MANIFEST: &[ManifestEntry] = &[
    ManifestEntry {
        template: "page.tsx.tpl",
        output: "{route}/page.tsx",
        skip_read_only: false,
        builtin: include_str!("../../templates/page.tsx.tpl"),
    },
    ManifestEntry {
        template: "new-page.tsx.tpl",
        output: "{route}/new/page.tsx",
        skip_read_only: true,
        builtin: include_str!("../../templates/new-page.tsx.tpl"),
    },
    ManifestEntry {
        template: "details-page.tsx.tpl",
        output: "{route}/[id]/page.tsx",
        skip_read_only: false,
        builtin: include_str!("../../templates/details-page.tsx.tpl"),
    },
    ManifestEntry {
        template: "edit-page.tsx.tpl",
        output: "{route}/[id]/edit/page.tsx",
        skip_read_only: true,
        builtin: include_str!("../../templates/edit-page.tsx.tpl"),
    },
    ManifestEntry {
        template: "entity-table.tsx.tpl",
        output: "{route}/components/{file}-table.tsx",
        skip_read_only: false,
        builtin: include_str!("../../templates/entity-table.tsx.tpl"),
    },
    ManifestEntry {
        template: "entity-details.tsx.tpl",
        output: "{route}/components/{file}-details.tsx",
        skip_read_only: false,
        builtin: include_str!("../../templates/entity-details.tsx.tpl"),
    },
    ManifestEntry {
        template: "entity-form.tsx.tpl",
        output: "{route}/components/{file}-form.tsx",
        skip_read_only: true,
        builtin: include_str!("../../templates/entity-form.tsx.tpl"),
    },
    ManifestEntry {
        template: "form-schema.ts.tpl",
        output: "{route}/components/{file}-form-schema.ts",
        skip_read_only: true,
        builtin: include_str!("../../templates/form-schema.ts.tpl"),
    },
];

///
/// TemplateSource
/// a configured directory replaces the built-in set entirely
///

#[derive(Clone, Debug, Default)]
pub enum TemplateSource {
    #[default]
    Builtin,
    Directory(PathBuf),
}

impl TemplateSource {
    pub fn from_dir(dir: Option<&Path>) -> Self {
        dir.map_or(Self::Builtin, |dir| Self::Directory(dir.to_path_buf()))
    }

    pub fn load(&self, entry: &ManifestEntry) -> Result<String> {
        match self {
            Self::Builtin => Ok(entry.builtin.to_string()),
            Self::Directory(dir) => {
                let path = dir.join(entry.template);
                debug!("loading template {}", path.display());

                if !path.is_file() {
                    return Err(CodemodError::template(format!(
                        "missing template {}",
                        path.display()
                    )));
                }

                fs::read_to_string(&path).map_err(|e| CodemodError::io(&path, e))
            }
        }
    }
}

impl std::fmt::Display for TemplateSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Builtin => f.write_str("built-in templates"),
            Self::Directory(dir) => write!(f, "{}", dir.display()),
        }
    }
}
