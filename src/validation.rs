//! Pre-flight checks run before anything is written.

use crate::entity_schema::read_entity_value;
use crate::error::{CodemodError, Result};
use crate::template::{delimiter_balance, Template, TemplateSource, MANIFEST};
use crate::types::RelationshipKind;
use log::{debug, warn};
use serde_json::Value;
use std::fs;
use std::path::Path;

const PROBE_FILE: &str = ".crudgen-write-probe";

/// Shape-check a descriptor and flag enum fields in place.
///
/// Returns `true` when a field was auto-flagged with `fieldIsEnum`.
pub fn validate_entity(value: &mut Value) -> Result<bool> {
    let name = value.get("name").and_then(Value::as_str).map(str::to_string);
    let fail = |message: String| {
        let err = CodemodError::validation(message);
        match &name {
            Some(name) => err.in_entity(name.clone()),
            None => err,
        }
    };

    let entity = value
        .as_object()
        .ok_or_else(|| fail("descriptor must be a JSON object".into()))?;

    match entity.get("name").and_then(Value::as_str) {
        Some(name) if !name.trim().is_empty() => {}
        _ => return Err(fail("missing entity name".into())),
    }

    let fields = entity
        .get("fields")
        .and_then(Value::as_array)
        .ok_or_else(|| fail("fields must be an array".into()))?;

    for (idx, field) in fields.iter().enumerate() {
        for key in ["fieldName", "fieldType"] {
            if !non_empty_str(field, key) {
                return Err(fail(format!("field #{idx} is missing {key}")));
            }
        }
    }

    match entity.get("relationships") {
        None | Some(Value::Null) => {}
        Some(Value::Array(relationships)) => {
            for (idx, rel) in relationships.iter().enumerate() {
                for key in ["relationshipName", "otherEntityName", "relationshipType"] {
                    if !non_empty_str(rel, key) {
                        return Err(fail(format!("relationship #{idx} is missing {key}")));
                    }
                }

                let kind = rel
                    .get("relationshipType")
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                if kind.parse::<RelationshipKind>().is_err() {
                    let allowed = RelationshipKind::ALL.map(RelationshipKind::as_str).join(", ");
                    return Err(fail(format!(
                        "relationship #{idx} has invalid type '{kind}' (expected one of {allowed})"
                    )));
                }
            }
        }
        Some(_) => return Err(fail("relationships must be an array".into())),
    }

    Ok(flag_enums(value))
}

fn non_empty_str(value: &Value, key: &str) -> bool {
    value
        .get(key)
        .and_then(Value::as_str)
        .is_some_and(|s| !s.trim().is_empty())
}

// Fields carrying `fieldValues` are enums whatever their declared type.
fn flag_enums(value: &mut Value) -> bool {
    let Some(fields) = value.get_mut("fields").and_then(Value::as_array_mut) else {
        return false;
    };

    let mut changed = false;
    for field in fields.iter_mut().filter_map(Value::as_object_mut) {
        let has_values = field
            .get("fieldValues")
            .and_then(Value::as_str)
            .is_some_and(|values| !values.trim().is_empty());
        let flagged = field.get("fieldIsEnum").and_then(Value::as_bool) == Some(true);

        if has_values && !flagged {
            field.insert("fieldIsEnum".into(), Value::Bool(true));
            changed = true;
        }
    }

    changed
}

/// Validate a descriptor file, rewriting it when enum flags were added.
pub fn validate_entity_file(path: &Path) -> Result<Value> {
    let mut value = read_entity_value(path)?;
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    let changed = validate_entity(&mut value).map_err(|e| e.in_entity(stem.clone()))?;

    if changed {
        warn!("{}: flagged enum fields, rewriting descriptor", path.display());
        let mut text = serde_json::to_string_pretty(&value).map_err(|e| {
            CodemodError::runtime("failed to serialize descriptor")
                .in_entity(stem.clone())
                .with_source(e)
        })?;
        text.push('\n');
        fs::write(path, text).map_err(|e| CodemodError::io(path, e).in_entity(stem))?;
    }

    Ok(value)
}

/// Every manifest template must exist, parse, and have balanced delimiters.
pub fn validate_templates(source: &TemplateSource) -> Result<()> {
    for entry in MANIFEST {
        let text = source.load(entry)?;

        let (open, close) = delimiter_balance(&text);
        if open != close {
            return Err(CodemodError::template(format!(
                "{}: mismatched delimiters ({open} '[[' vs {close} ']]')",
                entry.template
            )));
        }

        Template::parse(entry.template, &text)?;
        debug!("template {} ok", entry.template);
    }

    Ok(())
}

/// Refuse to reuse an existing directory unless forced, then probe that it
/// can be written.
pub fn validate_output_dir(dir: &Path, force: bool) -> Result<()> {
    if dir.exists() {
        if !dir.is_dir() {
            return Err(CodemodError::filesystem(format!(
                "{} exists and is not a directory",
                dir.display()
            )));
        }
        if !force {
            return Err(CodemodError::validation(format!(
                "output directory {} already exists (use --force to overwrite)",
                dir.display()
            )));
        }
    }

    fs::create_dir_all(dir).map_err(|e| CodemodError::io(dir, e))?;

    let probe = dir.join(PROBE_FILE);
    fs::write(&probe, b"").map_err(|e| CodemodError::io(&probe, e))?;
    fs::remove_file(&probe).map_err(|e| CodemodError::io(&probe, e))?;

    Ok(())
}
