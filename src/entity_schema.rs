use crate::descriptor::{EntityDescriptor, RelationshipDescriptor};
use crate::error::{CodemodError, Result};
use crate::field_mapping::field_mapping;
use crate::naming::{camel, humanize, kebab, pascal, pluralize};
use crate::types::{
    EntityMeta, FieldKind, HookImport, PaginationMode, RelationshipKind, RelationshipMeta,
};
use log::debug;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Every `*.json` descriptor in `dir`, sorted by file name.
pub fn list_entity_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| CodemodError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| CodemodError::io(dir, e))?.path();

        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();

    Ok(files)
}

/// Find the descriptor for `name`, accepting `CallType`, `call-type` or the file stem.
pub fn resolve_entity_file(dir: &Path, name: &str) -> Result<PathBuf> {
    let wanted = kebab(name);

    list_entity_files(dir)?
        .into_iter()
        .find(|path| {
            path.file_stem()
                .and_then(|stem| stem.to_str())
                .is_some_and(|stem| stem.eq_ignore_ascii_case(name) || kebab(stem) == wanted)
        })
        .ok_or_else(|| {
            CodemodError::entity(format!(
                "no descriptor found in {}",
                dir.display()
            ))
            .in_entity(name)
        })
}

pub fn read_entity_value(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path).map_err(|e| CodemodError::io(path, e))?;

    serde_json::from_str(&text).map_err(|e| {
        CodemodError::entity(format!("{}: invalid JSON: {e}", path.display())).with_source(e)
    })
}

pub fn parse_entity(value: Value) -> Result<EntityDescriptor> {
    let name = value
        .get("name")
        .and_then(Value::as_str)
        .map(str::to_string);

    serde_json::from_value(value).map_err(|e| {
        let err = CodemodError::entity(format!("descriptor does not match the entity shape: {e}"))
            .with_source(e);
        match name {
            Some(name) => err.in_entity(name),
            None => err,
        }
    })
}

pub fn read_entity(path: &Path) -> Result<EntityDescriptor> {
    parse_entity(read_entity_value(path)?)
}

/// Derive the naming variants, field and relationship descriptors the
/// templates are rendered against. Never fails; missing data yields defaults.
pub fn normalize(entity: &EntityDescriptor, api_import_base: &str) -> EntityMeta {
    let class_name = pascal(&entity.name);
    let class_name_plural = pluralize(&class_name);
    let file_name = kebab(&class_name);
    let api_resource = format!("{file_name}-resource");
    let pagination = PaginationMode::parse(entity.pagination.as_deref());
    let has_dto = entity.dto.as_deref().is_some_and(|dto| dto != "no");

    debug!("normalizing entity {class_name}");

    let fields: Vec<_> = entity.fields.iter().map(field_mapping).collect();
    let relationships: Vec<_> = entity
        .relationships
        .iter()
        .map(|rel| relationship_mapping(rel, api_import_base))
        .collect();

    let mut relationship_imports: Vec<HookImport> = Vec::new();
    for rel in relationships.iter().filter(|rel| rel.in_form) {
        if !relationship_imports.iter().any(|import| import.hook == rel.fetch_hook) {
            relationship_imports.push(HookImport {
                hook: rel.fetch_hook.clone(),
                path: rel.api_import.clone(),
            });
        }
    }

    EntityMeta {
        instance_name: camel(&class_name),
        instance_name_plural: camel(&class_name_plural),
        route_name: kebab(&class_name_plural),
        display_name: humanize(&class_name),
        display_name_plural: humanize(&class_name_plural),
        api_import: resource_import(api_import_base, &file_name),
        api_resource,
        fetch_hook: format!("useGetAll{class_name_plural}"),
        count_hook: format!("useCount{class_name_plural}"),
        get_hook: format!("useGet{class_name}"),
        create_hook: format!("useCreate{class_name}"),
        update_hook: format!("useUpdate{class_name}"),
        delete_hook: format!("useDelete{class_name}"),
        dto_type: if has_dto {
            format!("{class_name}DTO")
        } else {
            class_name.clone()
        },
        read_only: entity.read_only,
        pagination,
        paginated: pagination == PaginationMode::Pagination,
        infinite_scroll: pagination == PaginationMode::InfiniteScroll,
        has_service: entity.service.as_deref().is_some_and(|service| service != "no"),
        has_dto,
        has_enums: fields.iter().any(|f| f.kind == FieldKind::Enum),
        has_dates: fields.iter().any(|f| f.kind == FieldKind::Date),
        has_relationships: !relationships.is_empty(),
        has_form_relationships: !relationship_imports.is_empty(),
        relationship_imports,
        fields,
        relationships,
        file_name,
        class_name,
        class_name_plural,
    }
}

fn resource_import(base: &str, file_name: &str) -> String {
    format!(
        "{}/{file_name}-resource/{file_name}-resource.gen",
        base.trim_end_matches('/')
    )
}

fn relationship_mapping(rel: &RelationshipDescriptor, api_import_base: &str) -> RelationshipMeta {
    // unknown types were rejected by validation; fall back to the common case
    let kind: RelationshipKind = rel
        .relationship_type
        .parse()
        .unwrap_or(RelationshipKind::ManyToOne);

    let other_entity = pascal(&rel.other_entity_name);
    let other_entity_plural = pluralize(&other_entity);
    let other_entity_file = kebab(&other_entity);
    let required = rel.is_required();

    let is_owner = rel.owner_side.unwrap_or_else(|| match rel.relationship_side.as_deref() {
        Some("left") => true,
        Some("right") => false,
        _ => kind != RelationshipKind::OneToMany,
    });

    let in_form = match kind {
        RelationshipKind::ManyToOne => true,
        RelationshipKind::OneToOne | RelationshipKind::ManyToMany => is_owner,
        RelationshipKind::OneToMany => false,
    };

    let zod = if kind.is_collection() {
        if required {
            "z.array(z.number()).min(1)".to_string()
        } else {
            "z.array(z.number()).optional()".to_string()
        }
    } else if required {
        "z.number()".to_string()
    } else {
        "z.number().optional()".to_string()
    };

    RelationshipMeta {
        name: camel(&rel.relationship_name),
        label: humanize(&rel.relationship_name),
        kind,
        required,
        other_entity_route: kebab(&other_entity_plural),
        other_entity_label: humanize(&other_entity),
        display_field: rel
            .other_entity_field
            .clone()
            .filter(|field| !field.is_empty())
            .unwrap_or_else(|| "name".to_string()),
        fetch_hook: format!("useGetAll{other_entity_plural}"),
        search_hook: format!("useSearch{other_entity_plural}"),
        get_hook: format!("useGet{other_entity}"),
        api_import: resource_import(api_import_base, &other_entity_file),
        form_field: camel(&rel.relationship_name),
        zod,
        is_one_to_one: kind == RelationshipKind::OneToOne,
        is_one_to_many: kind == RelationshipKind::OneToMany,
        is_many_to_one: kind == RelationshipKind::ManyToOne,
        is_many_to_many: kind == RelationshipKind::ManyToMany,
        is_collection: kind.is_collection(),
        is_owner,
        in_form,
        other_entity_file,
        other_entity_plural,
        other_entity,
    }
}
