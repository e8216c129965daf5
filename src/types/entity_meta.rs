use super::field_meta::FieldMeta;
use super::relationship_meta::RelationshipMeta;
use serde_derive::Serialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaginationMode {
    #[default]
    Pagination,
    InfiniteScroll,
    No,
}

impl PaginationMode {
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("infinite-scroll") => Self::InfiniteScroll,
            Some("no") => Self::No,
            _ => Self::Pagination,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct EntityMeta {
    pub class_name: String,         // PascalCase
    pub class_name_plural: String,  // PascalCase plural
    pub instance_name: String,      // camelCase
    pub instance_name_plural: String,
    pub file_name: String,          // kebab-case
    pub route_name: String,         // kebab-case plural
    pub display_name: String,       // Title Case
    pub display_name_plural: String,
    pub api_resource: String,       // `{file_name}-resource`
    pub api_import: String,

    // hooks exported by the generated REST client
    pub fetch_hook: String,
    pub count_hook: String,
    pub get_hook: String,
    pub create_hook: String,
    pub update_hook: String,
    pub delete_hook: String,
    pub dto_type: String,

    pub read_only: bool,
    pub pagination: PaginationMode,
    pub paginated: bool,
    pub infinite_scroll: bool,
    pub has_service: bool,
    pub has_dto: bool,

    pub fields: Vec<FieldMeta>,
    pub relationships: Vec<RelationshipMeta>,
    pub has_enums: bool,
    pub has_dates: bool,
    pub has_relationships: bool,
    pub has_form_relationships: bool,
    pub relationship_imports: Vec<HookImport>,
}

/// A REST client hook the form imports, deduplicated per hook name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HookImport {
    pub hook: String,
    pub path: String,
}

impl EntityMeta {
    pub fn form_relationships(&self) -> impl Iterator<Item = &RelationshipMeta> {
        self.relationships.iter().filter(|rel| rel.in_form)
    }
}
