pub mod entity_meta;
pub mod field_meta;
pub mod relationship_meta;

pub use entity_meta::{EntityMeta, HookImport, PaginationMode};
pub use field_meta::{EnumValueMeta, FieldKind, FieldMeta};
pub use relationship_meta::{RelationshipKind, RelationshipMeta};
