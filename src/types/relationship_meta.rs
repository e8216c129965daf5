use serde_derive::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationshipKind {
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
}

impl RelationshipKind {
    pub const ALL: [Self; 4] = [
        Self::OneToOne,
        Self::OneToMany,
        Self::ManyToOne,
        Self::ManyToMany,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneToOne => "one-to-one",
            Self::OneToMany => "one-to-many",
            Self::ManyToOne => "many-to-one",
            Self::ManyToMany => "many-to-many",
        }
    }

    /// The related side holds many rows.
    pub const fn is_collection(self) -> bool {
        matches!(self, Self::OneToMany | Self::ManyToMany)
    }
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationshipKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown relationship type '{s}'"))
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct RelationshipMeta {
    pub name: String,  // camelCase
    pub label: String, // Title Case
    pub kind: RelationshipKind,
    pub required: bool,

    pub other_entity: String,        // PascalCase
    pub other_entity_plural: String, // PascalCase plural
    pub other_entity_file: String,   // kebab-case
    pub other_entity_route: String,  // kebab-case plural
    pub other_entity_label: String,
    pub display_field: String,

    // hooks exported by the generated REST client
    pub fetch_hook: String,
    pub search_hook: String,
    pub get_hook: String,
    pub api_import: String,

    pub form_field: String, // key in the form values
    pub zod: String,

    pub is_one_to_one: bool,
    pub is_one_to_many: bool,
    pub is_many_to_one: bool,
    pub is_many_to_many: bool,
    pub is_collection: bool,
    pub is_owner: bool,
    pub in_form: bool,
}
