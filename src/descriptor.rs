//! JHipster-style entity descriptors as they appear on disk.
//!
//! Deserialization is lenient: every key except the entity name has a default,
//! shape checks live in [`crate::validation`].

use serde::Deserializer;
use serde_derive::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityDescriptor {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub relationships: Vec<RelationshipDescriptor>,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub pagination: Option<String>,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub dto: Option<String>,
    #[serde(default)]
    pub entity_table_name: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub field_name: String,
    pub field_type: String,
    #[serde(default)]
    pub field_values: Option<String>,
    #[serde(default)]
    pub field_is_enum: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub field_validate_rules: Vec<String>,
    #[serde(default)]
    pub field_validate_rules_minlength: Option<RuleValue>,
    #[serde(default)]
    pub field_validate_rules_maxlength: Option<RuleValue>,
    #[serde(default)]
    pub field_validate_rules_min: Option<RuleValue>,
    #[serde(default)]
    pub field_validate_rules_max: Option<RuleValue>,
    #[serde(default)]
    pub field_validate_rules_pattern: Option<String>,
}

impl FieldDescriptor {
    pub fn has_rule(&self, rule: &str) -> bool {
        self.field_validate_rules.iter().any(|r| r == rule)
    }

    /// Enum constants, whitespace trimmed. Empty when the field is not an enum.
    pub fn enum_values(&self) -> Vec<String> {
        self.field_values
            .as_deref()
            .map(|values| {
                values
                    .split(',')
                    .map(str::trim)
                    .filter(|value| !value.is_empty())
                    .map(|value| {
                        // `ACTIVE (active)` carries a custom label we don't need
                        value.split_whitespace().next().unwrap_or(value).to_string()
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipDescriptor {
    pub relationship_name: String,
    pub relationship_type: String,
    pub other_entity_name: String,
    #[serde(default)]
    pub other_entity_field: Option<String>,
    #[serde(default)]
    pub other_entity_relationship_name: Option<String>,
    #[serde(default)]
    pub relationship_validate_rules: Option<RuleList>,
    #[serde(default)]
    pub owner_side: Option<bool>,
    #[serde(default)]
    pub relationship_side: Option<String>,
}

impl RelationshipDescriptor {
    pub fn is_required(&self) -> bool {
        self.relationship_validate_rules
            .as_ref()
            .is_some_and(|rules| rules.contains("required"))
    }
}

// JHipster writes `null` for empty lists as often as it omits them.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + serde::Deserialize<'de>,
{
    let value: Option<T> = serde::Deserialize::deserialize(deserializer)?;

    Ok(value.unwrap_or_default())
}

///
/// RuleValue
/// validation arguments are written both as `50` and `"50"`
///

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum RuleValue {
    Number(f64),
    Text(String),
}

impl RuleValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Render as a JS numeric literal, dropping a redundant `.0`.
    pub fn to_literal(&self) -> Option<String> {
        self.as_f64().map(|n| {
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", n as i64)
            } else {
                n.to_string()
            }
        })
    }
}

///
/// RuleList
/// `relationshipValidateRules` is a single string or a list
///

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum RuleList {
    One(String),
    Many(Vec<String>),
}

impl RuleList {
    pub fn contains(&self, rule: &str) -> bool {
        match self {
            Self::One(r) => r == rule,
            Self::Many(rules) => rules.iter().any(|r| r == rule),
        }
    }
}
