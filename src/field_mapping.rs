use crate::descriptor::{FieldDescriptor, RuleValue};
use crate::naming::humanize;
use crate::types::{EnumValueMeta, FieldKind, FieldMeta};

pub fn field_mapping(field: &FieldDescriptor) -> FieldMeta {
    let enum_values = field.enum_values();
    let is_enum_field = field.field_is_enum || !enum_values.is_empty();
    let kind = field_kind(&field.field_type, is_enum_field);
    let label = humanize(&field.field_name);
    let required = field.has_rule("required");
    let integer = matches!(field.field_type.as_str(), "Integer" | "Long");
    let is_text_blob = field.field_type == "TextBlob";

    let ts_type = if kind == FieldKind::Enum && !enum_values.is_empty() {
        enum_values
            .iter()
            .map(|value| format!("\"{value}\""))
            .collect::<Vec<_>>()
            .join(" | ")
    } else {
        kind.ts_type().to_string()
    };

    let input_type = match kind {
        FieldKind::String if is_text_blob => "textarea",
        FieldKind::String => "text",
        FieldKind::Number => "number",
        FieldKind::Boolean => "checkbox",
        FieldKind::Date if field.field_type == "LocalDate" => "date",
        FieldKind::Date => "datetime-local",
        FieldKind::Enum => "select",
    };

    FieldMeta {
        name: field.field_name.clone(),
        zod: zod_schema(field, kind, &enum_values, &label),
        label,
        raw_type: field.field_type.clone(),
        kind,
        ts_type,
        input_type: input_type.to_string(),
        enum_name: (kind == FieldKind::Enum).then(|| field.field_type.clone()),
        enum_values: enum_values
            .iter()
            .map(|value| EnumValueMeta {
                value: value.clone(),
                label: humanize(&value.to_lowercase()),
            })
            .collect(),
        required,
        integer,
        is_string: kind == FieldKind::String,
        is_number: kind == FieldKind::Number,
        is_boolean: kind == FieldKind::Boolean,
        is_date: kind == FieldKind::Date,
        is_enum: kind == FieldKind::Enum,
        is_text_blob,
    }
}

/// Map a JHipster field type onto the generated form's value kind.
/// Unknown types are strings unless the field carries enum values.
pub fn field_kind(field_type: &str, is_enum: bool) -> FieldKind {
    match field_type {
        "Integer" | "Long" | "Float" | "Double" | "BigDecimal" => FieldKind::Number,
        "Boolean" => FieldKind::Boolean,
        "LocalDate" | "ZonedDateTime" | "Instant" => FieldKind::Date,
        "String" | "UUID" | "Duration" | "TextBlob" | "Blob" | "AnyBlob" | "ImageBlob" => {
            FieldKind::String
        }
        _ if is_enum => FieldKind::Enum,
        _ => FieldKind::String,
    }
}

fn zod_schema(field: &FieldDescriptor, kind: FieldKind, enum_values: &[String], label: &str) -> String {
    let literal = |value: &Option<RuleValue>| value.as_ref().and_then(RuleValue::to_literal);
    let required = field.has_rule("required");

    let mut schema = match kind {
        FieldKind::String => {
            let mut s = String::from("z.string()");
            let min = field
                .has_rule("minlength")
                .then(|| literal(&field.field_validate_rules_minlength))
                .flatten();

            match min {
                Some(min) => s.push_str(&format!(".min({min})")),
                None if required => {
                    s.push_str(&format!(".min(1, {{ message: \"Please enter {label}\" }})"));
                }
                None => {}
            }
            if let Some(max) = field
                .has_rule("maxlength")
                .then(|| literal(&field.field_validate_rules_maxlength))
                .flatten()
            {
                s.push_str(&format!(".max({max})"));
            }
            if let Some(pattern) = field
                .field_validate_rules_pattern
                .as_deref()
                .filter(|_| field.has_rule("pattern"))
            {
                s.push_str(&format!(".regex(/{}/)", pattern.replace('/', "\\/")));
            }
            s
        }
        FieldKind::Number => {
            let mut s = String::from("z.coerce.number()");
            if matches!(field.field_type.as_str(), "Integer" | "Long") {
                s.push_str(".int()");
            }
            if let Some(min) = field
                .has_rule("min")
                .then(|| literal(&field.field_validate_rules_min))
                .flatten()
            {
                s.push_str(&format!(".min({min})"));
            }
            if let Some(max) = field
                .has_rule("max")
                .then(|| literal(&field.field_validate_rules_max))
                .flatten()
            {
                s.push_str(&format!(".max({max})"));
            }
            s
        }
        FieldKind::Boolean => String::from("z.boolean()"),
        FieldKind::Date => String::from("z.date()"),
        FieldKind::Enum if enum_values.is_empty() => String::from("z.string()"),
        FieldKind::Enum => {
            let values = enum_values
                .iter()
                .map(|value| format!("\"{value}\""))
                .collect::<Vec<_>>()
                .join(", ");
            format!("z.enum([{values}])")
        }
    };

    if !required {
        schema.push_str(".optional()");
    }

    schema
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str, ty: &str) -> FieldDescriptor {
        FieldDescriptor {
            field_name: name.into(),
            field_type: ty.into(),
            ..FieldDescriptor::default()
        }
    }

    #[test]
    fn unknown_types_default_to_string() {
        let meta = field_mapping(&field("payload", "Geometry"));

        assert_eq!(meta.kind, FieldKind::String);
        assert_eq!(meta.ts_type, "string");
        assert_eq!(meta.zod, "z.string().optional()");
    }

    #[test]
    fn enum_values_make_an_enum() {
        let mut status = field("status", "CallStatus");
        status.field_values = Some("OPEN, IN_PROGRESS,CLOSED".into());
        status.field_validate_rules = vec!["required".into()];

        let meta = field_mapping(&status);

        assert!(meta.is_enum);
        assert_eq!(meta.enum_name.as_deref(), Some("CallStatus"));
        assert_eq!(meta.ts_type, "\"OPEN\" | \"IN_PROGRESS\" | \"CLOSED\"");
        assert_eq!(meta.zod, "z.enum([\"OPEN\", \"IN_PROGRESS\", \"CLOSED\"])");
        assert_eq!(meta.enum_values[1].label, "In Progress");
        assert_eq!(meta.input_type, "select");
    }

    #[test]
    fn string_rules_become_zod_chain() {
        let mut name = field("name", "String");
        name.field_validate_rules = vec!["required".into(), "minlength".into(), "maxlength".into()];
        name.field_validate_rules_minlength = Some(RuleValue::Text("2".into()));
        name.field_validate_rules_maxlength = Some(RuleValue::Number(50.0));

        assert_eq!(field_mapping(&name).zod, "z.string().min(2).max(50)");
    }

    #[test]
    fn required_string_without_minlength() {
        let mut name = field("firstName", "String");
        name.field_validate_rules = vec!["required".into()];

        assert_eq!(
            field_mapping(&name).zod,
            "z.string().min(1, { message: \"Please enter First Name\" })"
        );
    }

    #[test]
    fn numbers_and_dates() {
        let mut qty = field("quantity", "Integer");
        qty.field_validate_rules = vec!["min".into()];
        qty.field_validate_rules_min = Some(RuleValue::Number(0.0));

        let meta = field_mapping(&qty);
        assert!(meta.is_number && meta.integer);
        assert_eq!(meta.zod, "z.coerce.number().int().min(0).optional()");

        let due = field_mapping(&field("dueDate", "LocalDate"));
        assert_eq!(due.input_type, "date");
        assert_eq!(due.ts_type, "Date");

        let at = field_mapping(&field("createdAt", "Instant"));
        assert_eq!(at.input_type, "datetime-local");
    }

    #[test]
    fn text_blob_is_a_textarea() {
        let meta = field_mapping(&field("notes", "TextBlob"));

        assert!(meta.is_text_blob);
        assert_eq!(meta.input_type, "textarea");
    }
}
