use serde_derive::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    String,
    Number,
    Boolean,
    Date,
    Enum,
}

impl FieldKind {
    pub const fn ts_type(self) -> &'static str {
        match self {
            Self::String | Self::Enum => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Date => "Date",
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct FieldMeta {
    pub name: String,       // camelCase, as in the descriptor
    pub label: String,      // Title Case
    pub raw_type: String,   // JHipster type name
    pub kind: FieldKind,
    pub ts_type: String,    // enum fields get a string-literal union
    pub input_type: String, // html input / widget hint
    pub enum_name: Option<String>,
    pub enum_values: Vec<EnumValueMeta>,
    pub required: bool,
    pub integer: bool,
    pub zod: String,

    // template switches
    pub is_string: bool,
    pub is_number: bool,
    pub is_boolean: bool,
    pub is_date: bool,
    pub is_enum: bool,
    pub is_text_blob: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct EnumValueMeta {
    pub value: String,
    pub label: String,
}
