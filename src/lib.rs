pub mod config;
pub mod descriptor;
pub mod entity_schema;
pub mod error;
pub mod field_mapping;
pub mod naming;
pub mod page_generator;
pub mod template;
pub mod types;
pub mod validation;

pub use error::{CodemodError, ErrorKind, Result};
