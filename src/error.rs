use std::fmt;
use std::path::Path;
use thiserror::Error as ThisError;

pub type Result<T, E = CodemodError> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

///
/// ErrorKind
/// closed set of failure categories
///

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Template,
    Entity,
    FileSystem,
    Validation,
    Runtime,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Template => "template",
            Self::Entity => "entity",
            Self::FileSystem => "filesystem",
            Self::Validation => "validation",
            Self::Runtime => "runtime",
        };

        f.write_str(label)
    }
}

///
/// CodemodError
///

#[derive(Debug, ThisError)]
#[error("{kind} error{}: {message}", entity_context(.entity))]
pub struct CodemodError {
    pub kind: ErrorKind,
    pub message: String,
    pub entity: Option<String>,
    #[source]
    pub source: Option<BoxError>,
}

fn entity_context(entity: &Option<String>) -> String {
    entity
        .as_ref()
        .map(|name| format!(" in entity '{name}'"))
        .unwrap_or_default()
}

impl CodemodError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            entity: None,
            source: None,
        }
    }

    pub fn template(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Template, message)
    }

    pub fn entity(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Entity, message)
    }

    pub fn filesystem(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::FileSystem, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn runtime(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Runtime, message)
    }

    /// Wrap an I/O failure on `path` as a filesystem error.
    pub fn io(path: &Path, err: std::io::Error) -> Self {
        Self::filesystem(format!("{}: {err}", path.display())).with_source(err)
    }

    #[must_use]
    pub fn in_entity(mut self, name: impl Into<String>) -> Self {
        // keep the innermost context
        if self.entity.is_none() {
            self.entity = Some(name.into());
        }
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }
}
