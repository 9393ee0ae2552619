use shared::{AnimalKind, ParseFieldError};
use std::fmt;

/// How a missing record was addressed
#[derive(Debug, Clone, PartialEq)]
pub enum RecordRef {
    Id(i64),
    Name(String),
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordRef::Id(id) => write!(f, "ID {}", id),
            RecordRef::Name(name) => write!(f, "name '{}'", name),
        }
    }
}

/// Malformed operator input. Never reaches the store.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid field count: a {kind} needs {expected} fields, got {actual}")]
    FieldCount {
        kind: AnimalKind,
        expected: usize,
        actual: usize,
    },
    #[error("Invalid numeric field: {field} must be a non-negative number, got '{value}'")]
    NumericField { field: &'static str, value: String },
    #[error("Missing field: {field} cannot be empty")]
    MissingField { field: &'static str },
    #[error("{0}")]
    InvalidField(#[from] ParseFieldError),
    #[error("Invalid acquisition date: '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),
    #[error("Invalid ID: '{0}' is not a record number")]
    InvalidId(String),
    #[error("A {actual} record cannot be stored with the {expected} records")]
    KindMismatch {
        expected: AnimalKind,
        actual: AnimalKind,
    },
    #[error("{name} is reserved and cannot be queued for training")]
    ReservedForService { name: String },
    #[error("{name} is already waiting in the training queue")]
    AlreadyQueued { name: String },
}

/// Everything a service or repository call can fail with
#[derive(Debug, thiserror::Error)]
pub enum RescueError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("A {kind} named '{name}' already exists")]
    DuplicateName { kind: AnimalKind, name: String },
    #[error("No {kind} found with {target}")]
    NotFound { kind: AnimalKind, target: RecordRef },
    #[error("Storage failure: {0}")]
    Persistence(#[from] sqlx::Error),
}

impl RescueError {
    pub fn not_found_id(kind: AnimalKind, id: i64) -> Self {
        RescueError::NotFound {
            kind,
            target: RecordRef::Id(id),
        }
    }

    pub fn not_found_name(kind: AnimalKind, name: &str) -> Self {
        RescueError::NotFound {
            kind,
            target: RecordRef::Name(name.to_string()),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, RescueError::Validation(_))
    }
}

pub type RescueResult<T> = Result<T, RescueError>;
