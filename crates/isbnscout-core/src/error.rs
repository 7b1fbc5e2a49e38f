use thiserror::Error;

/// Validation errors for values parsed from caller input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("unknown provider '{value}', expected one of google, openlibrary, goodreads, isbndb")]
    UnknownProvider { value: String },
}

/// Errors surfaced by [`IsbnResolver::get`](crate::IsbnResolver::get).
///
/// Adapter-level failures never reach this type; they collapse into
/// [`LookupError::NotFound`] once every active provider has reported.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("invalid isbn '{value}'")]
    InvalidIsbn { value: String },

    #[error("book not found for isbn '{isbn}'")]
    NotFound { isbn: String },
}

impl LookupError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidIsbn { .. } => "lookup.invalid_isbn",
            Self::NotFound { .. } => "lookup.not_found",
        }
    }

    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
