use serde::{Deserialize, Serialize};

use crate::ProviderId;

/// ISBN pair echoed by a provider. Either slot may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndustryIdentifiers {
    pub isbn: String,
    #[serde(rename = "isbn_13")]
    pub isbn13: String,
}

impl IndustryIdentifiers {
    pub fn new(isbn: impl Into<String>, isbn13: impl Into<String>) -> Self {
        Self {
            isbn: isbn.into(),
            isbn13: isbn13.into(),
        }
    }

    /// Whether `isbn` equals one of the populated slots.
    pub fn contains(&self, isbn: &str) -> bool {
        !isbn.is_empty() && (self.isbn == isbn || self.isbn13 == isbn)
    }
}

/// Cover image URLs in increasing size.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageLinks {
    pub small_image_url: String,
    pub image_url: String,
    pub large_image_url: String,
}

/// Normalized bibliographic record produced by a single provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub title: String,
    /// Free-form: a bare year from some providers, a full date from others.
    pub published_year: String,
    pub authors: Vec<String>,
    pub description: String,
    pub industry_identifiers: IndustryIdentifiers,
    /// Zero when unknown.
    pub page_count: i64,
    pub categories: Vec<String>,
    pub image_links: ImageLinks,
    pub publisher: String,
    pub language: String,
    pub source: ProviderId,
}

impl Book {
    /// Empty record tagged with the provider that will fill it.
    pub fn from_source(source: ProviderId) -> Self {
        Self {
            title: String::new(),
            published_year: String::new(),
            authors: Vec::new(),
            description: String::new(),
            industry_identifiers: IndustryIdentifiers::default(),
            page_count: 0,
            categories: Vec::new(),
            image_links: ImageLinks::default(),
            publisher: String::new(),
            language: String::new(),
            source,
        }
    }

    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }
}
