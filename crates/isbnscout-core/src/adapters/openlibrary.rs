use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;

use crate::adapters::{fetch_body, null_as_default};
use crate::book_source::{BookSource, SourceError};
use crate::http_client::{HttpClient, HttpRequest, DEFAULT_TIMEOUT_MS};
use crate::{Book, ImageLinks, IndustryIdentifiers, ProviderId};

const BOOKS_ENDPOINT: &str = "https://openlibrary.org/api/books";

/// Open Library Books API (`jscmd=data`). No credential required.
#[derive(Clone)]
pub struct OpenLibraryAdapter {
    http_client: Arc<dyn HttpClient>,
    timeout_ms: u64,
}

impl OpenLibraryAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn request_url(isbn: &str) -> String {
        format!(
            "{BOOKS_ENDPOINT}?bibkeys=ISBN:{}&format=json&jscmd=data",
            urlencoding::encode(isbn)
        )
    }
}

impl BookSource for OpenLibraryAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::OpenLibrary
    }

    fn lookup<'a>(
        &'a self,
        isbn: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Book, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            let request = HttpRequest::get(Self::request_url(isbn)).with_timeout_ms(self.timeout_ms);
            let body = fetch_body(self.http_client.as_ref(), ProviderId::OpenLibrary, request).await?;
            parse_books_response(&body, isbn)
        })
    }
}

fn parse_books_response(body: &str, isbn: &str) -> Result<Book, SourceError> {
    let mut entries: HashMap<String, OpenLibraryRecord> =
        serde_json::from_str(body).map_err(|e| SourceError::decode(ProviderId::OpenLibrary, e))?;

    let key = format!("ISBN:{isbn}");
    let Some(record) = entries.remove(&key) else {
        return Err(SourceError::not_found(
            ProviderId::OpenLibrary,
            format!("response has no '{key}' entry"),
        ));
    };

    let identifiers = IndustryIdentifiers::new(
        record.identifiers.isbn_10.into_iter().next().unwrap_or_default(),
        record.identifiers.isbn_13.into_iter().next().unwrap_or_default(),
    );
    if !identifiers.contains(isbn) {
        return Err(SourceError::identity_mismatch(ProviderId::OpenLibrary, isbn));
    }

    let publishers = record
        .publishers
        .into_iter()
        .map(|publisher| publisher.name)
        .collect::<Vec<_>>();

    let mut book = Book::from_source(ProviderId::OpenLibrary);
    book.title = record.title;
    book.published_year = record.publish_date;
    book.authors = record.authors.into_iter().map(|author| author.name).collect();
    book.industry_identifiers = identifiers;
    book.page_count = record.number_of_pages;
    book.image_links = ImageLinks {
        small_image_url: record.cover.small,
        image_url: record.cover.medium,
        large_image_url: record.cover.large,
    };
    book.publisher = publishers.join(", ");

    if !book.has_title() {
        return Err(SourceError::not_found(ProviderId::OpenLibrary, "record has no title"));
    }
    Ok(book)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OpenLibraryRecord {
    #[serde(deserialize_with = "null_as_default")]
    title: String,
    #[serde(deserialize_with = "null_as_default")]
    identifiers: OpenLibraryIdentifiers,
    #[serde(deserialize_with = "null_as_default")]
    authors: Vec<NamedEntry>,
    #[serde(deserialize_with = "null_as_default")]
    publish_date: String,
    #[serde(deserialize_with = "null_as_default")]
    number_of_pages: i64,
    #[serde(deserialize_with = "null_as_default")]
    publishers: Vec<NamedEntry>,
    #[serde(deserialize_with = "null_as_default")]
    cover: OpenLibraryCover,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OpenLibraryIdentifiers {
    #[serde(deserialize_with = "null_as_default")]
    isbn_10: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    isbn_13: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NamedEntry {
    #[serde(deserialize_with = "null_as_default")]
    name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OpenLibraryCover {
    #[serde(deserialize_with = "null_as_default")]
    small: String,
    #[serde(deserialize_with = "null_as_default")]
    medium: String,
    #[serde(deserialize_with = "null_as_default")]
    large: String,
}
