use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;

use crate::adapters::{fetch_body, null_as_default};
use crate::book_source::{BookSource, SourceError};
use crate::http_client::{HttpAuth, HttpClient, HttpRequest, DEFAULT_TIMEOUT_MS};
use crate::{Book, ImageLinks, IndustryIdentifiers, ProviderId};

const BOOK_ENDPOINT: &str = "https://api2.isbndb.com/book";

/// ISBNDB v2 book endpoint. The raw API key is sent as `Authorization`.
#[derive(Clone)]
pub struct IsbndbAdapter {
    http_client: Arc<dyn HttpClient>,
    auth: HttpAuth,
    timeout_ms: u64,
}

impl IsbndbAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>, api_key: impl Into<String>) -> Self {
        Self {
            http_client,
            auth: HttpAuth::RawHeader {
                name: String::from("Authorization"),
                value: api_key.into(),
            },
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn request_url(isbn: &str) -> String {
        format!("{BOOK_ENDPOINT}/{}", urlencoding::encode(isbn))
    }
}

impl BookSource for IsbndbAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Isbndb
    }

    fn lookup<'a>(
        &'a self,
        isbn: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Book, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            let request = HttpRequest::get(Self::request_url(isbn))
                .with_auth(&self.auth)
                .with_timeout_ms(self.timeout_ms);
            let body = fetch_body(self.http_client.as_ref(), ProviderId::Isbndb, request).await?;
            parse_book_response(&body, isbn)
        })
    }
}

fn parse_book_response(body: &str, isbn: &str) -> Result<Book, SourceError> {
    let response: IsbndbResponse =
        serde_json::from_str(body).map_err(|e| SourceError::decode(ProviderId::Isbndb, e))?;
    let record = response.book;

    let identifiers = IndustryIdentifiers::new(record.isbn, record.isbn13);
    if !identifiers.contains(isbn) {
        return Err(SourceError::identity_mismatch(ProviderId::Isbndb, isbn));
    }

    let mut book = Book::from_source(ProviderId::Isbndb);
    book.title = record.title_long;
    book.published_year = record.date_published;
    book.authors = record.authors;
    book.industry_identifiers = identifiers;
    book.image_links = ImageLinks {
        small_image_url: record.image,
        ..ImageLinks::default()
    };
    book.publisher = record.publisher;
    book.language = record.language;

    if !book.has_title() {
        return Err(SourceError::not_found(ProviderId::Isbndb, "book has no title_long"));
    }
    Ok(book)
}

#[derive(Debug, Deserialize)]
struct IsbndbResponse {
    book: IsbndbBook,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct IsbndbBook {
    #[serde(deserialize_with = "null_as_default")]
    title_long: String,
    #[serde(deserialize_with = "null_as_default")]
    date_published: String,
    #[serde(deserialize_with = "null_as_default")]
    authors: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    isbn: String,
    #[serde(deserialize_with = "null_as_default")]
    isbn13: String,
    #[serde(deserialize_with = "null_as_default")]
    image: String,
    #[serde(deserialize_with = "null_as_default")]
    publisher: String,
    #[serde(deserialize_with = "null_as_default")]
    language: String,
}
