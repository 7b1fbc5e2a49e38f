use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;

use crate::adapters::{fetch_body, null_as_default};
use crate::book_source::{BookSource, SourceError};
use crate::http_client::{HttpClient, HttpRequest, DEFAULT_TIMEOUT_MS};
use crate::{Book, ImageLinks, IndustryIdentifiers, ProviderId};

const VOLUMES_ENDPOINT: &str = "https://www.googleapis.com/books/v1/volumes";

/// Google Books volumes search. No credential required.
#[derive(Clone)]
pub struct GoogleBooksAdapter {
    http_client: Arc<dyn HttpClient>,
    timeout_ms: u64,
}

impl GoogleBooksAdapter {
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
        format!("{VOLUMES_ENDPOINT}?q={}", urlencoding::encode(isbn))
    }
}

impl BookSource for GoogleBooksAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Google
    }

    fn lookup<'a>(
        &'a self,
        isbn: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Book, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            let request = HttpRequest::get(Self::request_url(isbn)).with_timeout_ms(self.timeout_ms);
            let body = fetch_body(self.http_client.as_ref(), ProviderId::Google, request).await?;
            parse_volumes_response(&body, isbn)
        })
    }
}

fn parse_volumes_response(body: &str, isbn: &str) -> Result<Book, SourceError> {
    let response: GoogleVolumesResponse =
        serde_json::from_str(body).map_err(|e| SourceError::decode(ProviderId::Google, e))?;

    if response.total_items == 0 {
        return Err(SourceError::not_found(ProviderId::Google, "no volumes matched"));
    }
    let Some(volume) = response.items.into_iter().next() else {
        return Err(SourceError::not_found(ProviderId::Google, "response carried no items"));
    };
    let info = volume.volume_info;

    let mut isbn10 = String::new();
    let mut isbn13 = String::new();
    for identifier in info.industry_identifiers {
        match identifier.kind.as_str() {
            "ISBN_10" => isbn10 = identifier.identifier,
            "ISBN_13" => isbn13 = identifier.identifier,
            _ => {}
        }
    }
    let identifiers = IndustryIdentifiers::new(isbn10, isbn13);
    if !identifiers.contains(isbn) {
        return Err(SourceError::identity_mismatch(ProviderId::Google, isbn));
    }

    let book = Book {
        title: info.title,
        published_year: info.published_date,
        authors: info.authors,
        description: info.description,
        industry_identifiers: identifiers,
        page_count: info.page_count,
        categories: info.categories,
        image_links: ImageLinks {
            small_image_url: info.image_links.small_thumbnail,
            image_url: info.image_links.thumbnail,
            large_image_url: String::new(),
        },
        publisher: info.publisher,
        language: info.language,
        source: ProviderId::Google,
    };

    if !book.has_title() {
        return Err(SourceError::not_found(ProviderId::Google, "volume has no title"));
    }
    Ok(book)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleVolumesResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    total_items: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    items: Vec<GoogleVolume>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleVolume {
    #[serde(default, deserialize_with = "null_as_default")]
    volume_info: GoogleVolumeInfo,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct GoogleVolumeInfo {
    #[serde(deserialize_with = "null_as_default")]
    title: String,
    #[serde(deserialize_with = "null_as_default")]
    authors: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    publisher: String,
    #[serde(deserialize_with = "null_as_default")]
    published_date: String,
    #[serde(deserialize_with = "null_as_default")]
    description: String,
    #[serde(deserialize_with = "null_as_default")]
    industry_identifiers: Vec<GoogleIdentifier>,
    #[serde(deserialize_with = "null_as_default")]
    page_count: i64,
    #[serde(deserialize_with = "null_as_default")]
    categories: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    image_links: GoogleImageLinks,
    #[serde(deserialize_with = "null_as_default")]
    language: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GoogleIdentifier {
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    kind: String,
    #[serde(deserialize_with = "null_as_default")]
    identifier: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct GoogleImageLinks {
    #[serde(deserialize_with = "null_as_default")]
    small_thumbnail: String,
    #[serde(deserialize_with = "null_as_default")]
    thumbnail: String,
}
