//! Shared fakes for the integration suites.

#![allow(dead_code)]

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use isbnscout_core::{HttpClient, HttpError, HttpRequest, HttpResponse};

/// Fake executor returning canned responses keyed by exact request URL.
///
/// Unrouted URLs get the fallback response (404 unless overridden).
#[derive(Debug)]
pub struct CannedHttpClient {
    routes: HashMap<String, Result<HttpResponse, HttpError>>,
    fallback: Result<HttpResponse, HttpError>,
    calls: AtomicUsize,
    requests: Mutex<Vec<HttpRequest>>,
}

impl CannedHttpClient {
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
            fallback: Ok(HttpResponse::new(404, "not found")),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Every request answers `status` with an empty body.
    pub fn always_status(status: u16) -> Self {
        Self {
            fallback: Ok(HttpResponse::new(status, "")),
            ..Self::new()
        }
    }

    /// Every request answers `status` with `body`, whatever the URL.
    pub fn always(status: u16, body: &str) -> Self {
        Self {
            fallback: Ok(HttpResponse::new(status, body)),
            ..Self::new()
        }
    }

    /// Every request fails at the transport layer.
    pub fn unreachable() -> Self {
        Self {
            fallback: Err(HttpError::new("connection refused")),
            ..Self::new()
        }
    }

    pub fn route(mut self, url: impl Into<String>, status: u16, body: &str) -> Self {
        self.routes
            .insert(url.into(), Ok(HttpResponse::new(status, body)));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().expect("lock").clone()
    }

    pub fn urls(&self) -> Vec<String> {
        self.requests().into_iter().map(|request| request.url).collect()
    }
}

impl HttpClient for CannedHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let outcome = self
            .routes
            .get(&request.url)
            .unwrap_or(&self.fallback)
            .clone();
        self.requests.lock().expect("lock").push(request);
        Box::pin(async move { outcome })
    }
}

pub const GOOGLE_CHINA_RICH_GIRLFRIEND: &str = r#"{
    "kind": "books#volumes",
    "totalItems": 1,
    "items": [{
        "volumeInfo": {
            "title": "China Rich Girlfriend",
            "authors": ["Kevin Kwan"],
            "publisher": "Anchor Books",
            "publishedDate": "2016-05-31",
            "industryIdentifiers": [
                {"type": "ISBN_10", "identifier": "1101973390"},
                {"type": "ISBN_13", "identifier": "9781101973394"}
            ],
            "pageCount": 496,
            "categories": ["Fiancées"],
            "language": "en"
        }
    }]
}"#;

pub const OPENLIBRARY_THE_CONFESSION: &str = r#"{
    "ISBN:9780099588986": {
        "title": "The Confession",
        "authors": [{"name": "John Grisham"}],
        "number_of_pages": 528,
        "identifiers": {"isbn_13": ["9780099588986"]},
        "publishers": [{"name": "Arrow Books"}],
        "publish_date": "2011"
    }
}"#;

pub const ISBNDB_BOURNE_ULTIMATUM: &str = r#"{
    "book": {
        "publisher": "",
        "language": "en_US",
        "image": "https://images.isbndb.com/covers/32/07/9781407243207.jpg",
        "title_long": "The Bourne Ultimatum",
        "date_published": "",
        "authors": [],
        "isbn13": "9781407243207",
        "isbn": "1407243209"
    }
}"#;

pub const GOODREADS_SECRETS_SHE_KEEPS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<GoodreadsResponse>
    <search>
        <results>
            <work>
                <original_publication_year type="integer">2017</original_publication_year>
                <best_book type="Book">
                    <title>The Secrets She Keeps</title>
                    <author><name>Michael Robotham</name></author>
                    <image_url>https://s.gr-assets.com/assets/nophoto/book/111x148.png</image_url>
                    <small_image_url>https://s.gr-assets.com/assets/nophoto/book/50x75.png</small_image_url>
                </best_book>
            </work>
        </results>
    </search>
</GoodreadsResponse>"#;
