use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use quick_xml::events::Event;
use quick_xml::Reader as XmlReader;

use crate::adapters::fetch_body;
use crate::book_source::{BookSource, SourceError};
use crate::domain::isbn::{self, IsbnKind};
use crate::http_client::{HttpClient, HttpRequest, DEFAULT_TIMEOUT_MS};
use crate::{Book, ImageLinks, IndustryIdentifiers, ProviderId};

const SEARCH_ENDPOINT: &str = "https://www.goodreads.com/search/index.xml";

/// Goodreads search (XML). The API key travels in the query string.
#[derive(Clone)]
pub struct GoodreadsAdapter {
    http_client: Arc<dyn HttpClient>,
    api_key: String,
    timeout_ms: u64,
}

impl GoodreadsAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>, api_key: impl Into<String>) -> Self {
        Self {
            http_client,
            api_key: api_key.into(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn request_url(&self, isbn: &str) -> String {
        format!(
            "{SEARCH_ENDPOINT}?q={}&key={}",
            urlencoding::encode(isbn),
            urlencoding::encode(&self.api_key)
        )
    }
}

impl BookSource for GoodreadsAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Goodreads
    }

    fn lookup<'a>(
        &'a self,
        isbn: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Book, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            let request = HttpRequest::get(self.request_url(isbn)).with_timeout_ms(self.timeout_ms);
            let body = fetch_body(self.http_client.as_ref(), ProviderId::Goodreads, request).await?;

            let work = parse_first_work(&body)
                .map_err(|detail| SourceError::decode(ProviderId::Goodreads, detail))?;
            if work.title.is_empty() {
                return Err(SourceError::not_found(
                    ProviderId::Goodreads,
                    "search returned no best_book title",
                ));
            }

            Ok(project_work(work, isbn))
        })
    }
}

/// Fields of the first `<work>` under `<search><results>`.
#[derive(Debug, Default, PartialEq, Eq)]
struct GoodreadsWork {
    original_publication_year: String,
    title: String,
    author_name: String,
    image_url: String,
    small_image_url: String,
}

impl GoodreadsWork {
    fn assign(&mut self, path: &[String], text: &str) {
        // Skip the root element; Goodreads wraps everything in <GoodreadsResponse>.
        let relative = path.iter().skip(1).map(String::as_str).collect::<Vec<_>>();
        let slot = match relative.as_slice() {
            ["search", "results", "work", "original_publication_year"] => {
                &mut self.original_publication_year
            }
            ["search", "results", "work", "best_book", "title"] => &mut self.title,
            ["search", "results", "work", "best_book", "author", "name"] => &mut self.author_name,
            ["search", "results", "work", "best_book", "image_url"] => &mut self.image_url,
            ["search", "results", "work", "best_book", "small_image_url"] => {
                &mut self.small_image_url
            }
            _ => return,
        };
        slot.push_str(text.trim());
    }
}

fn is_work_element(path: &[String]) -> bool {
    path.len() == 4 && path[1] == "search" && path[2] == "results" && path[3] == "work"
}

fn parse_first_work(body: &str) -> Result<GoodreadsWork, String> {
    let mut reader = XmlReader::from_str(body);
    let mut buf = Vec::new();
    let mut path: Vec<String> = Vec::new();
    let mut work = GoodreadsWork::default();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                path.push(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
            }
            Ok(Event::End(_)) => {
                if is_work_element(&path) {
                    break;
                }
                path.pop();
            }
            Ok(Event::Text(e)) => {
                let text = e.unescape().map_err(|e| e.to_string())?;
                work.assign(&path, &text);
            }
            Ok(Event::CData(e)) => {
                let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                work.assign(&path, &text);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(format!(
                    "malformed xml at position {}: {e}",
                    reader.buffer_position()
                ))
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(work)
}

fn project_work(work: GoodreadsWork, requested: &str) -> Book {
    // The payload carries no ISBN; echo the request, without separators, into
    // the slot its form validates as.
    let normalized = isbn::normalize(requested);
    let identifiers = match isbn::classify(&normalized) {
        Some(IsbnKind::Isbn10) => IndustryIdentifiers::new(normalized, ""),
        Some(IsbnKind::Isbn13) => IndustryIdentifiers::new("", normalized),
        None => IndustryIdentifiers::default(),
    };

    let authors = if work.author_name.is_empty() {
        Vec::new()
    } else {
        vec![work.author_name]
    };

    let mut book = Book::from_source(ProviderId::Goodreads);
    book.title = work.title;
    book.published_year = work.original_publication_year;
    book.authors = authors;
    book.industry_identifiers = identifiers;
    book.image_links = ImageLinks {
        small_image_url: work.small_image_url,
        image_url: work.image_url,
        large_image_url: String::new(),
    };
    book
}
