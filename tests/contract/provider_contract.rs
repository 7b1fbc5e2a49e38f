use std::future::Future;
use std::sync::Arc;
use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};
use std::time::Duration;

use isbnscout_core::{
    BookSource, GoodreadsAdapter, GoogleBooksAdapter, IsbnResolver, IsbndbAdapter,
    OpenLibraryAdapter, ProviderId, SourceErrorKind,
};

#[path = "../support/mod.rs"]
mod support;

use support::{
    CannedHttpClient, GOODREADS_SECRETS_SHE_KEEPS, GOOGLE_CHINA_RICH_GIRLFRIEND,
    ISBNDB_BOURNE_ULTIMATUM, OPENLIBRARY_THE_CONFESSION,
};

struct ProviderCase {
    id: ProviderId,
    build: fn(Arc<CannedHttpClient>) -> Arc<dyn BookSource>,
    isbn: &'static str,
    payload: &'static str,
    /// Valid payload declaring a different ISBN than the request, for `isbn`.
    foreign_payload: Option<&'static str>,
    untitled_payload: &'static str,
}

fn provider_cases() -> Vec<ProviderCase> {
    vec![
        ProviderCase {
            id: ProviderId::Google,
            build: |http| Arc::new(GoogleBooksAdapter::new(http)),
            isbn: "9781101973394",
            payload: GOOGLE_CHINA_RICH_GIRLFRIEND,
            foreign_payload: Some(
                r#"{"totalItems": 1, "items": [{"volumeInfo": {
                    "title": "The Confession",
                    "industryIdentifiers": [{"type": "ISBN_13", "identifier": "9780099588986"}]
                }}]}"#,
            ),
            untitled_payload: r#"{"totalItems": 1, "items": [{"volumeInfo": {
                "industryIdentifiers": [{"type": "ISBN_13", "identifier": "9781101973394"}]
            }}]}"#,
        },
        ProviderCase {
            id: ProviderId::OpenLibrary,
            build: |http| Arc::new(OpenLibraryAdapter::new(http)),
            isbn: "9780099588986",
            payload: OPENLIBRARY_THE_CONFESSION,
            foreign_payload: Some(
                r#"{"ISBN:9780099588986": {
                    "title": "The Bourne Ultimatum",
                    "identifiers": {"isbn_10": ["1407243209"], "isbn_13": ["9781407243207"]}
                }}"#,
            ),
            untitled_payload: r#"{"ISBN:9780099588986": {
                "identifiers": {"isbn_13": ["9780099588986"]}
            }}"#,
        },
        ProviderCase {
            id: ProviderId::Goodreads,
            build: |http| Arc::new(GoodreadsAdapter::new(http, "gr-key")),
            isbn: "9780751562774",
            payload: GOODREADS_SECRETS_SHE_KEEPS,
            // The search payload carries no ISBN of its own.
            foreign_payload: None,
            untitled_payload: r#"<GoodreadsResponse><search><results>
                <work><best_book><title></title></best_book></work>
            </results></search></GoodreadsResponse>"#,
        },
        ProviderCase {
            id: ProviderId::Isbndb,
            build: |http| Arc::new(IsbndbAdapter::new(http, "db-key")),
            isbn: "9781407243207",
            payload: ISBNDB_BOURNE_ULTIMATUM,
            foreign_payload: Some(
                r#"{"book": {"title_long": "The Confession", "isbn13": "9780099588986"}}"#,
            ),
            untitled_payload: r#"{"book": {"isbn": "1407243209", "isbn13": "9781407243207"}}"#,
        },
    ]
}

#[test]
fn lookup_returns_a_titled_book_stamped_with_the_adapter_id() {
    for case in provider_cases() {
        let http = Arc::new(CannedHttpClient::always(200, case.payload));
        let source = (case.build)(http.clone());

        let book = block_on(source.lookup(case.isbn))
            .unwrap_or_else(|error| panic!("{} lookup failed: {error}", case.id));

        assert_eq!(source.id(), case.id);
        assert_eq!(book.source, case.id);
        assert!(book.has_title(), "{} returned an untitled book", case.id);
        assert!(
            book.industry_identifiers.contains(case.isbn),
            "{} book does not echo the requested isbn",
            case.id
        );
        assert_eq!(http.calls(), 1, "{} must issue exactly one request", case.id);
    }
}

#[test]
fn lookup_rejects_payloads_describing_another_isbn() {
    for case in provider_cases() {
        let Some(foreign_payload) = case.foreign_payload else {
            continue;
        };
        let source = (case.build)(Arc::new(CannedHttpClient::always(200, foreign_payload)));

        let error = block_on(source.lookup(case.isbn))
            .expect_err("foreign payload must be rejected");

        assert_eq!(
            error.kind(),
            SourceErrorKind::IdentityMismatch,
            "{} accepted a substituted record",
            case.id
        );
    }
}

#[test]
fn lookup_rejects_records_without_a_title() {
    for case in provider_cases() {
        let source = (case.build)(Arc::new(CannedHttpClient::always(200, case.untitled_payload)));

        let error = block_on(source.lookup(case.isbn)).expect_err("untitled record must fail");

        assert_eq!(error.kind(), SourceErrorKind::NotFound, "{}", case.id);
    }
}

#[test]
fn non_success_status_fails_after_a_single_attempt() {
    for status in [302_u16, 404, 500, 999] {
        for case in provider_cases() {
            let http = Arc::new(CannedHttpClient::always(status, case.payload));
            let source = (case.build)(http.clone());

            let error = block_on(source.lookup(case.isbn)).expect_err("non-2xx must fail");

            assert_eq!(error.kind(), SourceErrorKind::UpstreamStatus, "{}", case.id);
            assert_eq!(error.code(), "source.upstream_status");
            assert_eq!(http.calls(), 1, "{} retried after status {status}", case.id);
        }
    }
}

#[test]
fn transport_failures_are_reported_as_transport_errors() {
    for case in provider_cases() {
        let source = (case.build)(Arc::new(CannedHttpClient::unreachable()));

        let error = block_on(source.lookup(case.isbn)).expect_err("transport must fail");

        assert_eq!(error.kind(), SourceErrorKind::Transport, "{}", case.id);
    }
}

#[test]
fn garbage_payloads_are_decode_errors() {
    for case in provider_cases() {
        let source = (case.build)(Arc::new(CannedHttpClient::always(200, "<<not a payload")));

        let error = block_on(source.lookup(case.isbn)).expect_err("garbage must fail");

        assert!(
            matches!(
                error.kind(),
                SourceErrorKind::Decode | SourceErrorKind::NotFound
            ),
            "{} produced {:?}",
            case.id,
            error.kind()
        );
    }
}

#[test]
fn resolver_timeout_is_forwarded_to_every_request() {
    let http = Arc::new(CannedHttpClient::new());
    let resolver = IsbnResolver::builder()
        .with_http_client(http.clone())
        .with_request_timeout(Duration::from_millis(750))
        .build();

    let _ = block_on_tokio(resolver.get("9780099588986"));

    let requests = http.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|request| request.timeout_ms == 750));
}

fn block_on_tokio<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .expect("runtime")
        .block_on(future)
}

fn block_on<F: Future>(future: F) -> F::Output {
    let waker = noop_waker();
    let mut context = Context::from_waker(&waker);
    let mut future = Box::pin(future);

    loop {
        match future.as_mut().poll(&mut context) {
            Poll::Ready(output) => return output,
            Poll::Pending => std::thread::yield_now(),
        }
    }
}

fn noop_waker() -> Waker {
    // SAFETY: The vtable functions never dereference the data pointer.
    unsafe { Waker::from_raw(RawWaker::new(std::ptr::null(), &NOOP_WAKER_VTABLE)) }
}

unsafe fn noop_clone(_data: *const ()) -> RawWaker {
    RawWaker::new(std::ptr::null(), &NOOP_WAKER_VTABLE)
}

unsafe fn noop(_data: *const ()) {}

static NOOP_WAKER_VTABLE: RawWakerVTable = RawWakerVTable::new(noop_clone, noop, noop, noop);
