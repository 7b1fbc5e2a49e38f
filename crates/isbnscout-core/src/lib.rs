//! # Isbnscout Core
//!
//! Concurrent ISBN metadata lookup across public book catalogues.
//!
//! ## Overview
//!
//! Given an ISBN-10 or ISBN-13, the resolver validates the checksum locally,
//! queries every active provider at once and returns the first record whose
//! echoed identifiers match the request:
//!
//! - **Google Books** and **Open Library** need no credentials
//! - **Goodreads** and **ISBNDB** are enabled only when their API key is set
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Provider adapters (Google Books, Open Library, Goodreads, ISBNDB) |
//! | [`book_source`] | Adapter trait and per-provider failure type |
//! | [`config`] | Credentials and request deadline |
//! | [`domain`] | Book record and ISBN checksum routines |
//! | [`error`] | Public error types |
//! | [`http_client`] | HTTP client abstraction |
//! | [`resolver`] | Fan-out lookup and provider selection |
//! | [`source`] | Provider identifiers |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use isbnscout_core::IsbnResolver;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Empty list: every provider whose credentials are present.
//!     let resolver = IsbnResolver::new(&[]);
//!
//!     let book = resolver.get("9780099588986").await?;
//!     println!("{} by {:?} via {}", book.title, book.authors, book.source);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  IsbnResolver   │  validate → fan out → first titled record wins
//! └────────┬────────┘
//!          │ one task per provider
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ BookSource      │────▶│ HTTP Client      │
//! │ (Adapter Trait) │     │ (reqwest/fake)   │
//! └─────────────────┘     └──────────────────┘
//! ```

pub mod adapters;
pub mod book_source;
pub mod config;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod resolver;
pub mod source;

pub use adapters::{GoodreadsAdapter, GoogleBooksAdapter, IsbndbAdapter, OpenLibraryAdapter};
pub use book_source::{BookSource, SourceError, SourceErrorKind};
pub use config::{Credentials, ResolverConfig, GOODREADS_API_KEY_ENV, ISBNDB_API_KEY_ENV};
pub use domain::{isbn, Book, ImageLinks, IndustryIdentifiers, IsbnKind};
pub use error::{LookupError, ValidationError};
pub use http_client::{
    HttpAuth, HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, ReqwestHttpClient,
};
pub use resolver::{IsbnResolver, IsbnResolverBuilder};
pub use source::ProviderId;
