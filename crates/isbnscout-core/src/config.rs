//! Resolver configuration.
//!
//! # Environment Variables
//!
//! | Provider | Env Var |
//! |----------|---------|
//! | Goodreads | `GOODREAD_APIKEY` |
//! | ISBNDB | `ISBNDB_APIKEY` |
//! | Google Books | (no key required) |
//! | Open Library | (no key required) |
//!
//! A missing, empty or whitespace-only key disables the provider; it is
//! never an error.

use std::env;
use std::fmt::{Debug, Formatter};
use std::time::Duration;

use crate::http_client::DEFAULT_TIMEOUT_MS;
use crate::ProviderId;

pub const GOODREADS_API_KEY_ENV: &str = "GOODREAD_APIKEY";
pub const ISBNDB_API_KEY_ENV: &str = "ISBNDB_APIKEY";

/// API keys for the providers that need one.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    goodreads: Option<String>,
    isbndb: Option<String>,
}

impl Credentials {
    pub fn new(goodreads: Option<String>, isbndb: Option<String>) -> Self {
        Self {
            goodreads: goodreads.and_then(non_blank),
            isbndb: isbndb.and_then(non_blank),
        }
    }

    /// Read both keys from the process environment.
    pub fn from_env() -> Self {
        Self::new(
            env::var(GOODREADS_API_KEY_ENV).ok(),
            env::var(ISBNDB_API_KEY_ENV).ok(),
        )
    }

    pub fn with_goodreads(mut self, key: impl Into<String>) -> Self {
        self.goodreads = non_blank(key.into());
        self
    }

    pub fn with_isbndb(mut self, key: impl Into<String>) -> Self {
        self.isbndb = non_blank(key.into());
        self
    }

    pub fn goodreads(&self) -> Option<&str> {
        self.goodreads.as_deref()
    }

    pub fn isbndb(&self) -> Option<&str> {
        self.isbndb.as_deref()
    }

    /// Key configured for `provider`, if it has one.
    pub fn key_for(&self, provider: ProviderId) -> Option<&str> {
        match provider {
            ProviderId::Goodreads => self.goodreads(),
            ProviderId::Isbndb => self.isbndb(),
            ProviderId::Google | ProviderId::OpenLibrary => None,
        }
    }

    /// Whether `provider` may be enabled with these credentials.
    pub fn permits(&self, provider: ProviderId) -> bool {
        !provider.requires_credential() || self.key_for(provider).is_some()
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("goodreads", &self.goodreads.as_ref().map(|_| "<redacted>"))
            .field("isbndb", &self.isbndb.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Settings fixed for the lifetime of a resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    pub credentials: Credentials,
    /// Deadline for each provider request, including the body read.
    pub request_timeout: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            credentials: Credentials::default(),
            request_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

impl ResolverConfig {
    pub fn from_env() -> Self {
        Self {
            credentials: Credentials::from_env(),
            ..Self::default()
        }
    }
}
