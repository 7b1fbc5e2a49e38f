use std::collections::{HashMap, HashSet};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::adapters::{GoodreadsAdapter, GoogleBooksAdapter, IsbndbAdapter, OpenLibraryAdapter};
use crate::book_source::BookSource;
use crate::config::{Credentials, ResolverConfig};
use crate::domain::isbn;
use crate::http_client::{HttpClient, ReqwestHttpClient};
use crate::{Book, LookupError, ProviderId};

/// Races every active provider for an ISBN and returns the first usable record.
///
/// The provider set, credentials and request executor are fixed at
/// construction. A resolver is `Send + Sync`; share it behind an `Arc` to
/// serve concurrent lookups.
///
/// # Example
///
/// ```rust,ignore
/// use isbnscout_core::{IsbnResolver, ProviderId};
///
/// // Reads GOODREAD_APIKEY / ISBNDB_APIKEY once, here.
/// let resolver = IsbnResolver::new(&[]);
/// let book = resolver.get("978-0-09-958898-6").await?;
/// println!("{} ({})", book.title, book.source);
/// ```
pub struct IsbnResolver {
    providers: Vec<ProviderId>,
    sources: HashMap<ProviderId, Arc<dyn BookSource>>,
    config: ResolverConfig,
}

impl IsbnResolver {
    /// Build a resolver over `providers` (all four when empty), reading API
    /// keys from the environment and using the reqwest transport.
    pub fn new(providers: &[ProviderId]) -> Self {
        Self::builder()
            .with_providers(providers.iter().copied())
            .with_config(ResolverConfig::from_env())
            .build()
    }

    /// Like [`new`](Self::new), but takes provider tags. Unknown tags are dropped.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::builder()
            .with_provider_names(names)
            .with_config(ResolverConfig::from_env())
            .build()
    }

    pub fn builder() -> IsbnResolverBuilder {
        IsbnResolverBuilder::default()
    }

    /// Active providers, in launch order.
    pub fn providers(&self) -> &[ProviderId] {
        &self.providers
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Normalize and checksum `isbn` without any I/O.
    pub fn validate_isbn(&self, isbn: &str) -> bool {
        isbn::is_valid(isbn)
    }

    /// Look up `isbn` across all active providers concurrently.
    ///
    /// The first provider to deliver a titled record wins; the others are
    /// aborted. Adapters receive `isbn` exactly as given, not normalized.
    ///
    /// # Errors
    ///
    /// - [`LookupError::InvalidIsbn`] when the checksum fails. No request is made.
    /// - [`LookupError::NotFound`] when every provider reports no result.
    pub async fn get(&self, isbn: &str) -> Result<Book, LookupError> {
        if !self.validate_isbn(isbn) {
            return Err(LookupError::InvalidIsbn {
                value: isbn.to_owned(),
            });
        }

        let started = Instant::now();
        let active = self
            .providers
            .iter()
            .filter_map(|provider| self.sources.get(provider).cloned())
            .collect::<Vec<_>>();
        let launched = active.len();
        if launched == 0 {
            debug!(isbn, "no active providers");
            return Err(not_found(isbn));
        }

        // Capacity covers every sender, so losers never block after we return.
        let (tx, mut rx) = mpsc::channel::<Option<Book>>(launched);
        let mut tasks = JoinSet::new();
        for source in active {
            let tx = tx.clone();
            let isbn = isbn.to_owned();
            let deadline = self.config.request_timeout;
            tasks.spawn(async move {
                let outcome = attempt(source.as_ref(), &isbn, deadline).await;
                let _ = tx.send(outcome).await;
            });
        }
        drop(tx);

        let mut received = 0;
        while let Some(outcome) = rx.recv().await {
            received += 1;
            if let Some(book) = outcome {
                info!(
                    provider = %book.source,
                    isbn,
                    elapsed_ms = elapsed_ms(started),
                    "resolved isbn"
                );
                // Dropping `tasks` aborts the providers still in flight.
                return Ok(book);
            }
            if received == launched {
                break;
            }
        }

        if received < launched {
            warn!(
                isbn,
                launched,
                received,
                "provider tasks ended without reporting"
            );
        }
        debug!(isbn, elapsed_ms = elapsed_ms(started), "no provider returned a record");
        Err(not_found(isbn))
    }
}

impl Debug for IsbnResolver {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IsbnResolver")
            .field("providers", &self.providers)
            .field("config", &self.config)
            .finish()
    }
}

/// Run one provider under the request deadline and collapse failures to `None`.
async fn attempt(source: &dyn BookSource, isbn: &str, deadline: Duration) -> Option<Book> {
    let provider = source.id();
    match tokio::time::timeout(deadline, source.lookup(isbn)).await {
        Ok(Ok(mut book)) if book.has_title() => {
            book.source = provider;
            Some(book)
        }
        Ok(Ok(_)) => {
            debug!(provider = %provider, isbn, "provider returned a record without title");
            None
        }
        Ok(Err(error)) => {
            debug!(provider = %provider, isbn, error = %error, "provider returned no result");
            None
        }
        Err(_) => {
            warn!(
                provider = %provider,
                isbn,
                timeout_ms = duration_ms(deadline),
                "provider exceeded request deadline"
            );
            None
        }
    }
}

fn not_found(isbn: &str) -> LookupError {
    LookupError::NotFound {
        isbn: isbn.to_owned(),
    }
}

/// Builder for [`IsbnResolver`].
///
/// Unlike [`IsbnResolver::new`], the builder never reads the environment on
/// its own; pass [`ResolverConfig::from_env`] to opt in.
///
/// ```rust,ignore
/// use isbnscout_core::{Credentials, IsbnResolver, ProviderId};
///
/// let resolver = IsbnResolver::builder()
///     .with_providers([ProviderId::Google, ProviderId::Isbndb])
///     .with_credentials(Credentials::default().with_isbndb("key"))
///     .build();
/// ```
#[derive(Default)]
pub struct IsbnResolverBuilder {
    requested: Option<Vec<ProviderId>>,
    config: ResolverConfig,
    http_client: Option<Arc<dyn HttpClient>>,
    custom_sources: Vec<Arc<dyn BookSource>>,
}

impl IsbnResolverBuilder {
    /// Restrict lookups to `providers`. An empty list selects all four.
    pub fn with_providers(mut self, providers: impl IntoIterator<Item = ProviderId>) -> Self {
        let providers = providers.into_iter().collect::<Vec<_>>();
        self.requested = if providers.is_empty() {
            None
        } else {
            Some(providers)
        };
        self
    }

    /// Same as [`with_providers`](Self::with_providers) for string tags.
    ///
    /// Unknown tags are logged and dropped. A non-empty list of only unknown
    /// tags yields a resolver with no active providers.
    pub fn with_provider_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut any = false;
        let mut providers = Vec::new();
        for name in names {
            any = true;
            match name.as_ref().parse::<ProviderId>() {
                Ok(provider) => providers.push(provider),
                Err(error) => warn!(error = %error, "ignoring unknown provider"),
            }
        }
        self.requested = any.then_some(providers);
        self
    }

    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.config.credentials = credentials;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    /// Executor shared by the built-in adapters. Defaults to [`ReqwestHttpClient`].
    pub fn with_http_client(mut self, http_client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(http_client);
        self
    }

    /// Replace the built-in adapter for `source.id()`.
    ///
    /// Credential rules still apply: a custom Goodreads or ISBNDB source is
    /// only activated when the matching key is configured.
    pub fn with_source(mut self, source: Arc<dyn BookSource>) -> Self {
        self.custom_sources.push(source);
        self
    }

    pub fn build(self) -> IsbnResolver {
        let http_client = self
            .http_client
            .unwrap_or_else(|| Arc::new(ReqwestHttpClient::new()));
        let credentials = &self.config.credentials;
        let timeout_ms = duration_ms(self.config.request_timeout);

        let mut sources: HashMap<ProviderId, Arc<dyn BookSource>> = HashMap::new();
        sources.insert(
            ProviderId::Google,
            Arc::new(GoogleBooksAdapter::new(http_client.clone()).with_timeout_ms(timeout_ms)),
        );
        sources.insert(
            ProviderId::OpenLibrary,
            Arc::new(OpenLibraryAdapter::new(http_client.clone()).with_timeout_ms(timeout_ms)),
        );
        if let Some(key) = credentials.goodreads() {
            sources.insert(
                ProviderId::Goodreads,
                Arc::new(GoodreadsAdapter::new(http_client.clone(), key).with_timeout_ms(timeout_ms)),
            );
        }
        if let Some(key) = credentials.isbndb() {
            sources.insert(
                ProviderId::Isbndb,
                Arc::new(IsbndbAdapter::new(http_client.clone(), key).with_timeout_ms(timeout_ms)),
            );
        }
        for source in self.custom_sources {
            sources.insert(source.id(), source);
        }

        let requested = self.requested.as_deref().unwrap_or(&ProviderId::ALL);
        let providers = resolve_providers(requested, &sources, credentials);
        debug!(providers = ?providers, "resolver configured");

        IsbnResolver {
            providers,
            sources,
            config: self.config,
        }
    }
}

/// Deduplicate (first occurrence wins), keep registered providers, drop
/// providers whose credential is missing.
fn resolve_providers(
    requested: &[ProviderId],
    sources: &HashMap<ProviderId, Arc<dyn BookSource>>,
    credentials: &Credentials,
) -> Vec<ProviderId> {
    let mut seen = HashSet::new();
    requested
        .iter()
        .copied()
        .filter(|provider| seen.insert(*provider))
        .filter(|provider| sources.contains_key(provider))
        .filter(|provider| credentials.permits(*provider))
        .collect()
}

fn duration_ms(duration: Duration) -> u64 {
    duration.as_millis().min(u128::from(u64::MAX)) as u64
}

fn elapsed_ms(started: Instant) -> u64 {
    duration_ms(started.elapsed())
}
