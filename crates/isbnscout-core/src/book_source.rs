//! Book source trait and adapter-level errors.
//!
//! Every provider adapter implements [`BookSource`]. An adapter performs a
//! single HTTP GET per lookup and either projects the payload into a
//! [`Book`] or fails with a [`SourceError`]. The resolver treats every
//! `Err` as "no result" from that provider; source errors never reach the
//! caller of [`IsbnResolver::get`](crate::IsbnResolver::get).
//!
//! # Failure kinds
//!
//! | Kind | Raised when |
//! |------|-------------|
//! | `Transport` | the executor failed (connect, timeout, body read) |
//! | `UpstreamStatus` | status outside 200..=299 |
//! | `Decode` | JSON/XML payload could not be decoded |
//! | `NotFound` | payload decoded but holds no usable record |
//! | `IdentityMismatch` | record describes a different ISBN than requested |

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::http_client::HttpError;
use crate::{Book, ProviderId};

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    Transport,
    UpstreamStatus,
    Decode,
    NotFound,
    IdentityMismatch,
}

/// Structured adapter error, logged by the resolver and then discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
}

impl SourceError {
    pub fn transport(provider: ProviderId, error: &HttpError) -> Self {
        Self {
            kind: SourceErrorKind::Transport,
            message: format!("{provider} transport error: {}", error.message()),
        }
    }

    pub fn upstream_status(provider: ProviderId, status: u16) -> Self {
        Self {
            kind: SourceErrorKind::UpstreamStatus,
            message: format!("{provider} upstream returned status {status}"),
        }
    }

    pub fn decode(provider: ProviderId, detail: impl Display) -> Self {
        Self {
            kind: SourceErrorKind::Decode,
            message: format!("failed to decode {provider} response: {detail}"),
        }
    }

    pub fn not_found(provider: ProviderId, detail: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::NotFound,
            message: format!("{provider}: {}", detail.into()),
        }
    }

    pub fn identity_mismatch(provider: ProviderId, requested: &str) -> Self {
        Self {
            kind: SourceErrorKind::IdentityMismatch,
            message: format!("{provider} response does not describe isbn '{requested}'"),
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Transport => "source.transport",
            SourceErrorKind::UpstreamStatus => "source.upstream_status",
            SourceErrorKind::Decode => "source.decode",
            SourceErrorKind::NotFound => "source.not_found",
            SourceErrorKind::IdentityMismatch => "source.identity_mismatch",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Provider adapter contract.
///
/// `lookup` receives the ISBN exactly as the caller typed it. It must not
/// panic, must issue at most one request, and must only return `Ok` for a
/// record whose identifiers echo the requested ISBN and whose title is
/// non-empty. The returned book's `source` is [`id`](BookSource::id).
pub trait BookSource: Send + Sync {
    fn id(&self) -> ProviderId;

    fn lookup<'a>(
        &'a self,
        isbn: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Book, SourceError>> + Send + 'a>>;
}
