use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Canonical identifiers of the upstream book services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Google,
    OpenLibrary,
    Goodreads,
    Isbndb,
}

impl ProviderId {
    /// Default provider set, used when the caller does not pick any.
    pub const ALL: [Self; 4] = [Self::Google, Self::OpenLibrary, Self::Goodreads, Self::Isbndb];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::OpenLibrary => "openlibrary",
            Self::Goodreads => "goodreads",
            Self::Isbndb => "isbndb",
        }
    }

    /// Whether the provider is disabled unless an API key is configured.
    pub const fn requires_credential(self) -> bool {
        matches!(self, Self::Goodreads | Self::Isbndb)
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "openlibrary" => Ok(Self::OpenLibrary),
            "goodreads" => Ok(Self::Goodreads),
            "isbndb" => Ok(Self::Isbndb),
            other => Err(ValidationError::UnknownProvider {
                value: other.to_owned(),
            }),
        }
    }
}
