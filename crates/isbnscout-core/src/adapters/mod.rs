mod goodreads;
mod google;
mod isbndb;
mod openlibrary;

pub use goodreads::GoodreadsAdapter;
pub use google::GoogleBooksAdapter;
pub use isbndb::IsbndbAdapter;
pub use openlibrary::OpenLibraryAdapter;

use serde::{Deserialize, Deserializer};

use crate::book_source::SourceError;
use crate::http_client::{HttpClient, HttpRequest};
use crate::ProviderId;

/// Issue `request` once and return the body of a 2xx response.
pub(crate) async fn fetch_body(
    http_client: &dyn HttpClient,
    provider: ProviderId,
    request: HttpRequest,
) -> Result<String, SourceError> {
    let response = http_client
        .execute(request)
        .await
        .map_err(|error| SourceError::transport(provider, &error))?;

    if !response.is_success() {
        return Err(SourceError::upstream_status(provider, response.status));
    }

    Ok(response.body)
}

/// Read an explicit JSON `null` as the field's default, like a missing key.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
