//! # Domain Models
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Book`] | Normalized record returned by a lookup |
//! | [`IndustryIdentifiers`] | ISBN-10 / ISBN-13 pair echoed by the provider |
//! | [`ImageLinks`] | Cover URLs (small, medium, large) |
//! | [`IsbnKind`] | Form of a validated ISBN |
//!
//! The [`isbn`] module holds the checksum routines used both for request
//! validation and by the Goodreads adapter, whose payload carries no ISBN.

mod book;
pub mod isbn;

pub use book::{Book, ImageLinks, IndustryIdentifiers};
pub use isbn::IsbnKind;
