//! Backend accessor for Letterboxd user data.
//!
//! This crate defines the [`Backend`] trait the request handlers fetch
//! through, one method per [`View`], and the [`LetterboxdBackend`] that
//! implements it by scraping letterboxd.com.
//!
//! Every failure is classified at this boundary as either
//! [`BackendError::NotFound`] (the user does not exist upstream) or
//! [`BackendError::Upstream`] (anything else). Nothing here retries.
//!
//! Enable the `testing` feature for [`MockBackend`], an in-memory backend
//! with call counters and failure injection.

mod backend;
mod error;
mod letterboxd;
#[cfg(any(test, feature = "testing"))]
mod mock;
mod types;

pub use backend::{Backend, SharedBackend};
pub use error::{BackendError, Result};
pub use letterboxd::{LetterboxdBackend, LetterboxdConfig};
#[cfg(any(test, feature = "testing"))]
pub use mock::{MockBackend, MockUser};
pub use types::{Film, Profile, View};
