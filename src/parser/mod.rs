//! URL classification.
//!
//! Every input URL is turned into a [`UrlDescriptor`] before anything touches
//! the network: either a GitHub repository (whose latest release asset will
//! be fetched) or a direct link.
//!
//! # Example
//!
//! ```
//! use depfetch_core::parser::{DescriptorKind, classify};
//!
//! let desc = classify("https://github.com/acme/widget").unwrap();
//! assert!(matches!(desc.kind(), DescriptorKind::GithubRepository { .. }));
//! ```

mod descriptor;
mod error;
mod url;

pub use descriptor::{DescriptorKind, UrlDescriptor};
pub use error::{MAX_URL_LENGTH, ParseError};
pub use url::classify;
