//! URL handling module for Doc-Harvest
//!
//! This module provides seed URL validation, visited-set normalization,
//! the URL-to-filename mapping and the link scope filter.

mod filename;
mod normalize;
mod scope;

pub use filename::url_to_filename;
pub use normalize::{normalize_url, parse_seed_url};
pub use scope::LinkScopeFilter;
