pub mod constants;
pub mod url_utils;

pub use constants::*;
pub use url_utils::{ResolvedUrl, is_absolute_reference, is_data_uri, resolve_url};
