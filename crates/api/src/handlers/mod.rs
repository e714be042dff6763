pub mod articles;
pub mod auth;
pub mod fallback;
pub mod webhook;
pub mod works;

use haosenyi_core::pagination::PageRequest;

use crate::validation::non_blank;

/// Parse `page`/`limit` query values leniently: anything that is not an
/// integer falls back to the default before clamping.
pub(crate) fn page_request(page: Option<&str>, limit: Option<&str>) -> PageRequest {
    let parse = |raw: Option<&str>| non_blank(raw).and_then(|v| v.parse::<i64>().ok());
    PageRequest::new(parse(page), parse(limit))
}
