//! Slug derivation for article titles.
//!
//! A slug is the lower-cased title with whitespace runs turned into `-` and
//! every remaining character that is neither a word character nor `-`
//! dropped. Word characters are Unicode-aware, so CJK titles keep their
//! text instead of collapsing to an empty slug.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w-]+").expect("valid regex"));

/// Derive the slug for `title`.
///
/// ```
/// use haosenyi_core::slug::slugify;
///
/// assert_eq!(slugify("Hello World!"), "hello-world");
/// ```
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let hyphenated = WHITESPACE.replace_all(&lowered, "-");
    NON_WORD.replace_all(&hyphenated, "").into_owned()
}

/// Derive the slug for `title`, rejecting titles that produce an empty slug.
pub fn slugify_checked(title: &str) -> Result<String, CoreError> {
    let slug = slugify(title);
    if slug.trim_matches('-').is_empty() {
        return Err(CoreError::Validation(
            "title must contain at least one letter or digit".into(),
        ));
    }
    Ok(slug)
}
