//! Tag codec
//!
//! Tags are `key:value` strings used for exact-match lookups in the memory
//! facility. A tag set is an ordered, de-duplicated list of tags.
//!
//! ## Invariants
//!
//! - `encode` trims both parts and rejects empty parts or a `:` in the key
//! - `normalize` keeps the first occurrence of each tag and never reorders
//! - `normalize` is idempotent

mod builder;
mod facets;

pub use builder::*;
pub use facets::*;

use std::collections::{BTreeSet, HashSet};

use crate::error::{CrewDbError, Result};

/// Separator between tag key and value
pub const TAG_SEPARATOR: char = ':';

/// Build a single `key:value` tag
pub fn encode(key: &str, value: &str) -> Result<String> {
    let key = key.trim();
    let value = value.trim();
    if key.is_empty() || value.is_empty() {
        return Err(CrewDbError::invalid_tag(format!(
            "tag key/value cannot be empty (key={:?}, value={:?})",
            key, value
        )));
    }
    if key.contains(TAG_SEPARATOR) {
        return Err(CrewDbError::invalid_tag(format!(
            "tag key must not include ':' (key={:?})",
            key
        )));
    }
    Ok(format!("{}{}{}", key, TAG_SEPARATOR, value))
}

/// Split a tag into its trimmed key and value
pub fn decode(tag: &str) -> Result<(String, String)> {
    let (key, value) = tag.split_once(TAG_SEPARATOR).ok_or_else(|| {
        CrewDbError::invalid_tag(format!("'{}'. Expected format 'key:value'", tag))
    })?;
    let (key, value) = (key.trim(), value.trim());
    if key.is_empty() || value.is_empty() {
        return Err(CrewDbError::invalid_tag(format!(
            "'{}' has an empty key or value",
            tag
        )));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Validate and de-duplicate a tag sequence, preserving first-seen order
///
/// Only the separator is checked here, so `"stage:"` and `":x"` pass even
/// though [`decode`] rejects them. Build tags with [`encode`] to rule out
/// empty components.
pub fn normalize<I, S>(tags: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for tag in tags {
        let tag = tag.as_ref();
        if tag.is_empty() || !tag.contains(TAG_SEPARATOR) {
            return Err(CrewDbError::invalid_tag(format!(
                "'{}'. Expected format 'key:value'",
                tag
            )));
        }
        if seen.insert(tag.to_string()) {
            out.push(tag.to_string());
        }
    }
    Ok(out)
}

/// Distinct keys present in a tag set
pub fn tag_keys<S: AsRef<str>>(tags: &[S]) -> BTreeSet<&str> {
    tags.iter()
        .filter_map(|t| t.as_ref().split_once(TAG_SEPARATOR).map(|(k, _)| k))
        .collect()
}
