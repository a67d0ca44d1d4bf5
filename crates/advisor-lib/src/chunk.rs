//! Fixed-size batching for backend query ceilings

use crate::error::{AdvisorError, Result};

/// Split `items` into ordered chunks of at most `limit` elements.
///
/// Chunks cover every input element exactly once in input order; the last
/// chunk may be shorter. An empty input yields no chunks at all. The
/// returned iterator is lazy — nothing is copied.
pub fn chunked<T>(items: &[T], limit: usize) -> Result<impl Iterator<Item = &[T]>> {
    if limit == 0 {
        return Err(AdvisorError::Configuration(
            "batch limit must be positive".to_string(),
        ));
    }
    Ok(items.chunks(limit))
}
