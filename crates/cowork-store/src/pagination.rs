//! Paging over space listings
//!
//! Continuation tokens issued here are `{"id": <last id>}`. Only this module
//! reads or writes their contents.

use cowork_core::error::{CoworkError, Result};
use cowork_core::models::Space;
use cowork_core::query::{ContinuationToken, SpaceQuery};
use serde_json::json;

use crate::ports::SpacePage;

/// Order matches by id and cut the page described by the query
pub fn paginate(mut matches: Vec<Space>, query: &SpaceQuery) -> Result<SpacePage> {
    matches.sort_by_key(|space| space.id);
    let total = matches.len();

    let Some(limit) = query.limit else {
        return Ok(SpacePage { spaces: matches, total, last_key: None });
    };

    let after = query.last_key.as_ref().map(token_id).transpose()?;
    let mut remaining: Vec<Space> = match after {
        Some(after) => matches.into_iter().filter(|space| space.id.0 > after).collect(),
        None => matches,
    };

    let has_more = remaining.len() > limit;
    remaining.truncate(limit);

    let last_key = if has_more {
        remaining.last().map(|space| ContinuationToken::new(json!({ "id": space.id.0 })))
    } else {
        None
    };

    Ok(SpacePage { spaces: remaining, total, last_key })
}

fn token_id(token: &ContinuationToken) -> Result<i64> {
    token.as_value().get("id").and_then(|id| id.as_i64()).ok_or_else(|| {
        CoworkError::invalid_parameter("lastKey", "not a continuation token issued by this directory")
    })
}
