//! Space list queries and their query-string form
//!
//! A [`SpaceQuery`] is built from two independently serialized groups: the
//! filter parameters (`location`, `priceMin`, `priceMax`, `rating`,
//! `services`) and the bounds parameters (`north`, `south`, `east`, `west`).
//! Paging adds `limit` and an opaque `lastKey`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoworkError, Result};
use crate::models::{FilterCriteria, MapBounds, MinRating, Space};

/// Largest page a caller may request
pub const MAX_PAGE_LIMIT: usize = 100;

/// Opaque continuation token for paged listings.
///
/// Its contents belong to the storage layer. Everything above it only
/// encodes, decodes and forwards the value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContinuationToken(serde_json::Value);

impl ContinuationToken {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    /// Serialized form carried in the `lastKey` query parameter
    pub fn encode(&self) -> String {
        self.0.to_string()
    }

    pub fn decode(raw: &str) -> Result<Self> {
        serde_json::from_str(raw)
            .map(Self)
            .map_err(|e| CoworkError::invalid_parameter("lastKey", format!("not valid JSON: {}", e)))
    }
}

/// Cache key of a space list query.
///
/// Derived from the applied filters and the serialized viewport; service
/// selection order does not change the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey(String);

impl QueryKey {
    pub fn new(filters: &FilterCriteria, bounds: &MapBounds) -> Self {
        let mut services = filters.services.clone();
        services.sort();
        let location = filters.location.as_deref().map(str::trim).filter(|l| !l.is_empty());

        let canonical = serde_json::json!({
            "location": location,
            "priceMin": filters.price_min,
            "priceMax": filters.price_max,
            "rating": filters.min_rating.map(u8::from),
            "services": services,
            "bounds": bounds.serialize_key(),
        });

        Self(canonical.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A request for a list of spaces
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpaceQuery {
    pub filters: FilterCriteria,
    pub bounds: Option<MapBounds>,
    pub limit: Option<usize>,
    pub last_key: Option<ContinuationToken>,
}

impl SpaceQuery {
    pub fn new(filters: FilterCriteria, bounds: Option<MapBounds>) -> Self {
        Self { filters, bounds, limit: None, last_key: None }
    }

    pub fn with_page(mut self, limit: usize, last_key: Option<ContinuationToken>) -> Self {
        self.limit = Some(limit);
        self.last_key = last_key;
        self
    }

    pub fn is_paginated(&self) -> bool {
        self.limit.is_some()
    }

    /// Key for caching results; `None` while there is no viewport
    pub fn key(&self) -> Option<QueryKey> {
        self.bounds.as_ref().map(|bounds| QueryKey::new(&self.filters, bounds))
    }

    /// Filter parameters followed by bounds and paging parameters
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = self.filters.to_params();
        if let Some(bounds) = &self.bounds {
            params.extend(bounds.to_params());
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(last_key) = &self.last_key {
            params.push(("lastKey", last_key.encode()));
        }
        params
    }

    /// Check a space against the filters and the viewport
    pub fn matches(&self, space: &Space) -> bool {
        self.filters.matches(space)
            && self.bounds.map_or(true, |bounds| bounds.contains(space.lat, space.lng))
    }

    /// Parse decoded query-string pairs.
    ///
    /// Empty values are treated as absent and unknown keys are ignored.
    /// `services` may repeat and each value may hold a comma separated list.
    pub fn from_params<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut filters = FilterCriteria::default();
        let mut corners: [Option<f64>; 4] = [None; 4];
        let mut limit = None;
        let mut last_key = None;

        for (key, value) in pairs {
            let key = key.as_ref();
            let value = value.as_ref().trim();
            if value.is_empty() {
                continue;
            }

            match key {
                "location" => filters.location = Some(value.to_string()),
                "priceMin" => filters.price_min = Some(parse_price(key, value)?),
                "priceMax" => filters.price_max = Some(parse_price(key, value)?),
                "rating" => filters.min_rating = Some(value.parse::<MinRating>()?),
                "services" => {
                    for tag in value.split(',').map(str::trim).filter(|t| !t.is_empty()) {
                        filters = filters.with_service(tag);
                    }
                }
                "north" => corners[0] = Some(parse_coordinate(key, value)?),
                "south" => corners[1] = Some(parse_coordinate(key, value)?),
                "east" => corners[2] = Some(parse_coordinate(key, value)?),
                "west" => corners[3] = Some(parse_coordinate(key, value)?),
                "limit" => limit = Some(parse_limit(value)?),
                "lastKey" => last_key = Some(ContinuationToken::decode(value)?),
                _ => {}
            }
        }

        if let (Some(min), Some(max)) = (filters.price_min, filters.price_max) {
            if min > max {
                return Err(CoworkError::invalid_parameter(
                    "priceMin",
                    "must not be greater than priceMax",
                ));
            }
        }

        let bounds = match corners {
            [Some(north), Some(south), Some(east), Some(west)] => {
                Some(MapBounds::new(north, south, east, west)?)
            }
            [None, None, None, None] => None,
            _ => {
                return Err(CoworkError::invalid_parameter(
                    "bounds",
                    "north, south, east and west must be given together",
                ))
            }
        };

        Ok(Self { filters, bounds, limit, last_key })
    }
}

fn parse_price(key: &str, value: &str) -> Result<f64> {
    match value.parse::<f64>() {
        Ok(price) if price.is_finite() && price >= 0.0 => Ok(price),
        _ => Err(CoworkError::invalid_parameter(key, format!("'{}' is not a valid price", value))),
    }
}

fn parse_coordinate(key: &str, value: &str) -> Result<f64> {
    value
        .parse::<f64>()
        .map_err(|_| CoworkError::invalid_parameter(key, format!("'{}' is not a number", value)))
}

fn parse_limit(value: &str) -> Result<usize> {
    match value.parse::<usize>() {
        Ok(limit) if (1..=MAX_PAGE_LIMIT).contains(&limit) => Ok(limit),
        _ => Err(CoworkError::invalid_parameter(
            "limit",
            format!("must be a whole number between 1 and {}", MAX_PAGE_LIMIT),
        )),
    }
}
