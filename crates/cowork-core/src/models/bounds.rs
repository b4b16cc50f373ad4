use geo::{coord, Intersects, Point, Rect};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoworkError, Result};

/// Visible geographic box of the map viewport, in WGS 84 degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapBounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl MapBounds {
    /// Create validated bounds.
    ///
    /// `west > east` is accepted and describes a box crossing the antimeridian.
    pub fn new(north: f64, south: f64, east: f64, west: f64) -> Result<Self> {
        for (key, value, limit) in
            [("north", north, 90.0), ("south", south, 90.0), ("east", east, 180.0), ("west", west, 180.0)]
        {
            if !value.is_finite() || value.abs() > limit {
                return Err(CoworkError::invalid_parameter(
                    key,
                    format!("must be a number between -{limit} and {limit}"),
                ));
            }
        }

        if south > north {
            return Err(CoworkError::invalid_parameter("south", "must not be greater than north"));
        }

        Ok(Self { north, south, east, west })
    }

    pub fn crosses_antimeridian(&self) -> bool {
        self.west > self.east
    }

    /// Boundary-inclusive containment test for a coordinate
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        let point = Point::new(lng, lat);
        self.rects().iter().any(|rect| rect.intersects(&point))
    }

    fn rects(&self) -> Vec<Rect<f64>> {
        if self.crosses_antimeridian() {
            vec![
                Rect::new(coord! { x: self.west, y: self.south }, coord! { x: 180.0, y: self.north }),
                Rect::new(coord! { x: -180.0, y: self.south }, coord! { x: self.east, y: self.north }),
            ]
        } else {
            vec![Rect::new(
                coord! { x: self.west, y: self.south },
                coord! { x: self.east, y: self.north },
            )]
        }
    }

    /// Textual form used in cache keys, formatted exactly like the query parameters
    pub fn serialize_key(&self) -> String {
        self.to_params().into_iter().map(|(_, v)| v).collect::<Vec<_>>().join(",")
    }

    /// Query parameters for this box
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("north", self.north.to_string()),
            ("south", self.south.to_string()),
            ("east", self.east.to_string()),
            ("west", self.west.to_string()),
        ]
    }
}

impl fmt::Display for MapBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "N {} S {} E {} W {}", self.north, self.south, self.east, self.west)
    }
}

impl FromStr for MapBounds {
    type Err = CoworkError;

    /// Parse `north,south,east,west`
    fn from_str(s: &str) -> Result<Self> {
        let parts = s
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| CoworkError::invalid_parameter("bounds", e.to_string()))?;

        match parts.as_slice() {
            [north, south, east, west] => MapBounds::new(*north, *south, *east, *west),
            _ => Err(CoworkError::invalid_parameter(
                "bounds",
                "expected four comma separated values: north,south,east,west",
            )),
        }
    }
}
