use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::space::Space;
use crate::error::CoworkError;

/// Minimum star rating a space must have
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum MinRating {
    Three = 3,
    Four = 4,
    Five = 5,
}

impl MinRating {
    pub fn value(&self) -> f64 {
        f64::from(u8::from(*self))
    }
}

impl TryFrom<u8> for MinRating {
    type Error = CoworkError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            3 => Ok(MinRating::Three),
            4 => Ok(MinRating::Four),
            5 => Ok(MinRating::Five),
            other => Err(CoworkError::invalid_parameter(
                "rating",
                format!("{} is not a supported rating (use 3, 4 or 5)", other),
            )),
        }
    }
}

impl From<MinRating> for u8 {
    fn from(rating: MinRating) -> Self {
        rating as u8
    }
}

impl FromStr for MinRating {
    type Err = CoworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().parse::<u8>().map_err(|_| {
            CoworkError::invalid_parameter("rating", format!("'{}' is not a whole number", s))
        })?;
        MinRating::try_from(value)
    }
}

impl fmt::Display for MinRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", u8::from(*self))
    }
}

/// Criteria a user filters the directory by.
///
/// The client keeps two copies: a draft being edited and the applied copy
/// that drives queries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_rating: Option<MinRating>,

    /// Selected service tags, unique, in selection order
    #[serde(default)]
    pub services: Vec<String>,
}

/// A single editable field of [`FilterCriteria`]
#[derive(Debug, Clone, PartialEq)]
pub enum FilterField {
    Location(Option<String>),
    PriceMin(Option<f64>),
    PriceMax(Option<f64>),
    MinRating(Option<MinRating>),
    Services(Vec<String>),
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a copy with exactly one field replaced
    pub fn with_field(&self, field: FilterField) -> Self {
        let mut next = self.clone();
        match field {
            FilterField::Location(location) => {
                next.location = location.map(|l| l.trim().to_string()).filter(|l| !l.is_empty());
            }
            FilterField::PriceMin(price) => next.price_min = price,
            FilterField::PriceMax(price) => next.price_max = price,
            FilterField::MinRating(rating) => next.min_rating = rating,
            FilterField::Services(services) => next.services = dedup_tags(services),
        }
        next
    }

    pub fn with_location(self, location: impl Into<String>) -> Self {
        self.with_field(FilterField::Location(Some(location.into())))
    }

    pub fn with_price_range(self, min: Option<f64>, max: Option<f64>) -> Self {
        self.with_field(FilterField::PriceMin(min)).with_field(FilterField::PriceMax(max))
    }

    pub fn with_min_rating(self, rating: MinRating) -> Self {
        self.with_field(FilterField::MinRating(Some(rating)))
    }

    pub fn with_service(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        if !self.services.contains(&tag) {
            self.services.push(tag);
        }
        self
    }

    /// Services field with `tag` added, or removed if already selected
    pub fn toggled_service(&self, tag: &str) -> FilterField {
        let mut services = self.services.clone();
        match services.iter().position(|s| s == tag) {
            Some(index) => {
                services.remove(index);
            }
            None => services.push(tag.to_string()),
        }
        FilterField::Services(services)
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Query parameters for these criteria; `services` repeats once per tag
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();

        if let Some(location) = self.location.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
            params.push(("location", location.to_string()));
        }
        if let Some(min) = self.price_min {
            params.push(("priceMin", min.to_string()));
        }
        if let Some(max) = self.price_max {
            params.push(("priceMax", max.to_string()));
        }
        if let Some(rating) = self.min_rating {
            params.push(("rating", rating.to_string()));
        }
        for tag in &self.services {
            params.push(("services", tag.clone()));
        }

        params
    }

    /// Check a space against every criterion.
    ///
    /// Location is a case-insensitive substring of name, city or address.
    /// Price matches when any package lies in the range. Services match when
    /// the space offers any selected tag.
    pub fn matches(&self, space: &Space) -> bool {
        if let Some(location) = self.location.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
            let needle = location.to_lowercase();
            let hit = [&space.name, &space.city, &space.address]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }

        if self.price_min.is_some() || self.price_max.is_some() {
            let min = self.price_min.unwrap_or(f64::NEG_INFINITY);
            let max = self.price_max.unwrap_or(f64::INFINITY);
            if !space.pricing_packages.iter().any(|p| p.price >= min && p.price <= max) {
                return false;
            }
        }

        if let Some(rating) = self.min_rating {
            if space.rating < rating.value() {
                return false;
            }
        }

        self.services.is_empty() || space.offers_any(&self.services)
    }
}

fn dedup_tags(tags: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_string();
        if !tag.is_empty() && !unique.contains(&tag) {
            unique.push(tag);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::space::{BillingPeriod, PricingPackage, SpaceId};

    fn space(rating: f64, prices: &[f64], tags: &[&str]) -> Space {
        Space {
            id: SpaceId(1),
            name: "Factory Görlitzer Park".to_string(),
            city: "Berlin".to_string(),
            address: "Lohmühlenstraße 65".to_string(),
            lat: 52.49,
            lng: 13.45,
            rating,
            image_url: None,
            description: None,
            service_ids: tags.iter().map(|t| t.to_string()).collect(),
            pricing_packages: prices
                .iter()
                .enumerate()
                .map(|(i, price)| PricingPackage {
                    id: i as i64,
                    space_id: SpaceId(1),
                    name: format!("Package {}", i),
                    price: *price,
                    billing_period: BillingPeriod::Day,
                    features: vec![],
                })
                .collect(),
        }
    }

    #[test]
    fn test_default_matches_everything() {
        assert!(FilterCriteria::default().matches(&space(1.0, &[], &[])));
    }

    #[test]
    fn test_location_is_case_insensitive() {
        let s = space(4.0, &[], &[]);
        assert!(FilterCriteria::new().with_location("berlin").matches(&s));
        assert!(FilterCriteria::new().with_location("GÖRLITZER").matches(&s));
        assert!(!FilterCriteria::new().with_location("Munich").matches(&s));
    }

    #[test]
    fn test_price_range_uses_any_package() {
        let s = space(4.0, &[15.0, 250.0], &[]);
        assert!(FilterCriteria::new().with_price_range(Some(10.0), Some(20.0)).matches(&s));
        assert!(FilterCriteria::new().with_price_range(Some(200.0), None).matches(&s));
        assert!(!FilterCriteria::new().with_price_range(Some(20.0), Some(200.0)).matches(&s));
        assert!(!FilterCriteria::new()
            .with_price_range(None, Some(100.0))
            .matches(&space(4.0, &[], &[])));
    }

    #[test]
    fn test_rating_and_services() {
        let s = space(4.2, &[], &["wifi", "coffee"]);
        assert!(FilterCriteria::new().with_min_rating(MinRating::Four).matches(&s));
        assert!(!FilterCriteria::new().with_min_rating(MinRating::Five).matches(&s));
        assert!(FilterCriteria::new().with_service("parking").with_service("wifi").matches(&s));
        assert!(!FilterCriteria::new().with_service("parking").matches(&s));
    }

    #[test]
    fn test_params_repeat_services_in_order() {
        let filters = FilterCriteria::new()
            .with_min_rating(MinRating::Four)
            .with_service("wifi")
            .with_service("coffee");
        assert_eq!(
            filters.to_params(),
            vec![
                ("rating", "4".to_string()),
                ("services", "wifi".to_string()),
                ("services", "coffee".to_string()),
            ]
        );
    }

    #[test]
    fn test_with_field_replaces_one_field() {
        let base = FilterCriteria::new().with_location("Berlin");
        let next = base.with_field(FilterField::MinRating(Some(MinRating::Three)));
        assert_eq!(next.location.as_deref(), Some("Berlin"));
        assert_eq!(next.min_rating, Some(MinRating::Three));
        assert_eq!(base.min_rating, None);

        let blank = next.with_field(FilterField::Location(Some("   ".to_string())));
        assert_eq!(blank.location, None);
    }

    #[test]
    fn test_toggle_service() {
        let filters = FilterCriteria::new().with_service("wifi");
        let added = filters.with_field(filters.toggled_service("coffee"));
        assert_eq!(added.services, vec!["wifi", "coffee"]);
        let removed = added.with_field(added.toggled_service("wifi"));
        assert_eq!(removed.services, vec!["coffee"]);
    }

    #[test]
    fn test_rating_serializes_as_number() {
        let filters = FilterCriteria::new().with_min_rating(MinRating::Five);
        let value = serde_json::to_value(&filters).unwrap();
        assert_eq!(value["minRating"], serde_json::json!(5));
        assert!(serde_json::from_value::<MinRating>(serde_json::json!(2)).is_err());
    }
}
