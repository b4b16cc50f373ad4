use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::CoworkError;

/// Unique identifier for a coworking space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpaceId(pub i64);

impl fmt::Display for SpaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SpaceId {
    type Err = CoworkError;

    /// Parse a path segment into a space id. Only positive integers are valid.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().parse::<i64>() {
            Ok(id) if id > 0 => Ok(SpaceId(id)),
            _ => Err(CoworkError::InvalidSpaceId(s.to_string())),
        }
    }
}

/// A coworking space as listed in the directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Space {
    pub id: SpaceId,
    pub name: String,
    pub city: String,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    pub rating: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Tags of the services offered, resolved against the catalog at read time
    #[serde(default)]
    pub service_ids: BTreeSet<String>,

    /// Always serialized, empty when the space has no packages
    #[serde(default)]
    pub pricing_packages: Vec<PricingPackage>,
}

impl Space {
    /// True if the space offers at least one of the given service tags
    pub fn offers_any<'a>(&self, tags: impl IntoIterator<Item = &'a String>) -> bool {
        tags.into_iter().any(|tag| self.service_ids.contains(tag))
    }

    /// Cheapest package price, if any package exists
    pub fn lowest_price(&self) -> Option<f64> {
        self.pricing_packages.iter().map(|p| p.price).reduce(f64::min)
    }
}

/// Billing period of a pricing package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingPeriod {
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl BillingPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingPeriod::Hour => "hour",
            BillingPeriod::Day => "day",
            BillingPeriod::Week => "week",
            BillingPeriod::Month => "month",
            BillingPeriod::Year => "year",
        }
    }
}

impl fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BillingPeriod {
    type Err = CoworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hour" | "hourly" => Ok(BillingPeriod::Hour),
            "day" | "daily" => Ok(BillingPeriod::Day),
            "week" | "weekly" => Ok(BillingPeriod::Week),
            "month" | "monthly" => Ok(BillingPeriod::Month),
            "year" | "yearly" | "annual" => Ok(BillingPeriod::Year),
            _ => Err(CoworkError::Serialization(format!("Unknown billing period: {}", s))),
        }
    }
}

/// A pricing package offered by a space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingPackage {
    pub id: i64,

    /// Back-reference to the owning space
    pub space_id: SpaceId,
    pub name: String,
    pub price: f64,
    pub billing_period: BillingPeriod,
    #[serde(default)]
    pub features: Vec<String>,
}

/// Entry of the global service catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: i64,

    /// Stable tag referenced by `Space::service_ids`
    pub service_id: String,
    pub display_name: String,
}

/// A space together with its resolved services
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpaceDetail {
    #[serde(flatten)]
    pub space: Space,
    pub services: Vec<Service>,
}

impl SpaceDetail {
    /// Resolve the space's service tags against the catalog.
    ///
    /// Tags with no catalog entry are dropped; catalog order is kept.
    pub fn resolve(space: Space, catalog: &[Service]) -> Self {
        let services = catalog
            .iter()
            .filter(|service| space.service_ids.contains(&service.service_id))
            .cloned()
            .collect();
        Self { space, services }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(id: i64, tag: &str) -> Service {
        Service { id, service_id: tag.to_string(), display_name: tag.to_uppercase() }
    }

    #[test]
    fn test_space_id_parsing() {
        assert_eq!("42".parse::<SpaceId>().unwrap(), SpaceId(42));
        assert!("0".parse::<SpaceId>().is_err());
        assert!("-3".parse::<SpaceId>().is_err());
        assert!("abc".parse::<SpaceId>().is_err());
    }

    #[test]
    fn test_pricing_packages_default_to_empty() {
        let json = r#"{"id":1,"name":"Hub","city":"Berlin","address":"Main St 1","lat":52.5,"lng":13.4,"rating":4.5}"#;
        let space: Space = serde_json::from_str(json).unwrap();
        assert!(space.pricing_packages.is_empty());

        let value = serde_json::to_value(&space).unwrap();
        assert_eq!(value["pricingPackages"], serde_json::json!([]));
    }

    #[test]
    fn test_resolve_keeps_catalog_order_and_drops_unknown_tags() {
        let json = r#"{"id":1,"name":"Hub","city":"Berlin","address":"Main St 1","lat":52.5,"lng":13.4,"rating":4.5,"serviceIds":["wifi","coffee","sauna"]}"#;
        let space: Space = serde_json::from_str(json).unwrap();
        let catalog = vec![service(1, "coffee"), service(2, "parking"), service(3, "wifi")];

        let detail = SpaceDetail::resolve(space, &catalog);
        let tags: Vec<_> = detail.services.iter().map(|s| s.service_id.as_str()).collect();
        assert_eq!(tags, vec!["coffee", "wifi"]);
    }

    #[test]
    fn test_billing_period_aliases() {
        assert_eq!("monthly".parse::<BillingPeriod>().unwrap(), BillingPeriod::Month);
        assert_eq!("Day".parse::<BillingPeriod>().unwrap(), BillingPeriod::Day);
        assert!("fortnight".parse::<BillingPeriod>().is_err());
    }
}
