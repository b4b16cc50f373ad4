use chrono::{DateTime, Utc};
use cowork_core::models::{BlogPost, PricingPackage, Service, Space};
use serde::Serialize;
use tabled::Tabled;

/// One line of the spaces listing
#[derive(Debug, Tabled)]
pub struct SpaceRow {
    #[tabled(rename = "ID")]
    pub id: i64,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "City")]
    pub city: String,
    #[tabled(rename = "Rating")]
    pub rating: String,
    #[tabled(rename = "From")]
    pub from_price: String,
    #[tabled(rename = "Services")]
    pub services: String,
}

impl From<&Space> for SpaceRow {
    fn from(space: &Space) -> Self {
        Self {
            id: space.id.0,
            name: space.name.clone(),
            city: space.city.clone(),
            rating: format!("{:.1}", space.rating),
            from_price: space.lowest_price().map_or_else(|| "-".to_string(), |p| format!("{:.2}", p)),
            services: space.service_ids.iter().cloned().collect::<Vec<_>>().join(", "),
        }
    }
}

#[derive(Debug, Tabled)]
pub struct ServiceRow {
    #[tabled(rename = "Tag")]
    pub tag: String,
    #[tabled(rename = "Name")]
    pub name: String,
}

impl From<&Service> for ServiceRow {
    fn from(service: &Service) -> Self {
        Self { tag: service.service_id.clone(), name: service.display_name.clone() }
    }
}

#[derive(Debug, Tabled)]
pub struct PricingRow {
    #[tabled(rename = "Package")]
    pub name: String,
    #[tabled(rename = "Price")]
    pub price: String,
    #[tabled(rename = "Per")]
    pub period: String,
    #[tabled(rename = "Includes")]
    pub features: String,
}

impl From<&PricingPackage> for PricingRow {
    fn from(package: &PricingPackage) -> Self {
        Self {
            name: package.name.clone(),
            price: format!("{:.2}", package.price),
            period: package.billing_period.to_string(),
            features: package.features.join(", "),
        }
    }
}

#[derive(Debug, Tabled)]
pub struct PostRow {
    #[tabled(rename = "Slug")]
    pub slug: String,
    #[tabled(rename = "Title")]
    pub title: String,
    #[tabled(rename = "Published")]
    pub published: String,
}

impl From<&BlogPost> for PostRow {
    fn from(post: &BlogPost) -> Self {
        Self {
            slug: post.slug.clone(),
            title: post.title.clone(),
            published: post.published_at.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Configuration entry shown by `cowork config`
#[derive(Debug, Serialize, Tabled)]
pub struct ConfigRow {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Source")]
    pub source: String,
}

/// Output for the spaces command
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpacesOutput {
    pub spaces: Vec<Space>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_key: Option<String>,
}

/// Output for the report command
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportOutput {
    pub report_id: String,
    pub space_id: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}
