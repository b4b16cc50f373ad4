//! DirectoryStore implementation over configured tables
//!
//! Listing scans the spaces and pricing tables in full and joins them in
//! process, then applies the same filter and viewport predicate as the
//! fixture store. Single-space reads use keyed queries.

use async_trait::async_trait;
use cowork_core::error::{CoworkError, Result};
use cowork_core::models::post::sort_newest_first;
use cowork_core::models::{
    BillingPeriod, BlogPost, NewReport, PricingPackage, Report, Service, Space, SpaceDetail,
    SpaceId,
};
use cowork_core::query::SpaceQuery;
use sqlx::postgres::PgRow;
use sqlx::Row;
use std::collections::HashMap;

use super::PostgresDirectoryStore;
use crate::pagination::paginate;
use crate::ports::{DirectoryStore, SpacePage, StorageBackend};

const SPACE_COLUMNS: &str =
    "id, name, city, address, lat, lng, rating, image_url, description, service_ids";
const PRICING_COLUMNS: &str = "id, space_id, name, price, billing_period, features";
const POST_COLUMNS: &str =
    "slug, title, excerpt, content, author, published_at, tags, cover_image_url";

fn storage(context: &str) -> impl FnOnce(sqlx::Error) -> CoworkError + '_ {
    move |e| CoworkError::Storage(format!("{}: {}", context, e))
}

fn space_from_row(row: &PgRow) -> std::result::Result<Space, sqlx::Error> {
    let service_ids: Vec<String> = row.try_get("service_ids")?;
    Ok(Space {
        id: SpaceId(row.try_get("id")?),
        name: row.try_get("name")?,
        city: row.try_get("city")?,
        address: row.try_get("address")?,
        lat: row.try_get("lat")?,
        lng: row.try_get("lng")?,
        rating: row.try_get("rating")?,
        image_url: row.try_get("image_url")?,
        description: row.try_get("description")?,
        service_ids: service_ids.into_iter().collect(),
        pricing_packages: Vec::new(),
    })
}

fn pricing_from_row(row: &PgRow) -> Result<PricingPackage> {
    let decoded = (|| -> std::result::Result<_, sqlx::Error> {
        Ok((
            row.try_get::<i64, _>("id")?,
            row.try_get::<i64, _>("space_id")?,
            row.try_get::<String, _>("name")?,
            row.try_get::<f64, _>("price")?,
            row.try_get::<String, _>("billing_period")?,
            row.try_get::<Vec<String>, _>("features")?,
        ))
    })();
    let (id, space_id, name, price, period, features) =
        decoded.map_err(storage("Failed to decode pricing row"))?;

    Ok(PricingPackage {
        id,
        space_id: SpaceId(space_id),
        name,
        price,
        billing_period: period.parse::<BillingPeriod>()?,
        features,
    })
}

fn post_from_row(row: &PgRow) -> std::result::Result<BlogPost, sqlx::Error> {
    Ok(BlogPost {
        slug: row.try_get("slug")?,
        title: row.try_get("title")?,
        excerpt: row.try_get("excerpt")?,
        content: row.try_get("content")?,
        author: row.try_get("author")?,
        published_at: row.try_get("published_at")?,
        tags: row.try_get("tags")?,
        cover_image_url: row.try_get("cover_image_url")?,
    })
}

impl PostgresDirectoryStore {
    async fn all_pricing(&self) -> Result<Vec<PricingPackage>> {
        let sql = format!("SELECT {} FROM {} ORDER BY id", PRICING_COLUMNS, self.tables().pricing);
        let rows = sqlx::query(&sql)
            .fetch_all(self.pool())
            .await
            .map_err(storage("Failed to scan pricing"))?;
        rows.iter().map(pricing_from_row).collect()
    }

    async fn space_row(&self, id: SpaceId) -> Result<Option<Space>> {
        let sql = format!("SELECT {} FROM {} WHERE id = $1", SPACE_COLUMNS, self.tables().spaces);
        let row = sqlx::query(&sql)
            .bind(id.0)
            .fetch_optional(self.pool())
            .await
            .map_err(storage("Failed to fetch space"))?;
        row.as_ref()
            .map(space_from_row)
            .transpose()
            .map_err(storage("Failed to decode space row"))
    }
}

/// Attach each space's pricing packages by `space_id`, then keep the spaces
/// matching the query's filters and viewport.
///
/// Packages are ordered by id; spaces without packages get an empty list.
pub(crate) fn join_pricing(
    spaces: Vec<Space>,
    pricing: Vec<PricingPackage>,
    query: &SpaceQuery,
) -> Vec<Space> {
    let mut by_space: HashMap<SpaceId, Vec<PricingPackage>> = HashMap::new();
    for package in pricing {
        by_space.entry(package.space_id).or_default().push(package);
    }

    spaces
        .into_iter()
        .filter_map(|mut space| {
            let mut packages = by_space.remove(&space.id).unwrap_or_default();
            packages.sort_by_key(|p| p.id);
            space.pricing_packages = packages;
            query.matches(&space).then_some(space)
        })
        .collect()
}

#[async_trait]
impl DirectoryStore for PostgresDirectoryStore {
    fn backend(&self) -> StorageBackend {
        StorageBackend::Postgres
    }

    async fn list_spaces(&self, query: &SpaceQuery) -> Result<SpacePage> {
        let sql = format!("SELECT {} FROM {}", SPACE_COLUMNS, self.tables().spaces);
        let rows = sqlx::query(&sql)
            .fetch_all(self.pool())
            .await
            .map_err(storage("Failed to scan spaces"))?;

        let scanned = rows
            .iter()
            .map(space_from_row)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(storage("Failed to decode space row"))?;
        let spaces = join_pricing(scanned, self.all_pricing().await?, query);

        tracing::debug!(scanned = rows.len(), matched = spaces.len(), "Scanned spaces table");
        paginate(spaces, query)
    }

    async fn get_space(&self, id: SpaceId) -> Result<Option<Space>> {
        let Some(mut space) = self.space_row(id).await? else {
            return Ok(None);
        };
        space.pricing_packages = self.pricing_for_space(id).await?;
        Ok(Some(space))
    }

    async fn list_services(&self) -> Result<Vec<Service>> {
        let sql = format!(
            "SELECT id, service_id, display_name FROM {} ORDER BY id",
            self.tables().services
        );
        let rows = sqlx::query_as::<_, (i64, String, String)>(&sql)
            .fetch_all(self.pool())
            .await
            .map_err(storage("Failed to scan services"))?;

        Ok(rows
            .into_iter()
            .map(|(id, service_id, display_name)| Service { id, service_id, display_name })
            .collect())
    }

    async fn services_for_space(&self, id: SpaceId) -> Result<Vec<Service>> {
        let Some(space) = self.space_row(id).await? else {
            return Ok(Vec::new());
        };
        let catalog = self.list_services().await?;
        Ok(SpaceDetail::resolve(space, &catalog).services)
    }

    async fn pricing_for_space(&self, id: SpaceId) -> Result<Vec<PricingPackage>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE space_id = $1 ORDER BY id",
            PRICING_COLUMNS,
            self.tables().pricing
        );
        let rows = sqlx::query(&sql)
            .bind(id.0)
            .fetch_all(self.pool())
            .await
            .map_err(storage("Failed to fetch pricing"))?;
        rows.iter().map(pricing_from_row).collect()
    }

    async fn create_report(&self, report: NewReport) -> Result<Report> {
        let report = Report::from_new(report);
        let sql = format!(
            "INSERT INTO {} (id, space_id, change_type, current_info, corrected_info, \
             additional_details, contact_email, status, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
            self.tables().reports
        );

        sqlx::query(&sql)
            .bind(report.id.0)
            .bind(report.space_id.0)
            .bind(report.change_type.as_str())
            .bind(&report.current_info)
            .bind(&report.corrected_info)
            .bind(&report.additional_details)
            .bind(&report.contact_email)
            .bind(report.status.as_str())
            .bind(report.created_at)
            .execute(self.pool())
            .await
            .map_err(storage("Failed to store report"))?;

        tracing::info!(report_id = %report.id, space_id = %report.space_id, "Stored report");
        Ok(report)
    }

    async fn list_posts(&self) -> Result<Vec<BlogPost>> {
        let sql = format!("SELECT {} FROM {}", POST_COLUMNS, self.tables().posts);
        let rows = sqlx::query(&sql)
            .fetch_all(self.pool())
            .await
            .map_err(storage("Failed to scan posts"))?;

        let mut posts = rows
            .iter()
            .map(post_from_row)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(storage("Failed to decode post row"))?;
        sort_newest_first(&mut posts);
        Ok(posts)
    }

    async fn get_post(&self, slug: &str) -> Result<Option<BlogPost>> {
        let sql = format!("SELECT {} FROM {} WHERE slug = $1", POST_COLUMNS, self.tables().posts);
        let row = sqlx::query(&sql)
            .bind(slug)
            .fetch_optional(self.pool())
            .await
            .map_err(storage("Failed to fetch post"))?;
        row.as_ref()
            .map(post_from_row)
            .transpose()
            .map_err(storage("Failed to decode post row"))
    }
}
