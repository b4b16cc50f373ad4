use crate::cli::SpacesArgs;
use crate::output::OutputWriter;
use crate::output_types::{SpaceRow, SpacesOutput};
use anyhow::Result;
use cowork_client::{DirectoryApi, SpaceListing};
use cowork_core::models::FilterCriteria;
use cowork_core::query::{ContinuationToken, SpaceQuery};

pub async fn execute(args: SpacesArgs, api: &dyn DirectoryApi, output: &OutputWriter) -> Result<()> {
    let query = build_query(args)?;
    let listing = api.list_spaces(&query).await?;
    render(listing, output)
}

fn build_query(args: SpacesArgs) -> Result<SpaceQuery> {
    let mut filters = FilterCriteria::new().with_price_range(args.price_min, args.price_max);
    if let Some(location) = args.location {
        filters = filters.with_location(location);
    }
    if let Some(rating) = args.rating {
        filters = filters.with_min_rating(rating);
    }
    for tag in args.services {
        filters = filters.with_service(tag);
    }

    let query = SpaceQuery::new(filters, args.bounds);
    Ok(match args.limit {
        Some(limit) => {
            let last_key = args.last_key.as_deref().map(ContinuationToken::decode).transpose()?;
            query.with_page(limit, last_key)
        }
        None => query,
    })
}

fn render(listing: SpaceListing, output: &OutputWriter) -> Result<()> {
    let last_key = listing.last_key.as_ref().map(ContinuationToken::encode);

    if output.is_json() {
        return output.result(SpacesOutput { spaces: listing.spaces, total: listing.total, last_key });
    }

    let shown = listing.spaces.len();
    output.table(listing.spaces.iter().map(SpaceRow::from).collect());

    if let Some(total) = listing.total {
        output.info(format!("{} of {} spaces", shown, total));
    }
    if let Some(key) = last_key {
        output.info(format!("More results: --last-key '{}'", key));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cowork_core::models::{MapBounds, MinRating};

    #[test]
    fn test_build_query_from_flags() {
        let args = SpacesArgs {
            location: Some("berlin".to_string()),
            price_max: Some(300.0),
            rating: Some(MinRating::Four),
            services: vec!["wifi".to_string()],
            bounds: Some(MapBounds::new(52.7, 52.3, 13.8, 13.0).unwrap()),
            limit: Some(2),
            last_key: Some(r#"{"id":1}"#.to_string()),
            ..SpacesArgs::default()
        };

        let query = build_query(args).unwrap();

        assert_eq!(query.filters.location.as_deref(), Some("berlin"));
        assert_eq!(query.filters.price_min, None);
        assert_eq!(query.filters.price_max, Some(300.0));
        assert_eq!(query.filters.services, vec!["wifi"]);
        assert!(query.bounds.is_some());
        assert_eq!(query.limit, Some(2));
        assert_eq!(query.last_key.unwrap().encode(), r#"{"id":1}"#);
    }

    #[test]
    fn test_build_query_rejects_malformed_last_key() {
        let args = SpacesArgs {
            limit: Some(2),
            last_key: Some("{oops".to_string()),
            ..SpacesArgs::default()
        };
        assert!(build_query(args).is_err());
    }

    #[test]
    fn test_build_query_without_flags_is_unfiltered() {
        let query = build_query(SpacesArgs::default()).unwrap();
        assert!(query.filters.is_default());
        assert!(query.bounds.is_none());
        assert!(!query.is_paginated());
    }
}
