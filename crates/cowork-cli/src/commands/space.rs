use crate::cli::SpaceArgs;
use crate::output::OutputWriter;
use crate::output_types::{PricingRow, ServiceRow};
use anyhow::Result;
use cowork_client::DirectoryApi;

pub async fn execute(args: SpaceArgs, api: &dyn DirectoryApi, output: &OutputWriter) -> Result<()> {
    let detail = api.get_space(args.id).await?;

    if output.is_json() {
        return output.result(detail);
    }

    let space = &detail.space;
    output.section(&space.name);
    output.kv("ID", space.id);
    output.kv("City", &space.city);
    output.kv("Address", &space.address);
    output.kv("Rating", format!("{:.1}", space.rating));
    output.kv("Location", format!("{:.4}, {:.4}", space.lat, space.lng));
    if let Some(description) = &space.description {
        output.kv("About", description);
    }

    output.section("Services");
    output.table(detail.services.iter().map(ServiceRow::from).collect());

    output.section("Pricing");
    output.table(space.pricing_packages.iter().map(PricingRow::from).collect());

    Ok(())
}
