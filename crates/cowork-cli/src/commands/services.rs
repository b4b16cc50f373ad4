use crate::cli::ServicesArgs;
use crate::output::OutputWriter;
use crate::output_types::ServiceRow;
use anyhow::Result;
use cowork_client::DirectoryApi;

pub async fn execute(args: ServicesArgs, api: &dyn DirectoryApi, output: &OutputWriter) -> Result<()> {
    let services = match args.space {
        Some(id) => api.services_for_space(id).await?,
        None => api.list_services().await?,
    };

    if output.is_json() {
        return output.result(services);
    }

    output.table(services.iter().map(ServiceRow::from).collect());
    Ok(())
}
