use clap::{Args, Parser, Subcommand};
use cowork_core::models::{ChangeType, MapBounds, MinRating, SpaceId};
use std::path::PathBuf;

/// Cowork - Browse the coworking directory from the terminal
#[derive(Parser, Debug)]
#[command(name = "cowork")]
#[command(about = "Browse the coworking directory from the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// TOML configuration file (overrides COWORK_CONFIG)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory API base URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// API key sent with every request
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Extra attempts for failed requests (never for 4xx responses)
    #[arg(long, global = true)]
    pub retries: Option<u32>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List spaces matching filters and an optional map box
    Spaces(SpacesArgs),

    /// Show one space with its services and pricing
    Space(SpaceArgs),

    /// List the service catalog, or the services of one space
    Services(ServicesArgs),

    /// List blog posts, or show one post
    Posts(PostsArgs),

    /// Report outdated information about a space
    Report(ReportArgs),

    /// Show the effective client configuration and where each value came from
    Config,
}

#[derive(Args, Debug, Default)]
pub struct SpacesArgs {
    /// Text matched against name, city and address
    #[arg(long)]
    pub location: Option<String>,

    /// Lowest acceptable package price
    #[arg(long)]
    pub price_min: Option<f64>,

    /// Highest acceptable package price
    #[arg(long)]
    pub price_max: Option<f64>,

    /// Minimum rating (3, 4 or 5)
    #[arg(long)]
    pub rating: Option<MinRating>,

    /// Service tag; repeat for several (any match)
    #[arg(long = "service")]
    pub services: Vec<String>,

    /// Visible map box as north,south,east,west
    #[arg(long, allow_hyphen_values = true)]
    pub bounds: Option<MapBounds>,

    /// Page size (1-100)
    #[arg(long)]
    pub limit: Option<usize>,

    /// Continuation token printed by the previous page
    #[arg(long, requires = "limit")]
    pub last_key: Option<String>,
}

#[derive(Args, Debug)]
pub struct SpaceArgs {
    pub id: SpaceId,
}

#[derive(Args, Debug)]
pub struct ServicesArgs {
    /// Only the services offered by this space
    #[arg(long)]
    pub space: Option<SpaceId>,
}

#[derive(Args, Debug)]
pub struct PostsArgs {
    /// Show the post with this slug
    pub slug: Option<String>,
}

#[derive(Args, Debug)]
pub struct ReportArgs {
    #[arg(long)]
    pub space_id: SpaceId,

    /// closed, moved, hours, pricing, services, contact or other
    #[arg(long)]
    pub change_type: ChangeType,

    #[arg(long)]
    pub current_info: Option<String>,

    #[arg(long)]
    pub corrected_info: Option<String>,

    #[arg(long)]
    pub details: Option<String>,

    /// Where reviewers can reach you
    #[arg(long)]
    pub email: Option<String>,
}
