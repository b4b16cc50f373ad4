mod health;
mod posts;
mod reports;
mod services;
mod spaces;

pub use health::health_check;
pub use posts::{get_post, list_posts};
pub use reports::create_report;
pub use services::list_services;
pub use spaces::{get_space, list_spaces, pricing_for_space, services_for_space};
