pub mod bounds;
pub mod filter;
pub mod post;
pub mod report;
pub mod space;

pub use bounds::MapBounds;
pub use filter::{FilterCriteria, FilterField, MinRating};
pub use post::BlogPost;
pub use report::{ChangeType, NewReport, Report, ReportId, ReportStatus};
pub use space::{BillingPeriod, PricingPackage, Service, Space, SpaceDetail, SpaceId};
