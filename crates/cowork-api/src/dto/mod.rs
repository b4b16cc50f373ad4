mod response;

pub use response::{HealthResponse, PostsResponse, SpaceListResponse};
