pub mod traits;
pub mod document;
pub mod facebook;
pub mod twitter_v1;
pub mod twitter_v2;
pub mod wikipedia;
pub mod registry;

pub use traits::{bounded_count, FeedSource};
pub use document::DocumentFetcher;
pub use facebook::{FacebookEdge, FacebookPageInfo, FacebookSource};
pub use twitter_v1::TwitterV1Source;
pub use twitter_v2::TwitterV2Source;
pub use wikipedia::WikipediaSource;
pub use registry::SourceRegistry;
