pub mod feed_item;
pub mod fetched;
pub mod page;
pub mod source;
pub mod timestamp;

pub use feed_item::FeedItem;
pub use fetched::{
    no_response_message, not_available_message, DocumentResult, FetchResult, Fetched,
};
pub use page::{PageContext, PageKind, SlotValue};
pub use source::{SourceType, TwitterApi};
pub use timestamp::{normalize, normalize_with_pattern, TimestampError, TimestampFormat};
