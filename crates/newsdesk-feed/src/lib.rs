pub mod aggregate;
pub mod byline;
pub mod clean;
pub mod error;
pub mod normalize;
pub mod pubdate;
pub mod schema;

pub use aggregate::{aggregate, dedup_key};
pub use byline::BylineParser;
pub use error::FeedError;
pub use normalize::{normalize_feed, FeedParse};
pub use schema::{CmsItem, RawItem, SyndicationItem};
