pub mod descriptor;
pub mod error;
pub mod fetcher;

pub use descriptor::{ContentItem, SiteDescriptor, SiteMetadata};
pub use error::FetchError;
pub use fetcher::{SiteFetcher, SiteSource};
