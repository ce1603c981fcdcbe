pub mod source;

pub use source::{Listing, Source, walk_listing};
pub use crate::network::client::SiteClient;
