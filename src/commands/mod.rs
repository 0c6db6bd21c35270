//! Pricing operations built on the catalog client.

pub mod compare;
pub mod discover;
pub mod discount_info;
pub mod estimate;
pub mod recommend;
pub mod resolve;
pub mod search;

pub use compare::CompareCommand;
pub use discover::DiscoverCommand;
pub use discount_info::customer_discount;
pub use estimate::EstimateCommand;
pub use recommend::RecommendCommand;
pub use resolve::ResolveCommand;
pub use search::{SearchCommand, SearchRequest};
