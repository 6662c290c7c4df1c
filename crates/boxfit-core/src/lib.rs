//! Shipping box selection over a static catalog of products and boxes.

mod cache;
mod catalog;
mod enumerator;
mod fit;
mod types;

pub use cache::GroupCache;
pub use catalog::Catalog;
pub use enumerator::{build_group, group_key, GroupEnumerator, DEFAULT_MAX_ITEMS};
pub use fit::{estimate_stack, fits, group_fits, total_weight};
pub use types::*;
