//! Client-side state for the product catalog: the catalog fetch state
//! machine, the favorites set, the admin product list and the projections
//! shared between them.

pub mod admin;
pub mod catalog;
pub mod error;
pub mod favorites;
pub mod transport;
pub mod views;

pub use admin::{ManagementState, ProductDraft, ProductManager};
pub use catalog::{CatalogLoader, CatalogState, FETCH_FAILED_MESSAGE};
pub use error::{FetchError, ValidationError};
pub use favorites::FavoritesSet;
pub use transport::{
    FixtureProductSource, HttpProductSource, HttpSourceConfig, MissingProductSource,
    ProductSource,
};
pub use views::{filter_products, find_by_id, group_by_category, CategoryGroup};
