pub mod derive;
pub mod indicator;
pub mod navigation;
pub mod view_model;

pub use crate::domain::model::{
    CatalogSnapshot, Category, CategoryFilter, CategorySet, FilterState, ListingView, Service,
    SortOption,
};
pub use crate::domain::ports::{CatalogLoader, CatalogSource};
pub use crate::utils::error::Result;
