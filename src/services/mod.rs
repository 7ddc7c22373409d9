// Service exports
pub mod catalog;
pub mod profiles;

pub use catalog::{CatalogError, CatalogSnapshot, CatalogStore};
pub use profiles::{ProfileStore, ProfileStoreError, StoredProfile};
