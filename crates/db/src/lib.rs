pub mod models;
pub mod store;

pub use store::{DocPath, DocumentStore, MemoryStore, StoreError};
