pub mod memory;
pub mod types;

pub use memory::MemoryStore;
pub use types::{DocumentStore, Filter, StoreError, Update};
