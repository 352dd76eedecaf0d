pub mod memory_store;
pub mod record_store;

pub use memory_store::MemoryStore;
pub use record_store::RecordStore;
