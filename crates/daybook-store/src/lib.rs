pub mod dynamo;
pub mod error;
pub mod feed;
pub mod memory;
pub mod store;

pub use dynamo::DynamoRecordStore;
pub use error::StoreError;
pub use feed::{ChangeFeed, Collection, Subscription};
pub use memory::MemoryRecordStore;
pub use store::{RecordStore, SchedulePatch, TaskPatch};
