// ABOUTME: Data layer for Milemap: wire records, mappers, and remote seams
// ABOUTME: Defines the RemoteStore/ChangeFeed traits plus an in-memory backend

pub mod error;
pub mod mappers;
pub mod memory;
pub mod remote;
pub mod wire;

pub use error::{Collection, StorageError, StorageResult};
pub use memory::MemoryRemote;
pub use remote::{ChangeAction, ChangeEvent, ChangeFeed, RemoteStore};
pub use wire::{AnalysisLogRecord, DepartmentRecord, ItemRecord, JsonMap, OwnerRecord};
