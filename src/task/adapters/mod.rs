//! Adapter implementations of the task ports.

pub mod json_file;
pub mod memory;
pub mod snapshot;

pub use json_file::JsonFileSnapshotStore;
pub use snapshot::SnapshotTaskRepository;
