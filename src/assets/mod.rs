//! Async asset loading and per-slot load coordination

pub mod loader;
pub mod coordinator;

pub use loader::{AssetData, AssetLoader, FetchFn, FetchFuture, LoadEvent, ProgressReporter};
pub use coordinator::{LoadCoordinator, SlotState};
