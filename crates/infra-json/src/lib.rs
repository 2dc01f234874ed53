// Rebound Infrastructure - JSON File Adapter
// Implements: ResultStore

mod file_store;

pub use file_store::JsonFileStore;
