//! In-memory collaborators for tests.

pub mod notify;
pub mod store;
pub mod time;

pub use notify::RecordingNotifier;
pub use store::MemoryStore;
pub use time::MockTime;
