/// Abstraction over wall-clock time.
///
/// All deadline checks and timestamps in the engines go through this
/// trait so tests can drive the clock deterministically.
pub trait TimeProvider: Send + Sync + Clone + 'static {
    /// Current Unix timestamp in seconds.
    fn now_unix(&self) -> u64;
}

/// Production time provider backed by the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeProvider;

impl SystemTimeProvider {
    pub const fn new() -> Self {
        Self
    }
}

impl TimeProvider for SystemTimeProvider {
    fn now_unix(&self) -> u64 {
        crate::config::now_unix()
    }
}
