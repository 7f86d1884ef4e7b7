use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_TRUST_SCORE;
use crate::domain::UserId;

/// Bounded per-user reputation derived from transaction outcomes.
///
/// The score is recomputed whenever either counter changes; it is never
/// set directly. With zero transactions the score is fixed at 500.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustRecord {
    pub user: UserId,
    pub successful_transactions: u32,
    pub failed_transactions: u32,

    /// Derived value in `[0, 1000]`.
    pub score: u32,
}

impl TrustRecord {
    pub fn new(user: UserId) -> Self {
        Self {
            user,
            successful_transactions: 0,
            failed_transactions: 0,
            score: DEFAULT_TRUST_SCORE,
        }
    }

    /// Record a completed transaction (won auction, paid sale).
    pub fn record_success(&mut self) {
        self.successful_transactions += 1;
        self.recompute();
    }

    /// Record a failed outcome (bid retraction).
    pub fn record_failure(&mut self) {
        self.failed_transactions += 1;
        self.recompute();
    }

    /// `clamp(0, 1000, 500 + success_rate * 300 - failed * 10)`.
    fn recompute(&mut self) {
        let total = self.successful_transactions + self.failed_transactions;
        if total == 0 {
            self.score = DEFAULT_TRUST_SCORE;
            return;
        }

        let success_rate = f64::from(self.successful_transactions) / f64::from(total);
        let score = 500.0 + success_rate * 300.0 - f64::from(self.failed_transactions) * 10.0;
        self.score = score.clamp(0.0, 1000.0).round() as u32;
    }
}
