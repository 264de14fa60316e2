use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use stockhold_core::HoldId;

/// A pending reservation against one inventory record.
///
/// While a hold exists its `amount` has already been subtracted from the
/// record's available count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hold {
    pub hold_id: HoldId,
    pub amount: u64,
    pub created_at: DateTime<Utc>,
}

impl Hold {
    pub fn new(hold_id: HoldId, amount: u64, created_at: DateTime<Utc>) -> Self {
        Self {
            hold_id,
            amount,
            created_at,
        }
    }

    /// A hold is expired once its age is strictly greater than `ttl`.
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now.signed_duration_since(self.created_at) > ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockhold_core::{IdGenerator, SequentialIdGenerator};

    #[test]
    fn expiry_is_strictly_greater_than_ttl() {
        let ids = SequentialIdGenerator::new();
        let t0 = Utc::now();
        let hold = Hold::new(ids.hold_id(), 5, t0);
        let ttl = Duration::minutes(15);

        assert!(!hold.is_expired(t0, ttl));
        assert!(!hold.is_expired(t0 + ttl, ttl));
        assert!(hold.is_expired(t0 + ttl + Duration::nanoseconds(1), ttl));
    }
}
