use std::collections::BTreeSet;

use crate::model::vo::ChunkRetryPolicy;

/// Progress of one in-flight logical upload, as held by the upload ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadProgress {
    /// Total chunk count declared by the first arrival.
    pub total: u64,
    /// Received chunk count.
    pub received: u64,
    /// Distinct indices received so far.
    pub received_indices: BTreeSet<u64>,
    /// Set while the reassembly claimed by one arrival is running.
    pub completing: bool,
}

/// Outcome of recording a chunk arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arrival {
    /// Received count after the arrival.
    pub received: u64,
    /// True for the single arrival that must run the reassembly.
    pub claimed: bool,
}

impl UploadProgress {
    pub fn new(total: u64) -> Self {
        Self {
            total,
            received: 0,
            received_indices: BTreeSet::new(),
            completing: false,
        }
    }

    /// Counts `nth` according to `policy`, then claims completion if the upload
    /// just became complete and nobody else holds the claim.
    pub fn arrive(&mut self, nth: u64, policy: ChunkRetryPolicy) -> Arrival {
        let is_new = self.received_indices.insert(nth);
        if is_new || policy == ChunkRetryPolicy::Append {
            self.received += 1;
        }
        let claimed = !self.completing && self.is_complete();
        if claimed {
            self.completing = true;
        }
        Arrival {
            received: self.received,
            claimed,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.received >= self.total
    }
}
