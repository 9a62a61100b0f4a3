//! Debouncing of polled node status.

use std::num::NonZeroU32;

use clawnode_common::{ConnectionState, NodeStatus};

const DEFAULT_THRESHOLD: NonZeroU32 = NonZeroU32::MIN.saturating_add(1);

/// Holds back a change in [`ConnectionState`] until it has been observed
/// `threshold` times in a row.
///
/// Samples whose state matches the stable state are adopted immediately, so
/// detail fields (errors, node id) stay fresh while the state is unchanged.
#[derive(Debug, Clone)]
pub struct StatusStabilizer {
    threshold: NonZeroU32,
    stable: Option<NodeStatus>,
    pending: Option<(ConnectionState, u32)>,
}

impl Default for StatusStabilizer {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl StatusStabilizer {
    #[must_use]
    pub fn new(threshold: NonZeroU32) -> Self {
        Self {
            threshold,
            stable: None,
            pending: None,
        }
    }

    /// Feed one sample and get back the status observers should see.
    pub fn stabilize(&mut self, candidate: NodeStatus) -> &NodeStatus {
        let candidate_state = candidate.connection_state();
        let promote = match &self.stable {
            None => true,
            Some(stable) if stable.connection_state() == candidate_state => true,
            Some(_) => {
                let count = match self.pending {
                    Some((state, count)) if state == candidate_state => count + 1,
                    _ => 1,
                };
                self.pending = Some((candidate_state, count));
                count >= self.threshold.get()
            }
        };

        if promote {
            self.pending = None;
            self.stable = Some(candidate);
        }
        self.stable.get_or_insert_default()
    }

    /// The current stable status, if any sample has been seen.
    #[must_use]
    pub fn current(&self) -> Option<&NodeStatus> {
        self.stable.as_ref()
    }

    /// Forget everything, so the next sample is adopted as-is.
    pub fn reset(&mut self) {
        self.stable = None;
        self.pending = None;
    }
}
