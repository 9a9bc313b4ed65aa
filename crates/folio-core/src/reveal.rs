#![forbid(unsafe_code)]

//! One-shot, staggered fade-in of content blocks.
//!
//! The host observes the reveal targets (queried once at bind time) and
//! forwards each intersection notification batch. Within a batch, the entry at
//! index `i` that is intersecting starts its reveal after `i × stagger`; the
//! index counts every entry of the batch, intersecting or not.
//!
//! Each target carries an explicit `revealed` flag, so a block animates at
//! most once per page load even if the host keeps delivering notifications
//! for it.

use core::time::Duration;

/// Index of a block in the reveal target list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RevealTarget(pub usize);

/// One intersection-change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealEntry {
    pub target: RevealTarget,
    pub is_intersecting: bool,
}

impl RevealEntry {
    #[must_use]
    pub const fn new(target: usize, is_intersecting: bool) -> Self {
        Self {
            target: RevealTarget(target),
            is_intersecting,
        }
    }
}

/// Per-target reveal bookkeeping.
#[derive(Debug, Clone)]
pub struct RevealAnimator {
    revealed: Vec<bool>,
    stagger: Duration,
}

impl RevealAnimator {
    #[must_use]
    pub fn new(targets: usize, stagger: Duration) -> Self {
        Self {
            revealed: vec![false; targets],
            stagger,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.revealed.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.revealed.is_empty()
    }

    #[must_use]
    pub fn is_revealed(&self, target: RevealTarget) -> bool {
        self.revealed.get(target.0).copied().unwrap_or(false)
    }

    /// Claim the intersecting, not-yet-revealed entries of one batch.
    ///
    /// Returns each claimed target with its start delay. Claimed targets are
    /// marked revealed immediately; unknown indices are ignored.
    pub fn claim_batch(&mut self, entries: &[RevealEntry]) -> Vec<(RevealTarget, Duration)> {
        let mut claimed = Vec::new();
        for (index, entry) in entries.iter().enumerate() {
            if !entry.is_intersecting {
                continue;
            }
            let Some(flag) = self.revealed.get_mut(entry.target.0) else {
                tracing::debug!(index = entry.target.0, "intersection for unknown reveal target");
                continue;
            };
            if *flag {
                continue;
            }
            *flag = true;
            let delay = self.stagger.saturating_mul(index.min(u32::MAX as usize) as u32);
            claimed.push((entry.target, delay));
        }
        claimed
    }
}
