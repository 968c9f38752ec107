//! Clock adapters

use crate::ports::outbound::Clock;
use shared_types::BlockHeight;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Clock driven by hand. Used in tests to step across expiry.
#[derive(Debug, Default)]
pub struct ManualClock {
    height: AtomicU64,
}

impl ManualClock {
    /// Clock starting at `height`.
    pub fn new(height: BlockHeight) -> Self {
        Self {
            height: AtomicU64::new(height),
        }
    }

    /// Jump to `height`.
    pub fn set(&self, height: BlockHeight) {
        self.height.store(height, Ordering::SeqCst);
    }

    /// Move forward by `blocks`.
    pub fn advance(&self, blocks: BlockHeight) {
        self.height.fetch_add(blocks, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn current_height(&self) -> BlockHeight {
        self.height.load(Ordering::SeqCst)
    }
}

/// Wall clock divided into fixed-length blocks.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    block_interval_secs: u64,
}

impl SystemClock {
    /// Default block interval in seconds.
    pub const DEFAULT_BLOCK_INTERVAL_SECS: u64 = 15;

    /// Clock with the given block interval. Zero is treated as one second.
    pub fn new(block_interval_secs: u64) -> Self {
        Self {
            block_interval_secs: block_interval_secs.max(1),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BLOCK_INTERVAL_SECS)
    }
}

impl Clock for SystemClock {
    fn current_height(&self) -> BlockHeight {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        secs / self.block_interval_secs
    }
}
