// ============================
// crates/backend-lib/src/stats.rs
// ============================
//! In-memory call statistics.
use std::collections::VecDeque;

use chrono::Utc;
use klubok_common::{CallRecord, CallStats, CallType};
use metrics::counter;
use parking_lot::Mutex;
use uuid::Uuid;

use crate::metrics as keys;

/// Calls returned by `snapshot`
pub const RECENT_CALLS: usize = 10;

/// Records kept before the oldest are dropped
pub const DEFAULT_HISTORY: usize = 1000;

/// Longest call accepted, in minutes (one week)
pub const MAX_CALL_DURATION: u64 = 7 * 24 * 60;

/// Counters plus the latest calls, newest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub stats: CallStats,
    pub recent_calls: Vec<CallRecord>,
}

#[derive(Debug, Default)]
struct Counters {
    total_calls: u64,
    video_calls: u64,
    audio_calls: u64,
    total_duration: u64,
    history: VecDeque<CallRecord>,
}

/// Registry of finished calls
#[derive(Debug)]
pub struct CallStatsRegistry {
    inner: Mutex<Counters>,
    history_limit: usize,
}

impl Default for CallStatsRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY)
    }
}

impl CallStatsRegistry {
    pub fn new(history_limit: usize) -> Self {
        Self {
            inner: Mutex::new(Counters::default()),
            history_limit: history_limit.max(RECENT_CALLS),
        }
    }

    /// Record a finished call and return the stored record
    pub fn record(&self, call_type: CallType, participants: Vec<String>, duration: u64) -> CallRecord {
        let call = CallRecord {
            id: Uuid::new_v4().simple().to_string(),
            call_type,
            participants,
            duration,
            timestamp: Utc::now(),
        };

        let mut inner = self.inner.lock();
        inner.total_calls = inner.total_calls.saturating_add(1);
        match call_type {
            CallType::Video => inner.video_calls = inner.video_calls.saturating_add(1),
            CallType::Audio => inner.audio_calls = inner.audio_calls.saturating_add(1),
        }
        inner.total_duration = inner.total_duration.saturating_add(duration);
        inner.history.push_back(call.clone());
        while inner.history.len() > self.history_limit {
            inner.history.pop_front();
        }
        drop(inner);

        counter!(keys::CALL_RECORDED).increment(1);
        call
    }

    /// Current counters and the most recent calls
    pub fn snapshot(&self) -> StatsSnapshot {
        let inner = self.inner.lock();
        // Rounds half up
        let average_duration = match inner.total_calls {
            0 => 0,
            calls => {
                let (total, calls) = (u128::from(inner.total_duration), u128::from(calls));
                ((total + calls / 2) / calls) as u64
            },
        };

        StatsSnapshot {
            stats: CallStats {
                total_calls: inner.total_calls,
                video_calls: inner.video_calls,
                audio_calls: inner.audio_calls,
                total_duration: inner.total_duration,
                average_duration,
            },
            recent_calls: inner.history.iter().rev().take(RECENT_CALLS).cloned().collect(),
        }
    }
}
