//! Deferred callbacks against the session clock
//!
//! Timers never interrupt a tick. The clock only moves when the tick advances
//! it, and due timers are handed back to the tick to apply before any entity
//! moves. Every timer gets a [`TimerHandle`] that can cancel it.

use serde::{Deserialize, Serialize};

/// Cancellation handle returned at schedule time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerHandle(u32);

/// What to do when a timer fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Build a level after the end-of-level banner
    LoadLevel {
        level: usize,
        /// Same-level reload after a lost life
        reset: bool,
        /// Lives ran out; restart the session first
        game_over: bool,
    },
    /// A hit block's flash is over
    BlockFlashEnd { block: usize, epoch: u32 },
    /// Pistol paddle volley
    PistolFire { generation: u32 },
    /// Pistol paddle reverts to a plain paddle
    PistolExpire { generation: u32 },
}

#[derive(Debug, Clone)]
struct Timer {
    handle: TimerHandle,
    due_ms: f64,
    period_ms: Option<f64>,
    event: TimerEvent,
}

/// Session clock plus pending timers
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now_ms: f64,
    next_id: u32,
    timers: Vec<Timer>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Milliseconds since the session started
    #[cfg(test)]
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn advance(&mut self, elapsed_ms: f64) {
        self.now_ms += elapsed_ms.max(0.0);
    }

    /// Fire `event` once after `delay_ms`
    pub fn schedule(&mut self, delay_ms: f64, event: TimerEvent) -> TimerHandle {
        self.insert(delay_ms, None, event)
    }

    /// Fire `event` every `interval_ms` until cancelled
    pub fn schedule_repeating(&mut self, interval_ms: f64, event: TimerEvent) -> TimerHandle {
        self.insert(interval_ms, Some(interval_ms.max(1.0)), event)
    }

    fn insert(&mut self, delay_ms: f64, period_ms: Option<f64>, event: TimerEvent) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            handle,
            due_ms: self.now_ms + delay_ms.max(0.0),
            period_ms,
            event,
        });
        handle
    }

    /// Returns false if the timer already fired or was cancelled
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.handle != handle);
        self.timers.len() != before
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.timers.iter().any(|t| t.handle == handle)
    }

    pub fn pending_count(&self) -> usize {
        self.timers.len()
    }

    /// Take every timer due by now, earliest first.
    ///
    /// A repeating timer fires at most once per poll and is rescheduled one
    /// period after its due time.
    pub fn poll(&mut self) -> Vec<TimerEvent> {
        let now = self.now_ms;
        let mut due: Vec<(f64, TimerHandle, TimerEvent)> = self
            .timers
            .iter()
            .filter(|t| t.due_ms <= now)
            .map(|t| (t.due_ms, t.handle, t.event))
            .collect();
        if due.is_empty() {
            return Vec::new();
        }
        due.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.0.cmp(&b.1.0)));

        self.timers.retain_mut(|t| {
            if t.due_ms > now {
                return true;
            }
            match t.period_ms {
                Some(period) => {
                    t.due_ms += period;
                    if t.due_ms <= now {
                        // Skip volleys missed during a long frame
                        t.due_ms = now + period;
                    }
                    true
                }
                None => false,
            }
        });

        due.into_iter().map(|(_, _, event)| event).collect()
    }

    /// Drop every pending timer
    pub fn clear(&mut self) {
        self.timers.clear();
    }
}
