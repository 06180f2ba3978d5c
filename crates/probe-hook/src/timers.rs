//! Timer APIs
//!
//! Backs setTimeout and setInterval. Time comes from a [`Clock`] so tests
//! can drive timers deterministically.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use crate::value::JsValue;

/// Source of the current time in milliseconds
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> f64;
}

/// Wall clock, measured from construction
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<Mutex<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, ms: f64) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) += ms;
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Timer entry
#[derive(Debug, Clone)]
pub struct Timer {
    pub id: u32,
    /// Function, or code string (kept but never evaluated)
    pub callback: JsValue,
    pub args: Vec<JsValue>,
    pub delay_ms: f64,
    pub repeat: bool,
    pub due_at: f64,
}

/// Timer manager
pub struct TimerManager {
    timers: BTreeMap<u32, Timer>,
    next_id: u32,
    clock: Arc<dyn Clock>,
}

impl TimerManager {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            timers: BTreeMap::new(),
            next_id: 1,
            clock,
        }
    }

    fn schedule(
        &mut self,
        callback: JsValue,
        delay_ms: f64,
        args: Vec<JsValue>,
        repeat: bool,
    ) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        let delay_ms = normalize_delay(delay_ms);
        self.timers.insert(
            id,
            Timer {
                id,
                callback,
                args,
                delay_ms,
                repeat,
                due_at: self.clock.now_ms() + delay_ms,
            },
        );
        id
    }

    /// Add a timeout
    pub fn set_timeout(&mut self, callback: JsValue, delay_ms: f64, args: Vec<JsValue>) -> u32 {
        self.schedule(callback, delay_ms, args, false)
    }

    /// Add an interval
    pub fn set_interval(&mut self, callback: JsValue, delay_ms: f64, args: Vec<JsValue>) -> u32 {
        self.schedule(callback, delay_ms, args, true)
    }

    /// Clear a timer
    pub fn clear(&mut self, id: u32) {
        self.timers.remove(&id);
    }

    pub fn get(&self, id: u32) -> Option<&Timer> {
        self.timers.get(&id)
    }

    /// Take the timers that are due, earliest first (registration order
    /// breaks ties). Timeouts are removed; intervals are rescheduled and
    /// fire at most once per call.
    pub fn get_ready_timers(&mut self) -> Vec<Timer> {
        let now = self.clock.now_ms();
        let mut ready: Vec<Timer> = self
            .timers
            .values()
            .filter(|t| t.due_at <= now)
            .cloned()
            .collect();
        ready.sort_by(|a, b| a.due_at.total_cmp(&b.due_at).then(a.id.cmp(&b.id)));

        for timer in &ready {
            if timer.repeat {
                if let Some(t) = self.timers.get_mut(&timer.id) {
                    t.due_at = now + t.delay_ms;
                }
            } else {
                self.timers.remove(&timer.id);
            }
        }
        ready
    }

    /// Check if there are pending timers
    pub fn has_pending(&self) -> bool {
        !self.timers.is_empty()
    }

    /// Milliseconds until the next timer fires
    pub fn time_until_next(&self) -> Option<f64> {
        let now = self.clock.now_ms();
        self.timers
            .values()
            .map(|t| (t.due_at - now).max(0.0))
            .min_by(f64::total_cmp)
    }
}

/// Negative and non-finite delays run as soon as possible
fn normalize_delay(delay_ms: f64) -> f64 {
    if delay_ms.is_finite() && delay_ms > 0.0 {
        delay_ms
    } else {
        0.0
    }
}
