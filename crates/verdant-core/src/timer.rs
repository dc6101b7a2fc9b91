//! Deferred timer queue
//!
//! One-shot and repeating timers keyed on simulation time. The queue never
//! fires on its own: the owner drains it once per tick with the current
//! elapsed time and delivers the returned events itself, which keeps every
//! deferred state change on the frame thread and testable without waiting.

/// Smallest allowed repeat interval, in seconds
const MIN_INTERVAL: f64 = 1e-3;

/// Handle returned when a timer is scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u64);

#[derive(Debug, Clone)]
struct TimerEntry<E> {
    id: TimerId,
    fire_at: f64,
    interval: Option<f64>,
    event: E,
}

/// Pending (fire-at, event) entries
#[derive(Debug, Clone)]
pub struct TimerQueue<E> {
    entries: Vec<TimerEntry<E>>,
    next_id: u64,
}

impl<E> Default for TimerQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> TimerQueue<E> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
        }
    }

    fn next_timer_id(&mut self) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Fire `event` once, `delay` seconds after `now`
    pub fn after(&mut self, now: f64, delay: f64, event: E) -> TimerId {
        let id = self.next_timer_id();
        self.entries.push(TimerEntry {
            id,
            fire_at: now + delay.max(0.0),
            interval: None,
            event,
        });
        id
    }

    /// Fire `event` every `interval` seconds, first at `now + interval`
    pub fn every(&mut self, now: f64, interval: f64, event: E) -> TimerId {
        let interval = interval.max(MIN_INTERVAL);
        let id = self.next_timer_id();
        self.entries.push(TimerEntry {
            id,
            fire_at: now + interval,
            interval: Some(interval),
            event,
        });
        id
    }

    /// Cancel a pending timer. Returns false if it already fired or never existed.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    /// Drop every pending timer
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of pending timers
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<E: Clone> TimerQueue<E> {
    /// Remove and return every event due at or before `now`.
    ///
    /// Events come back ordered by fire time, ties broken by scheduling order.
    /// A repeating timer that fell several intervals behind fires once per
    /// missed interval.
    pub fn drain_due(&mut self, now: f64) -> Vec<E> {
        let mut fired: Vec<(f64, u64, E)> = Vec::new();

        let mut i = 0;
        while i < self.entries.len() {
            if self.entries[i].fire_at > now {
                i += 1;
                continue;
            }

            if let Some(interval) = self.entries[i].interval {
                let entry = &mut self.entries[i];
                while entry.fire_at <= now {
                    fired.push((entry.fire_at, entry.id.0, entry.event.clone()));
                    entry.fire_at += interval;
                }
                i += 1;
            } else {
                let entry = self.entries.swap_remove(i);
                fired.push((entry.fire_at, entry.id.0, entry.event));
            }
        }

        fired.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        fired.into_iter().map(|(_, _, event)| event).collect()
    }
}
