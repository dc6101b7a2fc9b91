//! Subsystem scheduler
//!
//! Runs every registered subsystem in registration order. Each call is
//! isolated: an `Err` or a panic from one subsystem is logged and recorded,
//! and the remaining subsystems still run.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, error, info};

use crate::events::WorldEvent;
use crate::subsystem::{Subsystem, SubsystemError, TickContext};

/// Where a subsystem is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    Ready,
}

/// Which call failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Initialize,
    Update,
    Event,
}

/// One failed call
#[derive(Debug)]
pub struct SubsystemFailure {
    pub name: String,
    pub phase: Phase,
    pub error: SubsystemError,
}

/// Outcome of one scheduler pass
#[derive(Debug, Default)]
pub struct SchedulerReport {
    /// Subsystems that became ready during this pass
    pub initialized: usize,
    /// Subsystems whose call succeeded
    pub succeeded: usize,
    pub failures: Vec<SubsystemFailure>,
}

impl SchedulerReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn merge(&mut self, other: SchedulerReport) {
        self.initialized += other.initialized;
        self.succeeded += other.succeeded;
        self.failures.extend(other.failures);
    }
}

struct Entry {
    subsystem: Box<dyn Subsystem>,
    lifecycle: Lifecycle,
    init_attempted: bool,
    failures: u64,
}

/// An ordered list of subsystems
#[derive(Default)]
pub struct SubsystemScheduler {
    entries: Vec<Entry>,
}

impl SubsystemScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a subsystem to the end of the schedule
    pub fn add<S: Subsystem + 'static>(&mut self, subsystem: S) {
        self.add_boxed(Box::new(subsystem));
    }

    pub fn add_boxed(&mut self, subsystem: Box<dyn Subsystem>) {
        debug!(subsystem = subsystem.name(), "Subsystem registered");
        self.entries.push(Entry {
            subsystem,
            lifecycle: Lifecycle::Uninitialized,
            init_attempted: false,
            failures: 0,
        });
    }

    /// Initialize every subsystem not yet attempted. Failed ones are never retried.
    pub fn initialize_all(&mut self, ctx: &mut TickContext) -> SchedulerReport {
        let mut report = SchedulerReport::default();

        for entry in self.entries.iter_mut().filter(|e| !e.init_attempted) {
            entry.init_attempted = true;
            let subsystem = &mut entry.subsystem;
            match isolate(|| subsystem.initialize(ctx)) {
                Ok(()) => {
                    entry.lifecycle = Lifecycle::Ready;
                    report.initialized += 1;
                    report.succeeded += 1;
                    info!(subsystem = entry.subsystem.name(), "Subsystem initialized");
                }
                Err(e) => record_failure(entry, Phase::Initialize, e, &mut report),
            }
        }

        report
    }

    /// Update every ready subsystem, initializing late additions first
    pub fn update_all(&mut self, ctx: &mut TickContext) -> SchedulerReport {
        let mut report = self.initialize_all(ctx);
        report.succeeded = 0;

        let mut updates = SchedulerReport::default();
        for entry in self.ready_entries() {
            let subsystem = &mut entry.subsystem;
            match isolate(|| subsystem.update(ctx)) {
                Ok(()) => updates.succeeded += 1,
                Err(e) => record_failure(entry, Phase::Update, e, &mut updates),
            }
        }

        report.merge(updates);
        report
    }

    /// Deliver a timer event to every ready subsystem
    pub fn dispatch(&mut self, event: &WorldEvent, ctx: &mut TickContext) -> SchedulerReport {
        let mut report = SchedulerReport::default();

        for entry in self.ready_entries() {
            let subsystem = &mut entry.subsystem;
            match isolate(|| subsystem.handle_event(event, ctx)) {
                Ok(()) => report.succeeded += 1,
                Err(e) => record_failure(entry, Phase::Event, e, &mut report),
            }
        }

        report
    }

    fn ready_entries(&mut self) -> impl Iterator<Item = &mut Entry> {
        self.entries
            .iter_mut()
            .filter(|e| e.lifecycle == Lifecycle::Ready)
    }

    pub fn lifecycle(&self, name: &str) -> Option<Lifecycle> {
        self.find(name).map(|e| e.lifecycle)
    }

    /// Total failed calls for a subsystem
    pub fn failure_count(&self, name: &str) -> Option<u64> {
        self.find(name).map(|e| e.failures)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.subsystem.name())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn find(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.subsystem.name() == name)
    }
}

/// Run a subsystem call, turning a panic into an error
fn isolate(call: impl FnOnce() -> Result<(), SubsystemError>) -> Result<(), SubsystemError> {
    match panic::catch_unwind(AssertUnwindSafe(call)) {
        Ok(result) => result,
        Err(payload) => Err(SubsystemError::Panicked(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn record_failure(
    entry: &mut Entry,
    phase: Phase,
    error: SubsystemError,
    report: &mut SchedulerReport,
) {
    entry.failures += 1;
    let name = entry.subsystem.name().to_string();
    error!(subsystem = %name, ?phase, failures = entry.failures, "Subsystem failed: {}", error);
    report.failures.push(SubsystemFailure { name, phase, error });
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use verdant_core::{Clock, TimerQueue};

    use super::*;
    use crate::subsystem::{FnSubsystem, PlayerSnapshot};

    struct Harness {
        clock: Clock,
        timers: TimerQueue<WorldEvent>,
        commands: Vec<crate::events::SceneCommand>,
        events: Vec<crate::events::GameEvent>,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                clock: Clock::default(),
                timers: TimerQueue::new(),
                commands: Vec::new(),
                events: Vec::new(),
            }
        }

        fn ctx(&mut self) -> TickContext<'_> {
            TickContext {
                clock: &self.clock,
                player: PlayerSnapshot::default(),
                timers: &mut self.timers,
                commands: &mut self.commands,
                events: &mut self.events,
            }
        }
    }

    fn counter(name: &str, count: Rc<Cell<u32>>) -> impl Subsystem {
        FnSubsystem::new(name, move |_ctx: &mut TickContext| {
            count.set(count.get() + 1);
            Ok(())
        })
    }

    struct BrokenInit {
        inits: Rc<Cell<u32>>,
        updates: Rc<Cell<u32>>,
    }

    impl Subsystem for BrokenInit {
        fn name(&self) -> &str {
            "broken-init"
        }

        fn initialize(&mut self, _ctx: &mut TickContext) -> Result<(), SubsystemError> {
            self.inits.set(self.inits.get() + 1);
            Err(SubsystemError::Failed("no assets".into()))
        }

        fn update(&mut self, _ctx: &mut TickContext) -> Result<(), SubsystemError> {
            self.updates.set(self.updates.get() + 1);
            Ok(())
        }
    }

    #[test]
    fn test_runs_in_order() {
        let order = Rc::new(std::cell::RefCell::new(Vec::new()));
        let mut scheduler = SubsystemScheduler::new();
        for name in ["a", "b", "c"] {
            let order = order.clone();
            scheduler.add(FnSubsystem::new(name, move |_ctx: &mut TickContext| {
                order.borrow_mut().push(name);
                Ok(())
            }));
        }

        let mut harness = Harness::new();
        let report = scheduler.update_all(&mut harness.ctx());
        assert_eq!(report.initialized, 3);
        assert_eq!(report.succeeded, 3);
        assert_eq!(*order.borrow(), vec!["a", "b", "c"]);
        assert_eq!(scheduler.names().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_failed_init_is_skipped_and_not_retried() {
        let inits = Rc::new(Cell::new(0));
        let updates = Rc::new(Cell::new(0));
        let others = Rc::new(Cell::new(0));

        let mut scheduler = SubsystemScheduler::new();
        scheduler.add(BrokenInit {
            inits: inits.clone(),
            updates: updates.clone(),
        });
        scheduler.add(counter("healthy", others.clone()));

        let mut harness = Harness::new();
        let report = scheduler.initialize_all(&mut harness.ctx());
        assert_eq!(report.initialized, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].phase, Phase::Initialize);

        for _ in 0..3 {
            scheduler.update_all(&mut harness.ctx());
        }
        assert_eq!(inits.get(), 1);
        assert_eq!(updates.get(), 0);
        assert_eq!(others.get(), 3);
        assert_eq!(scheduler.lifecycle("broken-init"), Some(Lifecycle::Uninitialized));
        assert_eq!(scheduler.lifecycle("healthy"), Some(Lifecycle::Ready));
    }

    #[test]
    fn test_update_error_isolated() {
        let before = Rc::new(Cell::new(0));
        let after = Rc::new(Cell::new(0));
        let mut scheduler = SubsystemScheduler::new();
        scheduler.add(counter("before", before.clone()));
        scheduler.add(FnSubsystem::new("flaky", |ctx: &mut TickContext| {
            if ctx.clock.ticks() == 2 {
                Err(SubsystemError::Failed("bad tick".into()))
            } else {
                Ok(())
            }
        }));
        scheduler.add(counter("after", after.clone()));

        let mut harness = Harness::new();
        let mut failures = 0;
        for _ in 0..4 {
            harness.clock.advance(0.016);
            failures += scheduler.update_all(&mut harness.ctx()).failures.len();
        }
        assert_eq!(failures, 1);
        assert_eq!(before.get(), 4);
        assert_eq!(after.get(), 4);
        assert_eq!(scheduler.failure_count("flaky"), Some(1));
        assert_eq!(scheduler.lifecycle("flaky"), Some(Lifecycle::Ready));
    }

    #[test]
    fn test_panic_isolated() {
        let after = Rc::new(Cell::new(0));
        let mut scheduler = SubsystemScheduler::new();
        scheduler.add(FnSubsystem::new("panicky", |_ctx: &mut TickContext| {
            panic!("exploded");
        }));
        scheduler.add(counter("after", after.clone()));

        let mut harness = Harness::new();
        let report = scheduler.update_all(&mut harness.ctx());
        assert_eq!(after.get(), 1);
        assert_eq!(report.failures.len(), 1);
        match &report.failures[0].error {
            SubsystemError::Panicked(message) => assert_eq!(message, "exploded"),
            other => panic!("unexpected error: {other:?}"),
        }

        // Still scheduled next tick
        let report = scheduler.update_all(&mut harness.ctx());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(after.get(), 2);
    }

    #[test]
    fn test_dispatch_reaches_ready_subsystems() {
        struct Listener(Rc<Cell<u32>>);

        impl Subsystem for Listener {
            fn name(&self) -> &str {
                "listener"
            }

            fn update(&mut self, _ctx: &mut TickContext) -> Result<(), SubsystemError> {
                Ok(())
            }

            fn handle_event(
                &mut self,
                event: &WorldEvent,
                _ctx: &mut TickContext,
            ) -> Result<(), SubsystemError> {
                if *event == WorldEvent::DayNightStep {
                    self.0.set(self.0.get() + 1);
                }
                Ok(())
            }
        }

        let heard = Rc::new(Cell::new(0));
        let mut scheduler = SubsystemScheduler::new();
        scheduler.add(Listener(heard.clone()));

        let mut harness = Harness::new();
        // Not initialized yet: nothing delivered
        scheduler.dispatch(&WorldEvent::DayNightStep, &mut harness.ctx());
        assert_eq!(heard.get(), 0);

        scheduler.initialize_all(&mut harness.ctx());
        scheduler.dispatch(&WorldEvent::DayNightStep, &mut harness.ctx());
        scheduler.dispatch(&WorldEvent::WeatherChange, &mut harness.ctx());
        assert_eq!(heard.get(), 1);
    }
}
