//! Priority/period cooperative scheduler.
//!
//! The scheduler owns the task registry: registration data, per-task run
//! bookkeeping and the dispatch policy. The task bodies themselves
//! are passed in by the executor each cycle. The platform layer (firmware
//! or the sim rig) owns the outer run loop, the tick source and the stop
//! signal; the core stays executor-free.
//!
//! # Dispatch policy
//!
//! One dispatch cycle runs every *eligible* task exactly once, strictly in
//! descending priority order; a higher-priority step always completes
//! before a lower-priority step starts. Execution is single-threaded and
//! non-preemptive: a resumed body runs until it returns.
//!
//! A task with period P is eligible when at least P ticks have elapsed
//! since its last run (a task without a period is eligible every cycle).
//! An ineligible task is skipped, not queued: missed periods are dropped,
//! never accumulated.
//!
//! # Example
//!
//! ```rust
//! use turret_core::scheduler::{Scheduler, Task, TaskConfig};
//! use turret_core::share::TurretShares;
//! # use turret_core::scheduler::{StepOutcome, TaskError};
//! # struct Idle;
//! # impl Task for Idle {
//! #     fn step(&mut self, _: &TurretShares) -> Result<StepOutcome, TaskError> {
//! #         Ok(StepOutcome::Yield)
//! #     }
//! # }
//!
//! let shares = TurretShares::new();
//! let mut yaw = Idle;
//! let mut scheduler: Scheduler = Scheduler::new();
//! scheduler.register(TaskConfig::periodic("yaw", 11, 10)).unwrap();
//!
//! let mut tasks: [&mut dyn Task; 1] = [&mut yaw];
//! scheduler.dispatch_cycle(&mut tasks, &shares, 0).unwrap();
//! ```

pub mod types;

pub use types::*;

use heapless::Vec;

use crate::share::TurretShares;

/// Registry capacity. The full rig registers five tasks.
pub const MAX_TASKS: usize = 8;

/// Handle returned by [`Scheduler::register`]; doubles as the task's index
/// in the body slice passed to [`Scheduler::dispatch_cycle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TaskId(pub usize);

/// Scheduler registry error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SchedulerError {
    /// More tasks registered than the registry can hold.
    RegistryFull,
}

impl core::fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SchedulerError::RegistryFull => write!(f, "task registry full"),
        }
    }
}

impl core::error::Error for SchedulerError {}

#[derive(Debug, Clone, Copy)]
struct Slot {
    cfg: TaskConfig,
    last_run: Option<u64>,
    active: bool,
    runs: u32,
}

/// Task registry plus dispatch bookkeeping.
///
/// Populated once at startup; tasks are never destroyed or recreated at
/// runtime (a body that returns [`StepOutcome::Done`] is only marked
/// inactive). Registration order is the priority tie-break: first
/// registered wins.
pub struct Scheduler<const N: usize = MAX_TASKS> {
    slots: Vec<Slot, N>,
}

impl<const N: usize> Scheduler<N> {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Register a task. The returned id is the task's index in the body
    /// slice handed to [`dispatch_cycle`](Self::dispatch_cycle).
    pub fn register(&mut self, cfg: TaskConfig) -> Result<TaskId, SchedulerError> {
        let id = TaskId(self.slots.len());
        self.slots
            .push(Slot {
                cfg,
                last_run: None,
                active: true,
                runs: 0,
            })
            .map_err(|_| SchedulerError::RegistryFull)?;
        Ok(id)
    }

    fn is_eligible(slot: &Slot, now: u64) -> bool {
        if !slot.active {
            return false;
        }
        match (slot.cfg.period, slot.last_run) {
            (Some(period), Some(last)) => now.saturating_sub(last) >= period as u64,
            // Never run yet, or no period: eligible.
            _ => true,
        }
    }

    /// Run one dispatch cycle at tick `now`.
    ///
    /// `tasks[i]` must be the body registered as the i-th task. Every task
    /// eligible at `now` is stepped exactly once, highest priority first;
    /// ties break toward the earlier registration. Returns the number of
    /// steps taken, or the first step error (which aborts the rest of the
    /// cycle).
    pub fn dispatch_cycle(
        &mut self,
        tasks: &mut [&mut dyn Task],
        shares: &TurretShares,
        now: u64,
    ) -> Result<u32, TaskError> {
        debug_assert_eq!(tasks.len(), self.slots.len());
        let count = tasks.len().min(self.slots.len());

        let mut ran = [false; N];
        let mut steps = 0;
        loop {
            let mut best: Option<usize> = None;
            for idx in 0..count {
                if ran[idx] || !Self::is_eligible(&self.slots[idx], now) {
                    continue;
                }
                match best {
                    // `>=` keeps the earlier registration on a tie.
                    Some(b) if self.slots[b].cfg.priority >= self.slots[idx].cfg.priority => {}
                    _ => best = Some(idx),
                }
            }
            let Some(idx) = best else {
                return Ok(steps);
            };

            ran[idx] = true;
            let slot = &mut self.slots[idx];
            slot.last_run = Some(now);
            slot.runs = slot.runs.saturating_add(1);
            match tasks[idx].step(shares)? {
                StepOutcome::Yield => {}
                StepOutcome::Done => slot.active = false,
            }
            steps += 1;
        }
    }

    /// Number of registered tasks.
    pub fn task_count(&self) -> usize {
        self.slots.len()
    }

    /// Total completed steps of a task.
    pub fn runs(&self, id: TaskId) -> u32 {
        self.slots[id.0].runs
    }

    /// Whether the task is still eligible to be scheduled at all.
    pub fn is_active(&self, id: TaskId) -> bool {
        self.slots[id.0].active
    }

    /// Registration data of a task.
    pub fn config(&self, id: TaskId) -> &TaskConfig {
        &self.slots[id.0].cfg
    }
}

impl<const N: usize> Default for Scheduler<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    /// Records the global sequence number at each of its steps.
    struct Recorder<'s> {
        seq: &'s Cell<u32>,
        stamps: Vec<u32, 64>,
    }

    impl<'s> Recorder<'s> {
        fn new(seq: &'s Cell<u32>) -> Self {
            Self {
                seq,
                stamps: Vec::new(),
            }
        }
    }

    impl Task for Recorder<'_> {
        fn step(&mut self, _shares: &TurretShares) -> Result<StepOutcome, TaskError> {
            let stamp = self.seq.get();
            self.seq.set(stamp + 1);
            self.stamps.push(stamp).unwrap();
            Ok(StepOutcome::Yield)
        }
    }

    /// Runs once, then reports Done.
    struct OneShot<'s> {
        seq: &'s Cell<u32>,
        stamps: Vec<u32, 64>,
    }

    impl Task for OneShot<'_> {
        fn step(&mut self, _shares: &TurretShares) -> Result<StepOutcome, TaskError> {
            let stamp = self.seq.get();
            self.seq.set(stamp + 1);
            self.stamps.push(stamp).unwrap();
            Ok(StepOutcome::Done)
        }
    }

    struct Failing;

    impl Task for Failing {
        fn step(&mut self, _shares: &TurretShares) -> Result<StepOutcome, TaskError> {
            Err(TaskError::Camera(crate::thermal::CameraError::Bus))
        }
    }

    #[test]
    fn higher_priority_steps_first_within_a_cycle() {
        let shares = TurretShares::new();
        let seq = Cell::new(0);
        let mut high = Recorder::new(&seq);
        let mut low = Recorder::new(&seq);

        let mut scheduler: Scheduler = Scheduler::new();
        // Registered low first: priority must dominate registration order.
        scheduler.register(TaskConfig::continuous("low", 11)).unwrap();
        scheduler.register(TaskConfig::continuous("high", 100)).unwrap();

        for now in 0..5 {
            let mut tasks: [&mut dyn Task; 2] = [&mut low, &mut high];
            scheduler.dispatch_cycle(&mut tasks, &shares, now).unwrap();
        }

        assert_eq!(high.stamps.len(), 5);
        assert_eq!(low.stamps.len(), 5);
        for (h, l) in high.stamps.iter().zip(low.stamps.iter()) {
            assert!(h < l, "priority 100 must step before priority 11");
        }
    }

    #[test]
    fn priority_tie_breaks_by_registration_order() {
        let shares = TurretShares::new();
        let seq = Cell::new(0);
        let mut first = Recorder::new(&seq);
        let mut second = Recorder::new(&seq);

        let mut scheduler: Scheduler = Scheduler::new();
        scheduler.register(TaskConfig::continuous("first", 10)).unwrap();
        scheduler.register(TaskConfig::continuous("second", 10)).unwrap();

        let mut tasks: [&mut dyn Task; 2] = [&mut first, &mut second];
        scheduler.dispatch_cycle(&mut tasks, &shares, 0).unwrap();

        assert!(first.stamps[0] < second.stamps[0]);
    }

    #[test]
    fn periodic_task_waits_for_its_period() {
        let shares = TurretShares::new();
        let seq = Cell::new(0);
        let mut task = Recorder::new(&seq);

        let mut scheduler: Scheduler = Scheduler::new();
        let id = scheduler.register(TaskConfig::periodic("slow", 5, 10)).unwrap();

        for now in 0..=25 {
            let mut tasks: [&mut dyn Task; 1] = [&mut task];
            scheduler.dispatch_cycle(&mut tasks, &shares, now).unwrap();
        }

        // Eligible at 0, 10, 20 only.
        assert_eq!(scheduler.runs(id), 3);
    }

    #[test]
    fn missed_periods_are_dropped_not_accumulated() {
        let shares = TurretShares::new();
        let seq = Cell::new(0);
        let mut task = Recorder::new(&seq);

        let mut scheduler: Scheduler = Scheduler::new();
        let id = scheduler.register(TaskConfig::periodic("slow", 5, 3)).unwrap();

        {
            let mut tasks: [&mut dyn Task; 1] = [&mut task];
            scheduler.dispatch_cycle(&mut tasks, &shares, 0).unwrap();
        }
        // A long gap covers many periods; the task still runs only once.
        {
            let mut tasks: [&mut dyn Task; 1] = [&mut task];
            scheduler.dispatch_cycle(&mut tasks, &shares, 100).unwrap();
        }

        assert_eq!(scheduler.runs(id), 2);
    }

    #[test]
    fn continuous_task_runs_every_cycle() {
        let shares = TurretShares::new();
        let seq = Cell::new(0);
        let mut task = Recorder::new(&seq);

        let mut scheduler: Scheduler = Scheduler::new();
        let id = scheduler.register(TaskConfig::continuous("fast", 1)).unwrap();

        for now in 0..7 {
            let mut tasks: [&mut dyn Task; 1] = [&mut task];
            scheduler.dispatch_cycle(&mut tasks, &shares, now).unwrap();
        }
        assert_eq!(scheduler.runs(id), 7);
    }

    #[test]
    fn done_task_never_runs_again() {
        let shares = TurretShares::new();
        let seq = Cell::new(0);
        let mut once = OneShot {
            seq: &seq,
            stamps: Vec::new(),
        };
        let mut every = Recorder::new(&seq);

        let mut scheduler: Scheduler = Scheduler::new();
        let once_id = scheduler.register(TaskConfig::continuous("init", 100)).unwrap();
        scheduler.register(TaskConfig::continuous("loop", 1)).unwrap();

        for now in 0..4 {
            let mut tasks: [&mut dyn Task; 2] = [&mut once, &mut every];
            scheduler.dispatch_cycle(&mut tasks, &shares, now).unwrap();
        }

        assert_eq!(once.stamps.len(), 1);
        assert_eq!(once.stamps[0], 0, "init must complete before the loop task");
        assert!(!scheduler.is_active(once_id));
        assert_eq!(every.stamps.len(), 4);
    }

    #[test]
    fn step_error_aborts_the_cycle() {
        let shares = TurretShares::new();
        let seq = Cell::new(0);
        let mut bad = Failing;
        let mut good = Recorder::new(&seq);

        let mut scheduler: Scheduler = Scheduler::new();
        scheduler.register(TaskConfig::continuous("bad", 50)).unwrap();
        scheduler.register(TaskConfig::continuous("good", 10)).unwrap();

        let mut tasks: [&mut dyn Task; 2] = [&mut bad, &mut good];
        let err = scheduler.dispatch_cycle(&mut tasks, &shares, 0).unwrap_err();
        assert_eq!(err, TaskError::Camera(crate::thermal::CameraError::Bus));
        // The lower-priority task never got its step.
        assert!(good.stamps.is_empty());
    }

    #[test]
    fn registry_rejects_overflow() {
        let mut scheduler: Scheduler<2> = Scheduler::new();
        scheduler.register(TaskConfig::continuous("a", 1)).unwrap();
        scheduler.register(TaskConfig::continuous("b", 1)).unwrap();
        assert_eq!(
            scheduler.register(TaskConfig::continuous("c", 1)),
            Err(SchedulerError::RegistryFull)
        );
    }
}
