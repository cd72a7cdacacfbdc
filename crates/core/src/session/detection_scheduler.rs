use std::time::Duration;

use tokio::task::{AbortHandle, JoinHandle};

/// How passes are triggered while running.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cadence {
    /// Fixed-period timer for live sources.
    Periodic(Duration),
    /// A single pass, then back to `Stopped`.
    OneShot,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PassPhase {
    Idle,
    Detecting,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerState {
    Stopped,
    Running { cadence: Cadence, phase: PassPhase },
}

/// Issued when a pass starts; handed back when its result arrives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PassTicket {
    /// Input generation the frame was taken from.
    pub generation: u64,
    pub sequence: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PassOutcome {
    /// Result belongs to the active source and may be applied.
    Current,
    /// Source changed or the schedule was reset since the pass began.
    Stale,
}

/// Cadence and in-flight bookkeeping for detection passes.
///
/// At most one pass is in flight. Restarting for a new source always goes
/// through `Stopped`, which aborts the timer and the in-flight pass task and
/// forgets its ticket, so a late result can never be mistaken for a current
/// one.
pub struct DetectionScheduler {
    state: SchedulerState,
    generation: u64,
    next_sequence: u64,
    in_flight: Option<PassTicket>,
    timer: Option<JoinHandle<()>>,
    pass_task: Option<AbortHandle>,
    skipped_ticks: u64,
}

impl DetectionScheduler {
    pub fn new() -> Self {
        Self {
            state: SchedulerState::Stopped,
            generation: 0,
            next_sequence: 0,
            in_flight: None,
            timer: None,
            pass_task: None,
            skipped_ticks: 0,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_detecting(&self) -> bool {
        matches!(
            self.state,
            SchedulerState::Running {
                phase: PassPhase::Detecting,
                ..
            }
        )
    }

    /// Resets to `Stopped`, then runs for `generation`.
    pub fn start(&mut self, generation: u64, cadence: Cadence) {
        self.stop();
        self.generation = generation;
        self.state = SchedulerState::Running {
            cadence,
            phase: PassPhase::Idle,
        };
    }

    /// Hands over the task driving a periodic cadence; it is aborted on stop.
    pub fn attach_timer(&mut self, timer: JoinHandle<()>) {
        if let Some(previous) = self.timer.replace(timer) {
            previous.abort();
        }
    }

    /// Hands over the task running the in-flight pass for `ticket`; it is
    /// aborted on stop. Ignored when `ticket` is no longer in flight.
    pub fn attach_pass(&mut self, ticket: PassTicket, task: AbortHandle) {
        if self.in_flight == Some(ticket) {
            self.pass_task = Some(task);
        }
    }

    pub fn stop(&mut self) {
        self.abort_tasks();
        self.in_flight = None;
        self.state = SchedulerState::Stopped;
    }

    /// Reserves the single in-flight slot for `generation`.
    ///
    /// `None` when stopped, scheduled for another generation, or a pass is
    /// already in flight; the last case counts as a skipped tick.
    pub fn try_begin_pass(&mut self, generation: u64) -> Option<PassTicket> {
        let SchedulerState::Running { cadence, phase } = self.state else {
            return None;
        };
        if generation != self.generation {
            return None;
        }
        if phase == PassPhase::Detecting {
            self.skipped_ticks += 1;
            return None;
        }
        let ticket = PassTicket {
            generation,
            sequence: self.next_sequence,
        };
        self.next_sequence += 1;
        self.in_flight = Some(ticket);
        self.state = SchedulerState::Running {
            cadence,
            phase: PassPhase::Detecting,
        };
        Some(ticket)
    }

    /// Releases a reserved slot without a result (nothing to analyse).
    pub fn abandon_pass(&mut self, ticket: PassTicket) {
        if self.in_flight == Some(ticket) {
            self.in_flight = None;
            self.pass_task = None;
            if let SchedulerState::Running { cadence, .. } = self.state {
                self.state = SchedulerState::Running {
                    cadence,
                    phase: PassPhase::Idle,
                };
            }
        }
    }

    /// Closes the pass for `ticket` and says whether its result still applies.
    pub fn finish_pass(&mut self, ticket: PassTicket, current_generation: u64) -> PassOutcome {
        if self.in_flight != Some(ticket) {
            return PassOutcome::Stale;
        }
        self.in_flight = None;
        self.pass_task = None;
        if let SchedulerState::Running { cadence, .. } = self.state {
            self.state = match cadence {
                Cadence::OneShot => SchedulerState::Stopped,
                Cadence::Periodic(_) => SchedulerState::Running {
                    cadence,
                    phase: PassPhase::Idle,
                },
            };
        }
        if ticket.generation == current_generation {
            PassOutcome::Current
        } else {
            PassOutcome::Stale
        }
    }

    /// Skipped-tick count since the last call.
    pub fn take_skipped_ticks(&mut self) -> u64 {
        std::mem::take(&mut self.skipped_ticks)
    }

    fn abort_tasks(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        if let Some(pass) = self.pass_task.take() {
            pass.abort();
        }
    }
}

impl Default for DetectionScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for DetectionScheduler {
    fn drop(&mut self) {
        self.abort_tasks();
    }
}
