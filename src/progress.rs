//! Cosmetic progress simulation.
//!
//! The endpoint exposes no transfer progress, so the percentage shown while a request is
//! outstanding is a randomised ramp that stalls at 90% and snaps to 100% on completion.
//! Exactly one tick task exists per simulator; it is cancelled on restart, on
//! `finish`/`stop`, and when the simulator is dropped.

use crate::config::ProgressConfig;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};

pub const STALL_AT: f64 = 90.0;
pub const COMPLETE: f64 = 100.0;
pub const MAX_INCREMENT: f64 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSnapshot {
    /// Bumped on every `start`; ticks from an older run are ignored.
    pub run: u64,
    pub percent: f64,
    pub ticking: bool,
}

impl ProgressSnapshot {
    pub fn rounded(&self) -> u8 {
        self.percent.round().clamp(0.0, COMPLETE) as u8
    }
}

/// Apply one tick. Returns the new value and whether the ramp has stalled.
pub fn advance(current: f64, increment: f64) -> (f64, bool) {
    let next = current + increment;
    if next > STALL_AT {
        (STALL_AT, true)
    } else {
        (next, false)
    }
}

struct ActiveTimer {
    counter: Arc<AtomicUsize>,
}

impl ActiveTimer {
    fn register(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self {
            counter: Arc::clone(counter),
        }
    }
}

impl Drop for ActiveTimer {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Aborts the tick task when dropped.
struct TimerHandle {
    task: JoinHandle<()>,
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

pub struct ProgressSimulator {
    tick: Duration,
    seed: Option<u64>,
    state: Arc<watch::Sender<ProgressSnapshot>>,
    timer: Option<TimerHandle>,
    active: Arc<AtomicUsize>,
}

impl ProgressSimulator {
    pub fn new(config: &ProgressConfig) -> Self {
        let (state, _) = watch::channel(ProgressSnapshot {
            run: 0,
            percent: 0.0,
            ticking: false,
        });
        Self {
            tick: config.tick_interval().max(Duration::from_millis(1)),
            seed: config.seed,
            state: Arc::new(state),
            timer: None,
            active: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Reset to 0 and start ticking. Must be called inside a tokio runtime.
    pub fn start(&mut self) {
        self.timer.take();

        let mut run = 0;
        self.state.send_modify(|snap| {
            snap.run += 1;
            snap.percent = 0.0;
            snap.ticking = true;
            run = snap.run;
        });

        let guard = ActiveTimer::register(&self.active);
        let state = Arc::clone(&self.state);
        let tick = self.tick;
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        log::debug!("Progress run {} started ({}ms tick)", run, tick.as_millis());

        let task = tokio::spawn(async move {
            let _guard = guard;
            let mut ticker = interval_at(Instant::now() + tick, tick);
            let mut current = 0.0;

            loop {
                ticker.tick().await;
                let (next, stalled) = advance(current, rng.random_range(0.0..MAX_INCREMENT));
                current = next;

                let still_ours = state.send_if_modified(|snap| {
                    if snap.run != run || !snap.ticking {
                        return false;
                    }
                    snap.percent = current;
                    if stalled {
                        snap.ticking = false;
                    }
                    true
                });

                if !still_ours || stalled {
                    break;
                }
            }
            log::debug!("Progress run {} stopped ticking at {:.1}%", run, current);
        });

        self.timer = Some(TimerHandle { task });
    }

    /// Force 100% and cancel the timer. Safe to call repeatedly.
    pub fn finish(&mut self) {
        self.timer.take();
        self.state.send_modify(|snap| {
            snap.percent = COMPLETE;
            snap.ticking = false;
        });
    }

    /// Cancel the timer, leaving the value where it is.
    pub fn stop(&mut self) {
        self.timer.take();
        self.state.send_if_modified(|snap| {
            let was_ticking = snap.ticking;
            snap.ticking = false;
            was_ticking
        });
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        *self.state.borrow()
    }

    pub fn progress(&self) -> f64 {
        self.snapshot().percent
    }

    pub fn is_running(&self) -> bool {
        self.snapshot().ticking
    }

    /// Number of tick tasks that have not yet been torn down.
    pub fn active_timers(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    pub fn subscribe(&self) -> watch::Receiver<ProgressSnapshot> {
        self.state.subscribe()
    }
}
