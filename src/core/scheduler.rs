//! Midnight rollover: wait for the next local midnight, fire, re-arm.
//!
//! The clock is injected so the loop can be driven by a fake clock in
//! tests. DST shifts are not compensated: every cycle recomputes the next
//! midnight from the current wall time.

use crate::core::calendar::next_midnight;
use chrono::{Local, NaiveDateTime};
use std::ops::ControlFlow;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

pub trait Clock: Send + 'static {
    /// Current local wall time.
    fn now(&self) -> NaiveDateTime;

    /// Block until `deadline` has passed or `cancel` receives a message
    /// (or its sender is dropped). Returns false when cancelled.
    fn wait_until(&self, deadline: NaiveDateTime, cancel: &Receiver<()>) -> bool;
}

/// Real wall clock in the local timezone.
pub struct SystemClock;

impl SystemClock {
    fn remaining(deadline: NaiveDateTime) -> Duration {
        let now = Local::now();
        match deadline.and_local_timezone(Local).earliest() {
            Some(target) => (target - now).to_std().unwrap_or(Duration::ZERO),
            // deadline falls into a DST gap: fall back to naive arithmetic
            None => (deadline - now.naive_local())
                .to_std()
                .unwrap_or(Duration::ZERO),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }

    fn wait_until(&self, deadline: NaiveDateTime, cancel: &Receiver<()>) -> bool {
        loop {
            let remaining = Self::remaining(deadline);
            if remaining.is_zero() {
                return true;
            }
            match cancel.recv_timeout(remaining) {
                Err(RecvTimeoutError::Timeout) => continue,
                Ok(()) | Err(RecvTimeoutError::Disconnected) => return false,
            }
        }
    }
}

pub struct MidnightScheduler<C: Clock> {
    clock: C,
}

impl<C: Clock> MidnightScheduler<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    /// Next deadline. A timer that woke a little early must not fire the
    /// same midnight twice, hence the `last` floor.
    fn next_fire(&self, last: Option<NaiveDateTime>) -> NaiveDateTime {
        let now = self.clock.now();
        let from = match last {
            Some(l) if l > now => l,
            _ => now,
        };
        next_midnight(from)
    }

    /// Run until `on_fire` breaks or `cancel` fires. `on_fire` receives the
    /// midnight that was reached.
    pub fn run<F>(&self, cancel: &Receiver<()>, mut on_fire: F)
    where
        F: FnMut(NaiveDateTime) -> ControlFlow<()>,
    {
        let mut last = None;
        loop {
            let deadline = self.next_fire(last);
            log::debug!("midnight refresh armed for {deadline}");

            if !self.clock.wait_until(deadline, cancel) {
                log::debug!("midnight refresh cancelled");
                break;
            }

            last = Some(deadline);
            if on_fire(deadline).is_break() {
                break;
            }
        }
    }

    /// Run the loop on its own thread.
    pub fn spawn<F>(self, on_fire: F) -> SchedulerHandle
    where
        F: FnMut(NaiveDateTime) -> ControlFlow<()> + Send + 'static,
    {
        let (cancel_tx, cancel_rx) = mpsc::channel();
        let join = thread::spawn(move || self.run(&cancel_rx, on_fire));
        SchedulerHandle {
            cancel: cancel_tx,
            join: Some(join),
        }
    }
}

/// Owner of a spawned scheduler. Dropping it also stops the loop.
pub struct SchedulerHandle {
    cancel: Sender<()>,
    join: Option<JoinHandle<()>>,
}

impl SchedulerHandle {
    /// Stop the loop and wait for the thread to finish.
    pub fn cancel(mut self) {
        let _ = self.cancel.send(());
        if let Some(join) = self.join.take()
            && join.join().is_err()
        {
            log::warn!("midnight scheduler thread panicked");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Jumps straight to each deadline, shifted by `skew`.
    #[derive(Clone)]
    struct FakeClock {
        now: Arc<Mutex<NaiveDateTime>>,
        skew: chrono::Duration,
    }

    impl FakeClock {
        fn at(s: &str, skew: chrono::Duration) -> Self {
            Self {
                now: Arc::new(Mutex::new(dt(s))),
                skew,
            }
        }
    }

    impl Clock for FakeClock {
        fn now(&self) -> NaiveDateTime {
            *self.now.lock().unwrap()
        }

        fn wait_until(&self, deadline: NaiveDateTime, cancel: &Receiver<()>) -> bool {
            if cancel.try_recv().is_ok() {
                return false;
            }
            *self.now.lock().unwrap() = deadline + self.skew;
            true
        }
    }

    /// Never reaches a deadline; only cancellation ends the wait.
    struct StuckClock;

    impl Clock for StuckClock {
        fn now(&self) -> NaiveDateTime {
            dt("2025-01-01 12:00:00")
        }

        fn wait_until(&self, _deadline: NaiveDateTime, cancel: &Receiver<()>) -> bool {
            let _ = cancel.recv();
            false
        }
    }

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn collect_fires(clock: FakeClock, n: usize) -> Vec<NaiveDateTime> {
        let scheduler = MidnightScheduler::new(clock);
        let (_tx, rx) = mpsc::channel();
        let mut fired = Vec::new();

        scheduler.run(&rx, |deadline| {
            fired.push(deadline);
            if fired.len() == n {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        fired
    }

    #[test]
    fn fires_at_each_following_midnight() {
        let clock = FakeClock::at("2025-03-30 15:20:00", chrono::Duration::milliseconds(3));
        let fired = collect_fires(clock, 3);

        assert_eq!(
            fired,
            vec![
                dt("2025-03-31 00:00:00"),
                dt("2025-04-01 00:00:00"),
                dt("2025-04-02 00:00:00"),
            ]
        );
    }

    #[test]
    fn early_wake_up_does_not_fire_twice() {
        let clock = FakeClock::at("2025-12-31 08:00:00", chrono::Duration::milliseconds(-5));
        let fired = collect_fires(clock, 2);

        assert_eq!(
            fired,
            vec![dt("2026-01-01 00:00:00"), dt("2026-01-02 00:00:00")]
        );
    }

    #[test]
    fn pending_cancel_stops_before_firing() {
        let scheduler = MidnightScheduler::new(FakeClock::at(
            "2025-03-30 15:20:00",
            chrono::Duration::zero(),
        ));
        let (tx, rx) = mpsc::channel();
        tx.send(()).unwrap();

        let mut fired = 0;
        scheduler.run(&rx, |_| {
            fired += 1;
            ControlFlow::Continue(())
        });
        assert_eq!(fired, 0);
    }

    #[test]
    fn spawned_scheduler_can_be_cancelled() {
        let fired = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&fired);

        let handle = MidnightScheduler::new(StuckClock).spawn(move |_| {
            *counter.lock().unwrap() += 1;
            ControlFlow::Continue(())
        });
        handle.cancel();

        assert_eq!(*fired.lock().unwrap(), 0);
    }
}
