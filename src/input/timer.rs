// SPDX-License-Identifier: GPL-3.0-only

//! Long-press and repeat timers.
//!
//! Timers run as tokio tasks that only post a `KeyboardMessage` back into the
//! keyboard's event channel; they never touch keyboard state themselves.
//! A `TimerHandle` owns the task and aborts it when dropped, so clearing a
//! timer is `Option::take` and clearing an unset one does nothing.

use crate::keyboard::KeyboardMessage;
use futures::channel::mpsc::UnboundedSender;
use std::time::Duration;
use tokio::runtime::{Handle, TryCurrentError};
use tokio::task::AbortHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Owning handle of a scheduled timer. Dropping it cancels the timer.
#[derive(Debug)]
pub struct TimerHandle {
    abort: AbortHandle,
}

impl TimerHandle {
    #[cfg(test)]
    pub(crate) fn is_finished(&self) -> bool {
        self.abort.is_finished()
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.abort.abort();
    }
}

/// Schedules timers that post messages into the keyboard event channel.
///
/// Tasks are spawned on the tokio runtime captured at construction, so
/// scheduling works from any thread or foreign main loop afterwards.
#[derive(Debug, Clone)]
pub struct Timers {
    runtime: Handle,
    tx: UnboundedSender<KeyboardMessage>,
    long_press_delay: Duration,
    repeat_interval: Duration,
}

impl Timers {
    /// Creates a scheduler on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Fails when called outside a tokio runtime.
    pub fn new(
        tx: UnboundedSender<KeyboardMessage>,
        long_press_delay: Duration,
        repeat_interval: Duration,
    ) -> Result<Self, TryCurrentError> {
        let runtime = Handle::try_current()?;
        Ok(Self::with_runtime(runtime, tx, long_press_delay, repeat_interval))
    }

    /// Creates a scheduler spawning on `runtime`.
    pub fn with_runtime(
        runtime: Handle,
        tx: UnboundedSender<KeyboardMessage>,
        long_press_delay: Duration,
        repeat_interval: Duration,
    ) -> Self {
        Self {
            runtime,
            tx,
            long_press_delay,
            // tokio intervals reject a zero period
            repeat_interval: repeat_interval.max(Duration::from_millis(1)),
        }
    }

    /// Configured long-press delay.
    #[must_use]
    pub fn long_press_delay(&self) -> Duration {
        self.long_press_delay
    }

    /// Configured repeat period.
    #[must_use]
    pub fn repeat_interval(&self) -> Duration {
        self.repeat_interval
    }

    /// Posts `message` once after `delay`.
    pub fn once(&self, delay: Duration, message: KeyboardMessage) -> TimerHandle {
        let tx = self.tx.clone();
        let deadline = self.now() + delay;
        let task = self.runtime.spawn(async move {
            time::sleep_until(deadline).await;
            let _ = tx.unbounded_send(message);
        });
        TimerHandle {
            abort: task.abort_handle(),
        }
    }

    /// Posts `message` every `period`, the first time one period from now.
    pub fn repeating(&self, period: Duration, message: KeyboardMessage) -> TimerHandle {
        let tx = self.tx.clone();
        let period = period.max(Duration::from_millis(1));
        let start = self.now() + period;
        let task = self.runtime.spawn(async move {
            let mut ticker = time::interval_at(start, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if tx.unbounded_send(message.clone()).is_err() {
                    break;
                }
            }
        });
        TimerHandle {
            abort: task.abort_handle(),
        }
    }

    // The runtime clock, which may be paused in tests.
    fn now(&self) -> Instant {
        let _guard = self.runtime.enter();
        Instant::now()
    }
}
