use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::FutureExt;
use futures::future::{AbortHandle, LocalBoxFuture, abortable};

use housecup_shared::{HouseScores, TimeWindow};

use crate::api::{FetchError, ScoreSource};
use crate::controller::LiveMode;

/// Re-retrieval period while live mode is active.
pub const POLL_PERIOD: Duration = Duration::from_millis(2_000);

/// Host services the poller needs: local task spawning and a clock.
pub trait PollRuntime {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>);
    fn sleep(&self, period: Duration) -> LocalBoxFuture<'static, ()>;
    fn now(&self) -> DateTime<Utc>;
}

/// Which completed retrieval wins when several are in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseOrdering {
    /// Every successful response is applied as it arrives, so a slow response
    /// for an older window can overwrite a newer one.
    #[default]
    ArrivalOrder,
    /// Responses issued before the currently applied one are dropped.
    LatestIssued,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub period: Duration,
    pub ordering: ResponseOrdering,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            period: POLL_PERIOD,
            ordering: ResponseOrdering::default(),
        }
    }
}

#[derive(Clone)]
pub struct PollContext {
    pub runtime: Rc<dyn PollRuntime>,
    pub source: Rc<dyn ScoreSource>,
    pub config: PollConfig,
}

/// A complete score table adopted from one successful retrieval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreSnapshot {
    pub scores: HouseScores,
    pub window: TimeWindow,
    pub retrieved_at: DateTime<Utc>,
}

type SnapshotCallback = Box<dyn Fn(ScoreSnapshot)>;
type ErrorCallback = Box<dyn Fn(&FetchError)>;

struct PollState {
    window: TimeWindow,
    live: LiveMode,
    timer: Option<AbortHandle>,
    stopped: bool,
    issued_seq: u64,
    applied_seq: u64,
}

struct PollerInner {
    runtime: Rc<dyn PollRuntime>,
    source: Rc<dyn ScoreSource>,
    config: PollConfig,
    on_snapshot: SnapshotCallback,
    on_error: ErrorCallback,
    state: RefCell<PollState>,
}

/// Owns the retrieval lifecycle for one mounted leaderboard.
///
/// Retrieves immediately on start and on every window change, then every
/// [`PollConfig::period`] while live. At most one timer is pending; it is
/// cancelled before a new one is armed and on [`ScorePoller::stop`]. In-flight
/// requests are never cancelled, but their completions are ignored after stop.
/// Dropping the poller stops it.
pub struct ScorePoller {
    inner: Rc<PollerInner>,
}

impl ScorePoller {
    pub fn start(
        context: PollContext,
        window: TimeWindow,
        live: LiveMode,
        on_snapshot: impl Fn(ScoreSnapshot) + 'static,
        on_error: impl Fn(&FetchError) + 'static,
    ) -> Self {
        let inner = Rc::new(PollerInner {
            runtime: context.runtime,
            source: context.source,
            config: context.config,
            on_snapshot: Box::new(on_snapshot),
            on_error: Box::new(on_error),
            state: RefCell::new(PollState {
                window,
                live,
                timer: None,
                stopped: false,
                issued_seq: 0,
                applied_seq: 0,
            }),
        });
        PollerInner::restart(&inner);
        Self { inner }
    }

    #[cfg(test)]
    pub fn is_stopped(&self) -> bool {
        self.inner.state.borrow().stopped
    }

    #[cfg(test)]
    pub fn has_pending_timer(&self) -> bool {
        self.inner.state.borrow().timer.is_some()
    }

    /// Cancel the pending timer, retrieve for `window` now, and reschedule if live.
    pub fn set_window(&self, window: TimeWindow) {
        {
            let mut state = self.inner.state.borrow_mut();
            if state.stopped {
                return;
            }
            state.window = window;
        }
        PollerInner::restart(&self.inner);
    }

    /// Paused -> Active retrieves now and resumes the period.
    /// Active -> Paused only cancels the pending timer.
    pub fn set_live(&self, live: LiveMode) {
        {
            let mut state = self.inner.state.borrow_mut();
            if state.stopped || state.live == live {
                return;
            }
            state.live = live;
        }
        if live.is_active() {
            PollerInner::restart(&self.inner);
        } else {
            self.inner.cancel_timer();
        }
    }

    pub fn stop(&self) {
        self.inner.state.borrow_mut().stopped = true;
        self.inner.cancel_timer();
    }
}

impl Drop for ScorePoller {
    fn drop(&mut self) {
        self.stop();
    }
}

impl PollerInner {
    fn restart(this: &Rc<Self>) {
        this.cancel_timer();
        Self::retrieve(this);
        if this.state.borrow().live.is_active() {
            Self::schedule(this);
        }
    }

    fn cancel_timer(&self) {
        let timer = self.state.borrow_mut().timer.take();
        if let Some(handle) = timer {
            handle.abort();
        }
    }

    fn schedule(this: &Rc<Self>) {
        let (ticks, handle) = abortable(Self::tick_loop(Rc::clone(this)));
        this.state.borrow_mut().timer = Some(handle);
        this.runtime.spawn(
            async move {
                let _ = ticks.await;
            }
            .boxed_local(),
        );
    }

    async fn tick_loop(this: Rc<Self>) {
        loop {
            this.runtime.sleep(this.config.period).await;
            if this.state.borrow().stopped {
                return;
            }
            Self::retrieve(&this);
        }
    }

    fn retrieve(this: &Rc<Self>) {
        let (window, seq) = {
            let mut state = this.state.borrow_mut();
            state.issued_seq += 1;
            (state.window, state.issued_seq)
        };
        let request = this.source.fetch(window);
        let inner = Rc::clone(this);
        this.runtime.spawn(
            async move {
                let result = request.await;
                inner.complete(seq, window, result);
            }
            .boxed_local(),
        );
    }

    fn complete(&self, seq: u64, window: TimeWindow, result: Result<HouseScores, FetchError>) {
        {
            let mut state = self.state.borrow_mut();
            if state.stopped {
                return;
            }
            if result.is_ok() {
                if self.config.ordering == ResponseOrdering::LatestIssued
                    && seq < state.applied_seq
                {
                    return;
                }
                state.applied_seq = seq;
            }
        }

        match result {
            Ok(scores) => (self.on_snapshot)(ScoreSnapshot {
                scores,
                window,
                retrieved_at: self.runtime.now(),
            }),
            Err(e) => (self.on_error)(&e),
        }
    }
}
