use std::rc::Rc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::FutureExt;
use futures::future::LocalBoxFuture;

use crate::api::HttpScoreSource;
use crate::poller::{PollConfig, PollContext, PollRuntime};

/// Browser event loop: `spawn_local` tasks and `setTimeout`-backed sleeps.
pub struct BrowserRuntime;

impl PollRuntime for BrowserRuntime {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task);
    }

    fn sleep(&self, period: Duration) -> LocalBoxFuture<'static, ()> {
        gloo_timers::future::sleep(period).boxed_local()
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

pub fn browser_context(api_base: &str, config: PollConfig) -> PollContext {
    PollContext {
        runtime: Rc::new(BrowserRuntime),
        source: Rc::new(HttpScoreSource::new(api_base)),
        config,
    }
}
