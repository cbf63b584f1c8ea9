use std::cell::Cell;

use housecup_shared::TimeWindow;

use crate::api::FetchError;
use crate::poller::{PollContext, ScorePoller, ScoreSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LiveMode {
    #[default]
    Active,
    Paused,
}

impl LiveMode {
    pub fn is_active(self) -> bool {
        self == Self::Active
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Active => Self::Paused,
            Self::Paused => Self::Active,
        }
    }

    /// Label of the button that flips this mode.
    pub fn toggle_label(self) -> &'static str {
        match self {
            Self::Active => "Pause",
            Self::Paused => "Resume",
        }
    }
}

/// The two user-controlled parameters. They change independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewParams {
    pub window: TimeWindow,
    pub live: LiveMode,
}

/// Holds the view parameters and forwards real changes to the poller.
pub struct ViewController {
    params: Cell<ViewParams>,
    poller: ScorePoller,
}

impl ViewController {
    pub fn start(
        context: PollContext,
        params: ViewParams,
        on_snapshot: impl Fn(ScoreSnapshot) + 'static,
        on_error: impl Fn(&FetchError) + 'static,
    ) -> Self {
        let poller =
            ScorePoller::start(context, params.window, params.live, on_snapshot, on_error);
        Self {
            params: Cell::new(params),
            poller,
        }
    }

    pub fn params(&self) -> ViewParams {
        self.params.get()
    }

    /// Returns `false` when `window` is already selected; nothing is refetched then.
    pub fn select_window(&self, window: TimeWindow) -> bool {
        let current = self.params.get();
        if current.window == window {
            return false;
        }
        self.params.set(ViewParams { window, ..current });
        self.poller.set_window(window);
        true
    }

    pub fn set_live(&self, live: LiveMode) -> bool {
        let current = self.params.get();
        if current.live == live {
            return false;
        }
        self.params.set(ViewParams { live, ..current });
        self.poller.set_live(live);
        true
    }

    pub fn toggle_live(&self) -> LiveMode {
        let next = self.params.get().live.toggled();
        self.set_live(next);
        next
    }

    pub fn stop(&self) {
        self.poller.stop();
    }
}
