use chrono::{Local, Utc};
use leptos::prelude::*;

use housecup_shared::{BAR_CEILING, HOUSES, LeaderboardRow, TimeWindow, build_leaderboard};

use crate::config;
use crate::controller::{ViewController, ViewParams};
use crate::format::{format_clock, format_points};
use crate::poller::ScoreSnapshot;
use crate::runtime::browser_context;

#[derive(Clone, Copy)]
pub(crate) struct LatestSnapshot(pub RwSignal<Option<ScoreSnapshot>>);

/// Root component. Owns the view controller for the lifetime of the mount.
#[component]
pub fn App() -> impl IntoView {
    let params: RwSignal<ViewParams> = RwSignal::new(ViewParams::default());
    // Written only by the retrieval completion handler.
    let snapshot: RwSignal<Option<ScoreSnapshot>> = RwSignal::new(None);
    let controller = StoredValue::new_local(None::<ViewController>);
    let mounted_at = Utc::now();

    provide_context(LatestSnapshot(snapshot));

    // Start polling on mount; stop on unmount.
    Effect::new(move || {
        let view_controller = ViewController::start(
            browser_context(&config::api_base(), config::poll_config()),
            params.get_untracked(),
            move |next| snapshot.set(Some(next)),
            |err| {
                web_sys::console::warn_1(&format!("Error fetching points: {err}").into());
            },
        );
        controller.set_value(Some(view_controller));
        on_cleanup(move || {
            controller.update_value(|slot| {
                if let Some(view_controller) = slot.take() {
                    view_controller.stop();
                }
            });
        });
    });

    let select_window = move |window: TimeWindow| {
        let next = controller.with_value(|slot| {
            slot.as_ref().map(|c| {
                c.select_window(window);
                c.params()
            })
        });
        if let Some(next) = next {
            params.set(next);
        }
    };

    let toggle_live = move || {
        let next = controller.with_value(|slot| {
            slot.as_ref().map(|c| {
                c.toggle_live();
                c.params()
            })
        });
        if let Some(next) = next {
            params.set(next);
        }
    };

    let last_updated = move || {
        let at = snapshot
            .get()
            .map_or(mounted_at, |current| current.retrieved_at);
        format_clock(&at.with_timezone(&Local))
    };

    view! {
        <div class="App">
            <Header />
            <div class="controls-container">
                <div class="controls">
                    <div class="time-windows">
                        <h3>"Time Period"</h3>
                        <div class="button-group">
                            {TimeWindow::ALL
                                .into_iter()
                                .map(|window| {
                                    view! {
                                        <button
                                            class:active=move || params.get().window == window
                                            on:click=move |_| select_window(window)
                                        >
                                            {window.label()}
                                        </button>
                                    }
                                })
                                .collect_view()}
                        </div>
                    </div>
                    <div class="live-control">
                        <h3>"Live Updates"</h3>
                        <button
                            class:active=move || params.get().live.is_active()
                            on:click=move |_| toggle_live()
                        >
                            <span class="status-indicator"></span>
                            {move || params.get().live.toggle_label()}
                        </button>
                        <div class="last-updated">"Updated: " {last_updated}</div>
                    </div>
                </div>
            </div>
            <Leaderboard selected=Signal::derive(move || params.get().window) />
            <div class="footer">
                <p>"Hogwarts School of Witchcraft and Wizardry"</p>
            </div>
        </div>
    }
}

#[component]
fn Header() -> impl IntoView {
    view! {
        <div class="header-container">
            <header class="App-header">
                <div class="title-container">
                    <h1>"Hogwarts House Cup"</h1>
                    <div class="subtitle">"Leaderboard"</div>
                </div>
                <div class="house-symbols">
                    {HOUSES
                        .iter()
                        .map(|house| view! { <div class="symbol">{house.symbol}</div> })
                        .collect_view()}
                </div>
            </header>
        </div>
    }
}

/// Ranked rows, rebuilt from the latest snapshot whenever it changes.
///
/// Rows stay visible while a different window is loading; the container is
/// marked `stale` until a snapshot for the selected window arrives.
#[component]
fn Leaderboard(#[prop(into)] selected: Signal<TimeWindow>) -> impl IntoView {
    let LatestSnapshot(snapshot) = expect_context();
    let stale = move || {
        snapshot
            .get()
            .is_some_and(|current| current.window != selected.get())
    };

    let rows = Memo::new(move |_| {
        let scores = snapshot.get().map(|current| current.scores);
        build_leaderboard(&HOUSES, scores.as_ref())
    });

    view! {
        <div class="leaderboard-container" class:stale=stale>
            <div class="leaderboard-header">
                <div class="header-position">"Rank"</div>
                <div class="header-house">"House"</div>
                <div class="header-points">"Points"</div>
                <div class="header-progress">"Progress"</div>
            </div>
            <div class="leaderboard">
                {move || rows.get().into_iter().map(house_row).collect_view()}
            </div>
        </div>
    }
}

fn house_row(row: LeaderboardRow<'static>) -> impl IntoView {
    let width = format!("{:.2}%", row.bar_width_percent(BAR_CEILING));
    view! {
        <div class="house-row">
            <div class="position">
                <div class="position-number">{row.rank}</div>
                {row.is_leader().then(|| view! { <div class="trophy">"\u{1F3C6}"</div> })}
            </div>
            <div class="house-info">
                <div class="house-name">{row.house.display_name}</div>
                <div class="house-symbol">{row.house.symbol}</div>
            </div>
            <div class="house-points">{format_points(row.score)}</div>
            <div class="house-bar">
                <div class="bar-fill" style:width=width></div>
                <div class="bar-background"></div>
            </div>
        </div>
    }
}
