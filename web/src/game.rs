use crate::leaderboard::{self, LeaderboardView};
use crate::settings::{self, SettingsView};
use crate::utils::*;
use clap::Args;
use concentration_core as game;
use gloo::timers::callback::Interval;
use std::time::Duration;
use web_sys::HtmlInputElement;
use web_time::Instant;
use yew::prelude::*;

#[derive(Copy, Clone, Debug, PartialEq)]
enum ViewCellState {
    Hidden,
    Revealed(game::PairValue),
    Matched(game::PairValue),
}

impl From<game::Cell> for ViewCellState {
    fn from(cell: game::Cell) -> Self {
        match cell {
            game::Cell { disabled: true, value, .. } => Self::Matched(value),
            game::Cell { revealed: true, value, .. } => Self::Revealed(value),
            _ => Self::Hidden,
        }
    }
}

fn status_message(state: game::RoundState) -> &'static str {
    use game::RoundState::*;
    match state {
        Ready => "Press start when ready",
        Active => "Find all the pairs",
        Won => "You found every pair!",
        TimedOut => "Time's up! You didn't find all pairs.",
        Lost => "You lost! The numbers didn't match.",
        Abandoned => "Round ended",
    }
}

fn state_class(state: game::RoundState) -> &'static str {
    use game::RoundState::*;
    match state {
        Ready => "not-started",
        Active => "in-progress",
        Won => "win",
        TimedOut | Lost => "lose",
        Abandoned => "ended",
    }
}

/// A won round may add its time once, and only if the time makes the board.
fn score_recordable(
    state: game::RoundState,
    round: u32,
    recorded_round: Option<u32>,
    leaderboard: &game::Leaderboard,
    elapsed_secs: u32,
) -> bool {
    matches!(state, game::RoundState::Won)
        && recorded_round != Some(round)
        && leaderboard.qualifies(elapsed_secs)
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    CellClick(game::Coord2),
    Tick,
    Start,
    End,
    ChangeGridSize(game::GridSize),
    ChangeDifficulty(game::Difficulty),
    UpdateName(String),
    SubmitScore,
}

#[derive(Properties, Clone, PartialEq)]
struct CellProps {
    row: game::Coord,
    col: game::Coord,
    cell_state: ViewCellState,
    #[prop_or_default]
    locked: bool,
    callback: Callback<game::Coord2>,
}

#[function_component(CellView)]
fn cell_component(props: &CellProps) -> Html {
    use ViewCellState::*;

    let CellProps {
        row,
        col,
        cell_state,
        locked,
        callback,
    } = props.clone();

    let mut class = classes!(
        "cell",
        match cell_state {
            Hidden => classes!(),
            Revealed(_) => classes!("open"),
            Matched(_) => classes!("open", "matched"),
        }
    );
    if locked {
        class.push("locked");
    }

    let onclick = Callback::from(move |_: MouseEvent| {
        log::trace!("({}, {}) click", row, col);
        callback.emit((row, col));
    });

    html! {
        <td {class} {onclick}>
            {
                match cell_state {
                    Hidden => html! {},
                    Revealed(value) | Matched(value) => html! { <span>{value.to_string()}</span> },
                }
            }
        </td>
    }
}

#[derive(Args, Properties, Debug, Clone, PartialEq)]
pub(crate) struct GameProps {
    /// Force a seed instead of random
    #[arg(short, long)]
    #[prop_or_default]
    pub seed: Option<u64>,

    /// Grid size to start with, one of 4x4, 6x6, 8x8
    #[arg(long)]
    #[prop_or_default]
    pub size: Option<game::GridSize>,

    /// Difficulty to start with, one of relaxed, normal, sudden-death
    #[arg(long)]
    #[prop_or_default]
    pub difficulty: Option<game::Difficulty>,
}

#[derive(Debug)]
pub(crate) struct GameView {
    settings: settings::Settings,
    session: game::Session,
    leaderboard: game::Leaderboard,
    origin: Instant,
    player_name: String,
    recorded_round: Option<u32>,
    last_rank: Option<usize>,
    _timer_interval: Interval,
}

impl GameView {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn create_timer(ctx: &Context<Self>) -> Interval {
        let link = ctx.link().clone();
        Interval::new(250, move || link.send_message(Msg::Tick))
    }

    fn can_submit_score(&self) -> bool {
        score_recordable(
            self.session.state(),
            self.session.round(),
            self.recorded_round,
            &self.leaderboard,
            self.session.elapsed_secs(),
        )
    }

    fn submit_score(&mut self) -> bool {
        if !self.can_submit_score() {
            return false;
        }

        let name = leaderboard::player_name(&self.player_name);
        let time = self.session.elapsed_secs();
        self.last_rank = self.leaderboard.record(name, time);
        self.recorded_round = Some(self.session.round());
        self.leaderboard.local_save();
        log::info!("recorded {}s at rank {:?}", time, self.last_rank);
        true
    }

    fn view_grid(&self, ctx: &Context<Self>) -> Html {
        let (rows, cols) = self.session.size();
        let is_active = self.session.is_active();
        let callback = ctx.link().callback(Msg::CellClick);

        html! {
            <table class={classes!("grid", is_active.then_some("playable"))}>
                {
                    for (0..rows).map(|row| html! {
                        <tr>
                            {
                                for (0..cols).map(|col| {
                                    let cell = self.session.cell_at((row, col));
                                    let cell_state = ViewCellState::from(cell);
                                    let locked = !is_active || !cell.is_selectable();
                                    let callback = callback.clone();
                                    html! {
                                        <CellView {row} {col} {cell_state} {locked} {callback}/>
                                    }
                                })
                            }
                        </tr>
                    })
                }
            </table>
        }
    }

    fn view_score_form(&self, ctx: &Context<Self>) -> Html {
        if !self.can_submit_score() {
            return html! {};
        }

        let onsubmit = ctx.link().callback(|e: SubmitEvent| {
            e.prevent_default();
            Msg::SubmitScore
        });
        let oninput = ctx.link().callback(|e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            Msg::UpdateName(input.value())
        });

        html! {
            <form class="score" {onsubmit}>
                <label>
                    {format!("Your time: {}. Enter your name", format_time(self.session.elapsed_secs()))}
                    <input type="text" maxlength="32" value={self.player_name.clone()} {oninput}/>
                </label>
                <button type="submit">{"Submit"}</button>
            </form>
        }
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let props = ctx.props();

        let mut settings: settings::Settings = LocalOrDefault::local_or_default();
        if let Some(grid_size) = props.size {
            settings.grid_size = grid_size;
        }
        if let Some(difficulty) = props.difficulty {
            settings.difficulty = difficulty;
        }

        let seed = props.seed.unwrap_or_else(js_random_seed);
        log::debug!("seed: {}, settings: {:?}", seed, settings);

        Self {
            settings,
            session: game::Session::new(settings.game_config(), seed),
            leaderboard: LocalOrDefault::local_or_default(),
            origin: Instant::now(),
            player_name: String::new(),
            recorded_round: None,
            last_rank: None,
            _timer_interval: GameView::create_timer(ctx),
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        let now = self.now();
        match msg {
            CellClick(pos) => match self.session.click(pos, now) {
                Ok(outcome) => {
                    log::debug!("click {:?}: {:?}", pos, outcome);
                    outcome.has_update() || self.session.has_pending_events()
                }
                Err(err) => {
                    log::warn!("click {:?} rejected: {}", pos, err);
                    self.session.has_pending_events()
                }
            },
            Tick => {
                let events = self.session.advance(now);
                for event in &events {
                    log::trace!("session event: {:?}", event);
                }
                !events.is_empty()
            }
            Start => {
                let started = self.session.start(now);
                if started {
                    self.last_rank = None;
                }
                started || self.session.has_pending_events()
            }
            End => self.session.end(now) || self.session.has_pending_events(),
            ChangeGridSize(grid_size) => {
                let events = self.session.advance(now);
                let changed = self.session.change_grid_size(grid_size);
                if changed {
                    self.settings.grid_size = grid_size;
                    self.settings.local_save();
                }
                changed || !events.is_empty()
            }
            ChangeDifficulty(difficulty) => {
                let events = self.session.advance(now);
                let changed = self.session.change_difficulty(difficulty);
                if changed {
                    self.settings.difficulty = difficulty;
                    self.settings.local_save();
                }
                changed || !events.is_empty()
            }
            UpdateName(name) => {
                self.player_name = name;
                false
            }
            SubmitScore => self.submit_score(),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        use Msg::*;

        let state = self.session.state();
        let is_active = self.session.is_active();
        let time_left = format_time(self.session.time_remaining_secs());
        let pairs = format!(
            "{} / {}",
            self.session.matched_values().len(),
            self.session.total_pairs()
        );

        let cb_start = ctx.link().callback(|_: MouseEvent| Start);
        let cb_end = ctx.link().callback(|_: MouseEvent| End);

        html! {
            <div class={classes!("concentration", state_class(state))}>
                <SettingsView
                    settings={self.settings}
                    locked={is_active}
                    on_grid_size={ctx.link().callback(ChangeGridSize)}
                    on_difficulty={ctx.link().callback(ChangeDifficulty)}
                />
                <nav>
                    <button onclick={cb_start} disabled={is_active}>{"Start"}</button>
                    <aside>{format!("Time left: {}", time_left)}</aside>
                    <aside>{pairs}</aside>
                    <button onclick={cb_end} disabled={!is_active}>{"End"}</button>
                </nav>
                <p class="status">{status_message(state)}</p>
                {self.view_grid(ctx)}
                {self.view_score_form(ctx)}
                <LeaderboardView leaderboard={self.leaderboard.clone()} highlight={self.last_rank}/>
            </div>
        }
    }
}
