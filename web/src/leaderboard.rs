use crate::utils::*;
use concentration_core as game;
use yew::prelude::*;

impl StorageKey for game::Leaderboard {
    const KEY: &'static str = "concentration:leaderboard:v1";
}

/// Name stored for players who leave the field empty.
pub(crate) const ANONYMOUS: &str = "anonymous";

pub(crate) fn player_name(input: &str) -> String {
    let name = input.trim();
    if name.is_empty() {
        ANONYMOUS.to_string()
    } else {
        name.chars().take(32).collect()
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct LeaderboardProps {
    pub leaderboard: game::Leaderboard,
    /// Row to highlight, usually the player's fresh entry.
    #[prop_or_default]
    pub highlight: Option<usize>,
}

#[function_component]
pub(crate) fn LeaderboardView(props: &LeaderboardProps) -> Html {
    let entries = props.leaderboard.entries();

    html! {
        <aside class="leaderboard">
            <h2>{"Best times"}</h2>
            if entries.is_empty() {
                <p>{"No results yet"}</p>
            } else {
                <ol>
                    {
                        for entries.iter().enumerate().map(|(rank, entry)| html! {
                            <li class={classes!((props.highlight == Some(rank)).then_some("mine"))}>
                                <span>{entry.name.clone()}</span>
                                <time>{format_time(entry.time)}</time>
                            </li>
                        })
                    }
                </ol>
            }
        </aside>
    }
}
