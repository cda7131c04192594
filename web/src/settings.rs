use crate::utils::*;
use concentration_core as game;
use serde::{Deserialize, Serialize};
use yew::prelude::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    pub grid_size: game::GridSize,
    pub difficulty: game::Difficulty,
}

impl Settings {
    pub(crate) fn game_config(self) -> game::GameConfig {
        game::GameConfig::new(self.grid_size, self.difficulty)
    }
}

impl StorageKey for Settings {
    const KEY: &'static str = "concentration:settings:v1";
}

#[derive(Properties, PartialEq)]
pub(crate) struct SettingsProps {
    pub settings: Settings,
    /// Settings are locked while a round is running.
    #[prop_or_default]
    pub locked: bool,
    pub on_grid_size: Callback<game::GridSize>,
    pub on_difficulty: Callback<game::Difficulty>,
}

#[function_component]
pub(crate) fn SettingsView(props: &SettingsProps) -> Html {
    let SettingsProps {
        settings,
        locked,
        on_grid_size,
        on_difficulty,
    } = props;

    html! {
        <nav class="settings">
            <ul role="tablist" aria-label="grid size">
                {
                    for game::GridSize::ALL.into_iter().map(|grid_size| {
                        let onclick = on_grid_size.reform(move |_: MouseEvent| grid_size);
                        let selected = settings.grid_size == grid_size;
                        html! {
                            <li>
                                <button
                                    role="tab"
                                    class={classes!(selected.then_some("selected"))}
                                    aria-selected={selected.to_string()}
                                    disabled={*locked}
                                    {onclick}
                                >
                                    {grid_size.label().replace('x', " x ")}
                                </button>
                            </li>
                        }
                    })
                }
            </ul>
            <ul aria-label="difficulty">
                {
                    for game::Difficulty::ALL.into_iter().map(|difficulty| {
                        let onclick = on_difficulty.reform(move |_: MouseEvent| difficulty);
                        let selected = settings.difficulty == difficulty;
                        html! {
                            <li>
                                <button
                                    class={classes!(selected.then_some("selected"))}
                                    disabled={*locked}
                                    {onclick}
                                >
                                    {difficulty.label()}
                                </button>
                            </li>
                        }
                    })
                }
            </ul>
        </nav>
    }
}
