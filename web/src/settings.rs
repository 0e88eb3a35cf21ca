use crate::utils::*;
use memorita_core as game;
use serde::{Deserialize, Serialize};
use yew::prelude::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct Settings {
    pub difficulty: game::Difficulty,
}

impl StorageKey for Settings {
    const KEY: &'static str = "memorita:settings:v1";
}

const LEVELS: [(game::Difficulty, &str); 3] = [
    (game::Difficulty::Easy, "Easy"),
    (game::Difficulty::Medium, "Medium"),
    (game::Difficulty::Hard, "Hard"),
];

#[derive(Properties, PartialEq)]
pub(crate) struct DifficultyPickerProps {
    pub current: game::Difficulty,
    pub onselect: Callback<game::Difficulty>,
}

#[function_component(DifficultyPicker)]
pub(crate) fn difficulty_picker(props: &DifficultyPickerProps) -> Html {
    html! {
        <div class="difficulty">
            {
                for LEVELS.iter().map(|&(level, label)| {
                    let onclick = {
                        let onselect = props.onselect.clone();
                        Callback::from(move |_: MouseEvent| onselect.emit(level))
                    };
                    let class = classes!(
                        "diff-btn",
                        (props.current == level).then_some("active"),
                    );
                    html! {
                        <button {class} {onclick}>{label}</button>
                    }
                })
            }
        </div>
    }
}
