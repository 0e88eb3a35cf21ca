use crate::settings::{DifficultyPicker, Settings};
use crate::theme::Theme;
use crate::utils::*;
use gloo::timers::callback::Interval;
use memorita_core as game;
use web_time::Instant;
use yew::prelude::*;

/// How often the real interval feeds elapsed time into the engine's virtual
/// clock. Finer than a second so second boundaries don't visibly drift.
const DRIVE_INTERVAL_MS: u32 = 250;

fn format_clock(minutes: u32, seconds: u32) -> String {
    format!("{:02}:{:02}", minutes, seconds)
}

fn card_classes(state: game::CardState) -> Classes {
    use game::CardState::*;
    classes!(
        "card",
        match state {
            Hidden => classes!(),
            Flipped => classes!("flipped"),
            Matched => classes!("flipped", "matched"),
        }
    )
}

#[derive(Properties, Clone, PartialEq)]
struct CardProps {
    position: game::Position,
    symbol: game::Symbol,
    state: game::CardState,
    callback: Callback<game::Position>,
}

#[function_component(CardView)]
fn card_component(props: &CardProps) -> Html {
    let CardProps {
        position,
        symbol,
        state,
        callback,
    } = props.clone();

    let class = card_classes(state);
    let onclick = Callback::from(move |_: MouseEvent| {
        log::trace!("card {} clicked", position);
        callback.emit(position);
    });

    html! {
        <div {class} {onclick}>
            <div class="card-back"><i class="fas fa-question"/></div>
            <div class="card-front">{ symbol.to_string() }</div>
        </div>
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    Drive,
    Start,
    Reset,
    Hint,
    CardClicked(game::Position),
    SelectDifficulty(game::Difficulty),
    ToggleTheme,
}

#[derive(Properties, Clone, Debug, PartialEq)]
pub(crate) struct GameProps {
    /// Force a seed instead of random
    #[prop_or_default]
    pub seed: Option<u64>,
}

#[derive(Debug)]
pub(crate) struct GameView {
    settings: Settings,
    engine: game::GameEngine,
    theme: Theme,
    summary: Option<game::GameSummary>,
    last_drive: Instant,
    _driver: Interval,
}

impl GameView {
    fn create_driver(ctx: &Context<Self>) -> Interval {
        let link = ctx.link().clone();
        Interval::new(DRIVE_INTERVAL_MS, move || link.send_message(Msg::Drive))
    }

    /// Applies the engine's notifications; returns whether anything the view
    /// shows changed.
    fn pump_events(&mut self) -> bool {
        let mut updated = false;
        for event in self.engine.drain_events() {
            log::trace!("game event: {:?}", event);
            if let game::GameEvent::GameEnded(summary) = event {
                self.summary = Some(summary);
            }
            updated = true;
        }
        updated
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let settings: Settings = LocalOrDefault::local_or_default();
        let seed = ctx.props().seed.unwrap_or_else(js_random_seed);
        Self {
            engine: game::GameEngine::new(settings.difficulty, seed),
            settings,
            theme: LocalOrDefault::local_or_default(),
            summary: None,
            last_drive: Instant::now(),
            _driver: Self::create_driver(ctx),
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            Drive => {
                let elapsed = self.last_drive.elapsed().as_millis() as game::Millis;
                self.last_drive = Instant::now();
                self.engine.advance_time(elapsed);
                self.pump_events()
            }
            Start => {
                self.engine.start();
                self.last_drive = Instant::now();
                self.pump_events()
            }
            Reset => {
                log::debug!("reset game");
                self.summary = None;
                self.engine.reset();
                self.pump_events();
                true
            }
            Hint => {
                let outcome = self.engine.hint();
                self.pump_events();
                outcome.has_update()
            }
            CardClicked(position) => match self.engine.flip(position) {
                Ok(outcome) => {
                    self.pump_events();
                    outcome.has_update()
                }
                Err(err) => {
                    log::warn!("flip rejected: {}", err);
                    false
                }
            },
            SelectDifficulty(level) => {
                if self.settings.difficulty == level {
                    return false;
                }
                log::debug!("difficulty: {:?}", level);
                self.settings.difficulty = level;
                self.settings.local_save();
                self.summary = None;
                self.engine.set_difficulty(level);
                self.pump_events();
                true
            }
            ToggleTheme => {
                self.theme = self.theme.toggled();
                Theme::apply(self.theme);
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        use Msg::*;

        let engine = &self.engine;
        let (minutes, seconds) = engine.clock();
        let clock_text = format_clock(minutes, seconds);
        let board_style = format!(
            "grid-template-columns: repeat({}, 1fr);",
            self.settings.difficulty.grid_columns()
        );

        let cb_start = ctx.link().callback(|_| Start);
        let cb_reset = ctx.link().callback(|_| Reset);
        let cb_hint = ctx.link().callback(|_| Hint);
        let cb_theme = ctx.link().callback(|_| ToggleTheme);
        let cb_difficulty = ctx.link().callback(SelectDifficulty);
        let cb_card = ctx.link().callback(CardClicked);

        let win_message = self.summary.map(|summary| {
            let cb_play_again = ctx.link().callback(|_| Reset);
            html! {
                <Modal>
                    <div class="win-message">
                        <article>
                            <h2>{"Congratulations!"}</h2>
                            <p>{format!("Time: {}", format_clock(summary.minutes, summary.seconds))}</p>
                            <p>{format!("Moves: {}", summary.moves)}</p>
                            <p>{format!("Score: {}", summary.score)}</p>
                            <button onclick={cb_play_again}>{"Play Again"}</button>
                        </article>
                    </div>
                </Modal>
            }
        });

        let year = js_sys::Date::new_0().get_full_year();

        html! {
            <div class="memorita">
                <small onclick={cb_theme}>{"◐"}</small>
                <nav>
                    <aside>{clock_text}</aside>
                    <aside>{format!("Moves: {}", engine.moves())}</aside>
                    <aside>{format!("Score: {}", engine.score())}</aside>
                    <aside>{format!("{}/{}", engine.matched_pairs(), engine.total_pairs())}</aside>
                </nav>
                <DifficultyPicker current={self.settings.difficulty} onselect={cb_difficulty}/>
                <menu>
                    <button onclick={cb_start} disabled={!engine.phase().is_ready()}>
                        { if engine.phase().is_ready() { "Start Game" } else { "Game Started" } }
                    </button>
                    <button onclick={cb_hint}>{"Hint"}</button>
                    <button onclick={cb_reset}>{"Reset"}</button>
                </menu>
                <div class="board" style={board_style}>
                    {
                        for engine.deck().iter().enumerate().map(|(index, card)| {
                            let position = index as game::Position;
                            html! {
                                <CardView
                                    {position}
                                    symbol={card.symbol}
                                    state={card.state}
                                    callback={cb_card.clone()}
                                />
                            }
                        })
                    }
                </div>
                { win_message }
                <footer><small>{format!("© {}", year)}</small></footer>
            </div>
        }
    }
}
