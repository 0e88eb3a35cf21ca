use clap::Parser;
use wasm_bindgen::prelude::*;

mod game;
mod settings;
mod theme;
mod utils;

/// Element the board mounts into; the host page must provide it.
const MOUNT_ELEMENT_ID: &str = "memorita";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,
}

#[wasm_bindgen(start)]
pub fn run_app() {
    use gloo::utils::{document, window};

    #[cfg(feature = "console_error_panic_hook")]
    {
        console_error_panic_hook::set_once();
    }

    // Launch flags ride in the URL hash, e.g. `index.html#-v&--seed=42`.
    let location_hash = window()
        .location()
        .hash()
        .unwrap_or_else(|_| "".to_string());

    let args = Args::try_parse_from(location_hash.split(['#', '&']))
        .expect("unparseable launch flags in the URL hash");
    if let Some(log_level) = args.verbose.log_level() {
        console_log::init_with_level(log_level).expect("logger is already set up");
    }
    log::debug!("seed: {:?}", args.seed);

    theme::Theme::init();

    let root = document()
        .get_element_by_id(MOUNT_ELEMENT_ID)
        .expect("host page is missing the memorita mount element");

    log::debug!("memorita started");
    yew::Renderer::<game::GameView>::with_root_and_props(root, game::GameProps { seed: args.seed })
        .render();
}
