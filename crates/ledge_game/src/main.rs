//! Ledge headless runner
//!
//! Loads a game config, builds its level and plays the configured input
//! script through the frame pipeline.
//!
//! Run with: cargo run --bin ledge -- assets/game.toml

use ledge_game::prelude::*;
use ledge_input::InputService;
use std::process::ExitCode;

const DEFAULT_CONFIG: &str = "assets/game.toml";

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    let config = GameConfig::load_or_default(&config_path);

    match run(config) {
        Ok(summary) => {
            println!("{}", summary);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(config: GameConfig) -> Result<RunSummary, EngineError> {
    let input = open_input(&config);
    let audio = ledge_audio::open_default();

    let mut engine = Engine::new(config, input, audio);
    engine.awake()?;
    engine.start()?;
    let summary = engine.run();
    engine.clean_up()?;
    summary
}

fn open_input(config: &GameConfig) -> Box<dyn InputService> {
    let script = match config.resolve(&config.paths.input_script) {
        Some(path) => InputScript::load(&path).unwrap_or_else(|e| {
            log::warn!("{}; running without input", e);
            InputScript::default()
        }),
        None => InputScript::default(),
    };
    log::info!("Input script: {} frames", script.frame_count());
    Box::new(ScriptedInput::new(script))
}
