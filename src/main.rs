//! Rock Drift headless host
//!
//! Drives the simulation with a scripted pilot at a steady 60 Hz and prints
//! a JSON summary. Handy for replaying a seed or soak-testing a config.

#[cfg(not(target_arch = "wasm32"))]
const CLI_HELP: &str = "\
usage: rock-drift [--config=PATH] [--cap-policy=P] [--seed=N] [--frames=N] [--width=W] [--height=H]

  --config=PATH   JSON tuning file (missing fields use defaults)
  --cap-policy=P  burst | reject, overrides the config file
  --seed=N        RNG seed (default 1)
  --frames=N      frames to simulate (default 3600)
  --width=W       arena width (default 800)
  --height=H      arena height (default 600)

Set RUST_LOG=debug for per-event output.";

#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, serde::Serialize)]
struct RunSummary {
    seed: u64,
    frames: u64,
    ticks: u64,
    clock_ms: f64,
    score: f64,
    lives: u32,
    obstacles: usize,
    obstacles_destroyed: usize,
    craft_losses: usize,
    game_over: bool,
}

#[cfg(not(target_arch = "wasm32"))]
fn arg_value<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.iter().find_map(|arg| arg.strip_prefix(name))
}

#[cfg(not(target_arch = "wasm32"))]
fn parse_arg<T: std::str::FromStr>(args: &[String], name: &str, default: T) -> Result<T, String> {
    match arg_value(args, name) {
        Some(raw) => raw.parse().map_err(|_| format!("invalid value for {name}{raw}")),
        None => Ok(default),
    }
}

/// Keys the scripted pilot holds on a given frame
#[cfg(not(target_arch = "wasm32"))]
fn pilot_keys(frame: u64) -> &'static [&'static str] {
    match frame % 120 {
        0..=19 => &["ArrowLeft", " "],
        20..=39 => &["ArrowUp"],
        40..=59 => &[" "],
        60..=79 => &["a"],
        80..=89 => &["w", "Spacebar"],
        _ => &[],
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn run(args: &[String]) -> Result<RunSummary, Box<dyn std::error::Error>> {
    use rock_drift::sim::{FrameClock, SimEvent, SimulationState, tick};
    use rock_drift::{CapPolicy, InputState, SimConfig};

    let seed: u64 = parse_arg(args, "--seed=", 1)?;
    let frames: u64 = parse_arg(args, "--frames=", 3600)?;
    let width: f32 = parse_arg(args, "--width=", 800.0)?;
    let height: f32 = parse_arg(args, "--height=", 600.0)?;

    let mut config = match arg_value(args, "--config=") {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    if let Some(raw) = arg_value(args, "--cap-policy=") {
        config.cap_policy = raw.parse::<CapPolicy>()?;
    }
    log::info!("Cap policy: {}", config.cap_policy.as_str());

    let mut state = SimulationState::new(config, width, height, seed)?;
    let mut clock = FrameClock::default();
    let mut input = InputState::new();

    let mut obstacles_destroyed = 0;
    let mut craft_losses = 0;
    let mut held: &[&str] = &[];
    let mut frame = 0;
    while frame < frames {
        // Only transitions reach the input tracker, as from a real keyboard
        let keys = pilot_keys(frame);
        for key in held.iter().filter(|k| !keys.contains(*k)) {
            input.key_up(key);
        }
        for key in keys.iter().filter(|k| !held.contains(*k)) {
            input.key_down(key);
        }
        held = keys;

        let now_ms = frame as f64 * rock_drift::consts::NOMINAL_FRAME_MS;
        let frame_ms = clock.frame(now_ms);
        tick(&mut state, &input.intent(), frame_ms);

        for event in state.events() {
            match event {
                SimEvent::ObstacleDestroyed { .. } => obstacles_destroyed += 1,
                SimEvent::CraftDestroyed { .. } => craft_losses += 1,
                _ => {}
            }
            log::debug!("frame {}: {:?}", frame, event);
        }

        frame += 1;
        if state.is_game_over() {
            break;
        }
    }

    Ok(RunSummary {
        seed,
        frames: frame,
        ticks: state.time_ticks,
        clock_ms: state.clock_ms,
        score: state.score(),
        lives: state.lives(),
        obstacles: state.obstacles().len(),
        obstacles_destroyed,
        craft_losses,
        game_over: state.is_game_over(),
    })
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--help") {
        println!("{}", CLI_HELP);
        return;
    }

    log::info!("Rock Drift (headless) starting...");
    match run(&args) {
        Ok(summary) => match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                log::error!("Failed to encode summary: {}", e);
                std::process::exit(1);
            }
        },
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Web hosts drive `rock_drift::sim::tick` from their own frame callback
}
