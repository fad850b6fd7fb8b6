use log::info;
use relaysim::core::execution::TickOutcome;
use relaysim::{Mode, SimEvent, SimulationConfig, SimulationEngine, SimulationObserver};
use std::env;
use std::thread;
use std::time::{Duration, Instant};

/// Logs countdowns and mode changes; cell visuals are too chatty for a terminal
struct ConsoleObserver;

impl SimulationObserver for ConsoleObserver {
    fn on_event(&mut self, event: &SimEvent) {
        match event {
            SimEvent::Countdown { tag, remaining_secs, .. } => {
                info!("{} {}s", tag, remaining_secs)
            }
            SimEvent::CountdownCleared { tag, .. } => info!("{} countdown cleared", tag),
            SimEvent::ModeChanged { mode } => info!("Mode: {:?}", mode),
            SimEvent::CellVisual { .. } => {}
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp(None)
        .init();

    let mut args = env::args().skip(1);
    let board_path = args
        .next()
        .ok_or("usage: relaysim_headless <board-file> [seconds] [config.toml]")?;
    let seconds: u64 = args.next().map(|s| s.parse()).transpose()?.unwrap_or(5);
    let config = match args.next() {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };

    let fast = config.fast_tick();
    let slow = config.slow_tick();
    let mut engine = SimulationEngine::new(config);
    engine.add_observer(Box::new(ConsoleObserver));

    let size = engine.load_board(&board_path)?;
    info!("Loaded {}x{} board from {}", size, size, board_path);
    if !engine.comment().is_empty() {
        info!("Comment: {}", engine.comment());
    }
    engine.set_mode(Mode::Run)?;

    let start = Instant::now();
    let run_for = Duration::from_secs(seconds);
    let mut next_slow = start + slow;
    let mut last_lights = Vec::new();

    while start.elapsed() < run_for {
        engine.tick();
        if Instant::now() >= next_slow {
            if engine.timer_tick() == TickOutcome::Applied {
                next_slow += slow;
            } else {
                next_slow = Instant::now() + slow;
            }
        }

        let lights = engine.light_states();
        if lights != last_lights {
            for light in &lights {
                info!(
                    "{} ({:?}) at {}: {}",
                    light.tag,
                    light.color,
                    light.position,
                    if light.lit { "ON" } else { "off" }
                );
            }
            last_lights = lights;
        }
        thread::sleep(fast);
    }

    engine.set_mode(Mode::Edit)?;
    info!("Ran {} ticks in {:.1}s", engine.tick_count(), start.elapsed().as_secs_f64());
    Ok(())
}
