use enum_map::Enum;
use facelet::executor::{Frame, MoveObserver, Settled};
use facelet::preferences::Preferences;
use facelet::{Color, FaceletState, Session};
use log::{debug, info};
use std::time::Duration;

const SESSION_PATH: &str = "./session.json";

/// Logs what the executor does; a renderer would draw here instead.
struct Logger {
    settled: usize,
}

impl MoveObserver for Logger {
    fn on_frame(&mut self, frame: &Frame) {
        debug!("{} {}/{} at {:?}", frame.twist, frame.step, frame.steps, frame.angle);
    }

    fn on_settle(&mut self, settled: &Settled) {
        self.settled += 1;
        info!("settled {} ({} so far)", settled.twist, self.settled);
    }

    fn on_drained(&mut self) {
        info!("queue drained");
    }
}

fn main() -> eyre::Result<()> {
    env_logger::init();

    let prefs = Preferences::load()?;
    let mut session = Session::new(FaceletState::solved(), prefs.animation.quarter_turn_steps);

    // any arguments are twists to play, otherwise scramble
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        let twists = session
            .scramble(&mut rand::thread_rng(), prefs.scramble.length)
            .unwrap_or_default();
        println!(
            "scramble: {}",
            twists.iter().map(|t| t.to_string()).collect::<Vec<_>>().join(" ")
        );
    } else {
        session.enqueue_notation(&args)?;
    }

    let mut logger = Logger { settled: 0 };
    let interval = Duration::from_millis(prefs.animation.frame_interval_ms);
    while !session.is_idle() {
        session.tick(&mut logger);
        std::thread::sleep(interval);
    }

    println!("{}", session.facelets());
    for i in 0..Color::LENGTH {
        let color = Color::from_usize(i);
        println!("{} {}", color.letter(), prefs.colors.hex_of(Some(color)));
    }
    println!("solved: {}", session.puzzle().is_solved());

    session.save(SESSION_PATH)?;
    Ok(())
}
