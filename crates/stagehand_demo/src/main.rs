//! Demo host loop
//!
//! Drives a minimal intro → gameplay state set the way a real application
//! main loop would: register states up front, then tick/render once per
//! frame, reading the frame's events afterwards and switching activation in
//! response.
//!
//! Run with `RUST_LOG=debug` to watch the per-frame traffic.

use anyhow::Result;
use bytemuck::{Pod, Zeroable};
use clap::Parser;
use stagehand_core::{EventStream, State, StateCore, StateDispatcher};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Intro finished; payload is the elapsed intro time (`f32` seconds).
const INTRO_DONE: u32 = 1;
/// A score was banked; payload is a [`ScoreEvent`].
const SCORED: u32 = 2;

/// Payload for [`SCORED`] events.
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
#[repr(C)]
struct ScoreEvent {
    points: u32,
    combo: u32,
}

#[derive(Parser)]
#[command(name = "stagehand", about = "Stagehand dispatcher demo host")]
struct Args {
    /// Number of frames to simulate
    #[arg(long, default_value_t = 240)]
    frames: u32,

    /// Fixed per-frame delta time in seconds
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// How long the intro runs before handing over to gameplay
    #[arg(long, default_value_t = 1.0)]
    intro_secs: f32,
}

/// Splash screen stand-in: waits out its duration, then announces completion.
struct Intro {
    core: StateCore,
    remaining: f32,
    elapsed: f32,
}

impl Intro {
    fn new(duration: f32) -> Self {
        Self {
            core: StateCore::new("Intro"),
            remaining: duration,
            elapsed: 0.0,
        }
    }
}

impl State for Intro {
    fn identity_hash(&self) -> u32 {
        self.core.hash()
    }

    fn is_active(&self) -> bool {
        self.core.is_active()
    }

    fn activate(&mut self) {
        self.core.activate();
    }

    fn deactivate(&mut self) {
        self.core.deactivate();
    }

    fn tick(&mut self, dt: f32, events: &mut EventStream) {
        self.elapsed += dt;
        if self.remaining > 0.0 {
            self.remaining -= dt;
            if self.remaining <= 0.0 {
                events.push_value(INTRO_DONE, &self.elapsed).ok();
            }
        }
    }

    fn render(&mut self) {
        debug!(elapsed = self.elapsed, "intro frame");
    }
}

/// Gameplay stand-in: banks a score every half second of play.
struct Gameplay {
    core: StateCore,
    since_score: f32,
    combo: u32,
}

impl Gameplay {
    fn new() -> Self {
        Self {
            core: StateCore::new("Gameplay"),
            since_score: 0.0,
            combo: 0,
        }
    }
}

impl State for Gameplay {
    fn identity_hash(&self) -> u32 {
        self.core.hash()
    }

    fn is_active(&self) -> bool {
        self.core.is_active()
    }

    fn activate(&mut self) {
        self.core.activate();
    }

    fn deactivate(&mut self) {
        self.core.deactivate();
    }

    fn tick(&mut self, dt: f32, events: &mut EventStream) {
        self.since_score += dt;
        if self.since_score >= 0.5 {
            self.since_score = 0.0;
            self.combo += 1;
            let event = ScoreEvent {
                points: 100 * self.combo,
                combo: self.combo,
            };
            events.push_value(SCORED, &event).ok();
        }
    }

    fn render(&mut self) {
        debug!(combo = self.combo, "gameplay frame");
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut dispatcher = StateDispatcher::new();
    dispatcher.add(Intro::new(args.intro_secs));
    dispatcher.add(Gameplay::new());
    dispatcher.activate("Intro");

    let mut total_points: u64 = 0;

    for frame in 0..args.frames {
        dispatcher.tick(args.dt);
        dispatcher.render();

        if dispatcher.contains_event_type(INTRO_DONE) {
            // Find the completion record for its payload, then hand over.
            for index in 0..dispatcher.num_events() {
                if dispatcher.event_type(index)? == INTRO_DONE {
                    let elapsed: f32 = dispatcher.read_event(index)?;
                    info!(frame, elapsed, "intro done, switching to gameplay");
                }
            }
            dispatcher.deactivate("Intro");
            dispatcher.activate("Gameplay");
        }

        for index in 0..dispatcher.num_events() {
            if dispatcher.event_type(index)? == SCORED {
                let score: ScoreEvent = dispatcher.read_event(index)?;
                total_points += u64::from(score.points);
                info!(frame, score.points, score.combo, "scored");
            }
        }
    }

    info!(
        frames = args.frames,
        total_points,
        "simulation finished"
    );
    Ok(())
}
