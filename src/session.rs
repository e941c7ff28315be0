//! Frame driver shared by the browser shell and the headless runner
//!
//! Owns the game state, the fixed-step clock, the pending input and the level
//! provider. The host calls [`Session::frame`] once per display refresh and
//! reads `state` to render.

use crate::SimError;
use crate::consts::SIM_DT;
use crate::sim::{
    FixedStepClock, GameEvent, GameState, InputLatch, LevelLibrary, LevelProvider, TickInput, tick,
};
use crate::tuning::Tuning;

pub struct Session<P: LevelProvider = LevelLibrary> {
    pub state: GameState,
    pub clock: FixedStepClock,
    pub input: InputLatch,
    levels: P,
}

impl<P: LevelProvider> Session<P> {
    pub fn new(levels: P, tuning: Tuning) -> Self {
        Self {
            state: GameState::new(tuning),
            clock: FixedStepClock::default(),
            input: InputLatch::new(),
            levels,
        }
    }

    /// Begin (or restart) a run from the first level
    pub fn start(&mut self) -> Result<(), SimError> {
        self.state.start_game(&self.levels)?;
        self.clock.clear();
        self.input.clear();
        Ok(())
    }

    pub fn next_level(&mut self) -> Result<(), SimError> {
        self.state.next_level(&self.levels)?;
        self.clock.clear();
        self.input.clear();
        Ok(())
    }

    pub fn toggle_pause(&mut self) -> bool {
        let changed = self.state.toggle_pause();
        self.clock.set_paused(!self.state.is_playing());
        changed
    }

    /// Run the ticks owed at display timestamp `timestamp_ms`.
    /// Returns how many ran.
    pub fn frame(&mut self, timestamp_ms: f64) -> u32 {
        self.clock.set_paused(!self.state.is_playing());
        let steps = self.clock.frame(timestamp_ms);
        self.run_steps(steps)
    }

    /// Same as [`Session::frame`] for callers that measure elapsed seconds
    pub fn advance(&mut self, elapsed: f64) -> u32 {
        self.clock.set_paused(!self.state.is_playing());
        let steps = self.clock.advance(elapsed);
        self.run_steps(steps)
    }

    /// Run one tick with explicit input, bypassing the clock and the latch
    pub fn step(&mut self, input: &TickInput) {
        tick(&mut self.state, input, SIM_DT);
    }

    fn run_steps(&mut self, steps: u32) -> u32 {
        let mut ran = 0;
        for _ in 0..steps {
            if !self.state.is_playing() {
                break;
            }
            let input = self.input.sample();
            tick(&mut self.state, &input, SIM_DT);
            ran += 1;
        }
        if ran > 1 {
            log::trace!("Caught up {} ticks", ran);
        }
        ran
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }
}
