//! Demo/soak-test pilot
//!
//! Generates plausible input from a seeded RNG: hold a direction for a while
//! (biased toward the goal side), hop now and then with a random hold length.
//! The same seed always produces the same input for the same game states.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::input::TickInput;
use super::state::GameState;

#[derive(Debug, Clone)]
pub struct Autopilot {
    seed: u64,
    rng: Pcg32,
    /// -1 left, 0 idle, 1 right
    direction: i8,
    /// Ticks left before picking a new direction
    hold_ticks: u32,
    /// Ticks left to keep jump held
    jump_ticks: u32,
}

impl Autopilot {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            direction: 0,
            hold_ticks: 0,
            jump_ticks: 0,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Input for the next tick of `state`
    pub fn next_input(&mut self, state: &GameState) -> TickInput {
        if self.hold_ticks == 0 {
            self.direction = match self.rng.random_range(0..10) {
                0..=1 => -1,
                2 => 0,
                _ => 1,
            };
            self.hold_ticks = self.rng.random_range(10..60);
        }
        self.hold_ticks -= 1;

        let mut input = TickInput {
            move_left: self.direction < 0,
            move_right: self.direction > 0,
            ..Default::default()
        };

        if self.jump_ticks > 0 {
            self.jump_ticks -= 1;
            if self.jump_ticks == 0 {
                input.jump_released = true;
            } else {
                input.jump_pressed = true;
            }
        } else if state.player.grounded && self.rng.random_bool(0.08) {
            // Short taps give hops, long holds full jumps
            self.jump_ticks = self.rng.random_range(2..40);
            input.jump_pressed = true;
        }

        input
    }
}
