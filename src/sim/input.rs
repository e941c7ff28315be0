//! Player input
//!
//! Device adapters write into an [`InputLatch`] whenever events arrive. The
//! loop samples it once per tick into a [`TickInput`], which is all the
//! simulation ever sees.

use serde::{Deserialize, Serialize};

/// Commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    /// Jump requested this tick (the player ignores it while already held)
    pub jump_pressed: bool,
    /// Jump input went up since the last tick
    pub jump_released: bool,
}

/// Pending input written asynchronously by the device adapters
#[derive(Debug, Clone, Default)]
pub struct InputLatch {
    left_held: bool,
    right_held: bool,
    jump_held: bool,
    /// Jump went down since the last sample
    jump_down_edge: bool,
    /// Jump went up since the last sample
    jump_up_edge: bool,
}

impl InputLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_left(&mut self, held: bool) {
        self.left_held = held;
    }

    pub fn set_right(&mut self, held: bool) {
        self.right_held = held;
    }

    pub fn press_jump(&mut self) {
        if !self.jump_held {
            self.jump_down_edge = true;
        }
        self.jump_held = true;
    }

    pub fn release_jump(&mut self) {
        if self.jump_held {
            self.jump_up_edge = true;
        }
        self.jump_held = false;
    }

    /// Drop everything (focus lost, level change)
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Commands for the next tick. Edges are consumed; held keys persist.
    ///
    /// A held jump keeps requesting every tick so a press made mid-air
    /// lands as soon as the player is standing. A tap that went down and up
    /// between two samples still reports both.
    pub fn sample(&mut self) -> TickInput {
        let input = TickInput {
            move_left: self.left_held,
            move_right: self.right_held,
            jump_pressed: self.jump_held || self.jump_down_edge,
            jump_released: self.jump_up_edge,
        };
        self.jump_down_edge = false;
        self.jump_up_edge = false;
        input
    }
}
