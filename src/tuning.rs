//! Data-driven game balance
//!
//! Every gameplay constant the simulation reads lives here so a level pack
//! or a debug console can override them without a rebuild. Missing JSON
//! fields fall back to the values in [`crate::consts`].

use serde::{Deserialize, Serialize};

use crate::SimError;
use crate::consts::*;

/// Physics and rules parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Kinematics ===
    pub gravity: f32,
    pub move_accel: f32,
    pub jump_velocity: f32,
    /// Multiplier on vy when jump is released mid-rise (variable jump height)
    pub jump_cut: f32,
    pub ground_friction: f32,
    pub air_friction: f32,
    pub running_threshold: f32,

    // === Collision ===
    pub collision_padding: f32,
    pub player_width: f32,
    pub player_height: f32,

    // === Rules ===
    pub starting_lives: u32,
    /// Falling past this y costs a life
    pub world_height: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            move_accel: MOVE_ACCEL,
            jump_velocity: JUMP_VELOCITY,
            jump_cut: JUMP_CUT,
            ground_friction: GROUND_FRICTION,
            air_friction: AIR_FRICTION,
            running_threshold: RUNNING_THRESHOLD,

            collision_padding: COLLISION_PADDING,
            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,

            starting_lives: STARTING_LIVES,
            world_height: WORLD_HEIGHT,
        }
    }
}

impl Tuning {
    /// Parse tuning overrides; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        log::info!("Loaded tuning overrides");
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
