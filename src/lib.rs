//! Skyhop - A side-scrolling browser platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (fixed-step loop, player kinematics, collisions)
//! - `session`: Frame driver tying the clock, input latch and levels together
//! - `tuning`: Data-driven physics and gameplay parameters

pub mod session;
pub mod sim;
pub mod tuning;

pub use session::Session;
pub use tuning::Tuning;

use thiserror::Error;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const TICK_SECONDS: f64 = 1.0 / 60.0;
    /// Tick length handed to the simulation
    pub const SIM_DT: f32 = TICK_SECONDS as f32;
    /// Longest wall-clock frame the loop will catch up on (seconds)
    pub const MAX_FRAME_TIME: f64 = 0.25;

    /// Downward acceleration (units/s²)
    pub const GRAVITY: f32 = 1200.0;
    /// Horizontal acceleration while a direction is held (units/s²)
    pub const MOVE_ACCEL: f32 = 800.0;
    /// Initial upward speed of a jump (units/s)
    pub const JUMP_VELOCITY: f32 = 700.0;
    /// Vertical speed multiplier applied when jump is released while rising
    pub const JUMP_CUT: f32 = 0.5;
    /// Per-tick horizontal damping on the ground
    pub const GROUND_FRICTION: f32 = 0.85;
    /// Per-tick horizontal damping in the air
    pub const AIR_FRICTION: f32 = 0.97;
    /// Horizontal speed above which a grounded player counts as running
    pub const RUNNING_THRESHOLD: f32 = 10.0;
    /// Gap left between the player and a surface after resolution
    pub const COLLISION_PADDING: f32 = 1.0;

    /// Player hitbox
    pub const PLAYER_WIDTH: f32 = 30.0;
    pub const PLAYER_HEIGHT: f32 = 50.0;

    pub const STARTING_LIVES: u32 = 10;

    /// World dimensions; falling below WORLD_HEIGHT costs a life
    pub const WORLD_WIDTH: f32 = 800.0;
    pub const WORLD_HEIGHT: f32 = 600.0;
}

/// Errors surfaced by the simulation to its caller
#[derive(Debug, Error)]
pub enum SimError {
    #[error("level index {index} out of range (have {count} levels)")]
    InvalidLevel { index: usize, count: usize },
    #[error("level {index} is the final level")]
    NoNextLevel { index: usize },
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}
