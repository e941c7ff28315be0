//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (level list order)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod clock;
pub mod collision;
pub mod events;
pub mod input;
pub mod level;
pub mod player;
pub mod rect;
pub mod state;
pub mod tick;

pub use autopilot::Autopilot;
pub use clock::FixedStepClock;
pub use collision::{Contact, Penetration, collect_coins, first_hazard_hit, resolve_platform, resolve_platforms};
pub use events::{DeathCause, GameEvent, SoundEffect};
pub use input::{InputLatch, TickInput};
pub use level::{Coin, Goal, Hazard, Level, LevelLibrary, LevelProvider, MotionAxis, Platform, PlatformMotion};
pub use player::{Facing, MovementState, Player};
pub use rect::Rect;
pub use state::{GamePhase, GameState};
pub use tick::tick;
