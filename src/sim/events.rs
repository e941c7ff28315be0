//! Game events
//!
//! Emitted by the simulation for the score/UI and audio collaborators.
//! Consumers drain them after each frame; the simulation never waits on them.

use serde::{Deserialize, Serialize};

/// Why a life was lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    Hazard,
    FellOut,
}

/// Something happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped,
    /// Score delta is the coin's value
    CoinCollected { value: u32 },
    /// Lives delta is always -1
    LifeLost { cause: DeathCause, lives_left: u32 },
    /// A level other than the last was finished
    LevelComplete { index: usize },
    /// The final level was finished
    GameCompleted,
    GameOver,
}

/// Named sound cues for the audio collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundEffect {
    Jump,
    Coin,
    Death,
    LevelComplete,
    GameOver,
}

impl SoundEffect {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundEffect::Jump => "jump",
            SoundEffect::Coin => "coin",
            SoundEffect::Death => "death",
            SoundEffect::LevelComplete => "levelComplete",
            SoundEffect::GameOver => "gameOver",
        }
    }
}

impl GameEvent {
    /// Sound cue to play for this event
    pub fn sound(&self) -> SoundEffect {
        match self {
            GameEvent::Jumped => SoundEffect::Jump,
            GameEvent::CoinCollected { .. } => SoundEffect::Coin,
            GameEvent::LifeLost { .. } => SoundEffect::Death,
            GameEvent::LevelComplete { .. } | GameEvent::GameCompleted => SoundEffect::LevelComplete,
            GameEvent::GameOver => SoundEffect::GameOver,
        }
    }

    /// Change to the score caused by this event
    pub fn score_delta(&self) -> u32 {
        match self {
            GameEvent::CoinCollected { value } => *value,
            _ => 0,
        }
    }
}
