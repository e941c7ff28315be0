//! Game state and core simulation types
//!
//! `GameState` is the whole simulation context: rules, progress, the live
//! level copy and the player. It is passed explicitly into every tick; there
//! is no global state.

use serde::{Deserialize, Serialize};

use super::events::{DeathCause, GameEvent};
use super::level::{Level, LevelProvider};
use super::player::{MovementState, Player};
use crate::SimError;
use crate::tuning::Tuning;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen; nothing simulates
    Menu,
    /// Active gameplay
    Playing,
    Paused,
    /// A level other than the last was finished; waiting for `next_level`
    LevelComplete,
    /// Out of lives
    GameOver,
    /// Final level finished
    GameCompleted,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Physics and rules
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Never decreases while a run is in progress
    pub score: u32,
    pub lives: u32,
    pub level_index: usize,
    /// Number of levels the provider reported at the last load
    pub level_count: usize,
    /// Simulated seconds spent on the current level (frozen while paused)
    pub level_time: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: Player,
    /// Live copy of the current level; `None` until the first load
    pub level: Option<Level>,
    /// Events since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    pub fn new(tuning: Tuning) -> Self {
        Self {
            player: Player::from_tuning(&tuning),
            lives: tuning.starting_lives,
            tuning,
            phase: GamePhase::Menu,
            score: 0,
            level_index: 0,
            level_count: 0,
            level_time: 0.0,
            time_ticks: 0,
            level: None,
            events: Vec::new(),
        }
    }

    /// Replace the live level with a fresh copy of `index` and respawn the
    /// player. An invalid index leaves the state untouched.
    pub fn load_level(&mut self, provider: &impl LevelProvider, index: usize) -> Result<(), SimError> {
        let count = provider.level_count();
        let mut level = provider
            .level(index)
            .ok_or(SimError::InvalidLevel { index, count })?;
        let fixed = level.sanitize();
        if fixed > 0 {
            log::warn!("Level {} ({}): repaired {} platform(s) on load", index + 1, level.name, fixed);
        }

        self.player.reset(level.player_start);
        self.level_index = index;
        self.level_count = count;
        self.level_time = 0.0;
        log::info!(
            "Loaded level {} ({}), {} coin value available",
            index + 1,
            level.name,
            level.remaining_coin_value()
        );
        self.level = Some(level);
        Ok(())
    }

    /// Fresh run from the first level
    pub fn start_game(&mut self, provider: &impl LevelProvider) -> Result<(), SimError> {
        self.load_level(provider, 0)?;
        self.score = 0;
        self.lives = self.tuning.starting_lives;
        self.time_ticks = 0;
        self.events.clear();
        self.phase = GamePhase::Playing;
        log::info!("Game started with {} lives", self.lives);
        Ok(())
    }

    pub fn restart(&mut self, provider: &impl LevelProvider) -> Result<(), SimError> {
        self.start_game(provider)
    }

    /// Load the level after the current one and resume play
    pub fn next_level(&mut self, provider: &impl LevelProvider) -> Result<(), SimError> {
        let next = self.level_index + 1;
        if next >= provider.level_count() {
            return Err(SimError::NoNextLevel {
                index: self.level_index,
            });
        }
        self.load_level(provider, next)?;
        self.phase = GamePhase::Playing;
        Ok(())
    }

    /// Returns true if the game was playing and is now paused
    pub fn pause(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        self.phase = GamePhase::Paused;
        log::info!("Paused at {:.2}s", self.level_time);
        true
    }

    /// Returns true if the game was paused and is now playing
    pub fn resume(&mut self) -> bool {
        if self.phase != GamePhase::Paused {
            return false;
        }
        self.phase = GamePhase::Playing;
        log::info!("Resumed");
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        match self.phase {
            GamePhase::Playing => self.pause(),
            GamePhase::Paused => self.resume(),
            _ => false,
        }
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub fn movement_state(&self) -> MovementState {
        self.player.movement_state(&self.tuning)
    }

    /// Take every event emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // === Rule outcomes (applied by the tick) ===

    pub(crate) fn collect_coin(&mut self, value: u32) {
        let event = GameEvent::CoinCollected { value };
        self.score = self.score.saturating_add(event.score_delta());
        self.events.push(event);
        log::debug!("Coin collected (+{}), score {}", value, self.score);
    }

    /// One life gone: respawn, or end the run when none are left
    pub(crate) fn lose_life(&mut self, cause: DeathCause) {
        self.lives = self.lives.saturating_sub(1);
        self.events.push(GameEvent::LifeLost {
            cause,
            lives_left: self.lives,
        });
        log::debug!("Life lost ({:?}), {} left", cause, self.lives);

        if self.lives == 0 {
            self.phase = GamePhase::GameOver;
            self.events.push(GameEvent::GameOver);
            log::info!("Game over with score {}", self.score);
        } else if let Some(level) = &self.level {
            self.player.reset(level.player_start);
        }
    }

    pub(crate) fn complete_level(&mut self) {
        if self.level_index + 1 >= self.level_count {
            self.phase = GamePhase::GameCompleted;
            self.events.push(GameEvent::GameCompleted);
            log::info!("All {} levels complete, final score {}", self.level_count, self.score);
        } else {
            self.phase = GamePhase::LevelComplete;
            self.events.push(GameEvent::LevelComplete {
                index: self.level_index,
            });
            log::info!(
                "Level {} complete in {:.2}s, score {}",
                self.level_index + 1,
                self.level_time,
                self.score
            );
        }
    }
}
