//! Player kinematics
//!
//! Semi-implicit Euler integration at the fixed tick. Contact with the world
//! only reaches the player through `on_ground`, `on_ceiling` and `on_wall`,
//! which the collision resolver calls.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::tuning::Tuning;

/// Animation-facing movement state, derived from kinematics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementState {
    Idle,
    Running,
    Jumping,
    Falling,
}

impl MovementState {
    /// Pure derivation from contact and velocity
    pub fn derive(grounded: bool, vel: Vec2, running_threshold: f32) -> Self {
        if !grounded {
            if vel.y < 0.0 {
                MovementState::Jumping
            } else {
                MovementState::Falling
            }
        } else if vel.x.abs() > running_threshold {
            MovementState::Running
        } else {
            MovementState::Idle
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// The player character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner of the hitbox
    pub pos: Vec2,
    pub vel: Vec2,
    pub acc: Vec2,
    pub size: Vec2,
    pub grounded: bool,
    /// Set by a jump, cleared once grounded again
    pub jumping: bool,
    /// Jump input is held; blocks re-triggering until released
    pub jump_held: bool,
    pub facing: Facing,
}

impl Player {
    pub fn new(size: Vec2) -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            acc: Vec2::ZERO,
            size,
            grounded: false,
            jumping: false,
            jump_held: false,
            facing: Facing::Right,
        }
    }

    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self::new(Vec2::new(tuning.player_width, tuning.player_height))
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    /// Place at `start` with all motion and contact state cleared
    pub fn reset(&mut self, start: Vec2) {
        self.pos = start;
        self.vel = Vec2::ZERO;
        self.acc = Vec2::ZERO;
        self.grounded = false;
        self.jumping = false;
        self.jump_held = false;
    }

    pub fn movement_state(&self, tuning: &Tuning) -> MovementState {
        MovementState::derive(self.grounded, self.vel, tuning.running_threshold)
    }

    // === Commands ===

    pub fn move_left(&mut self, tuning: &Tuning) {
        self.acc.x = -tuning.move_accel;
        self.facing = Facing::Left;
    }

    pub fn move_right(&mut self, tuning: &Tuning) {
        self.acc.x = tuning.move_accel;
        self.facing = Facing::Right;
    }

    /// Start a jump if standing and the jump input was not already held.
    /// Returns true if the jump happened.
    pub fn jump(&mut self, tuning: &Tuning) -> bool {
        if !self.grounded || self.jump_held {
            return false;
        }
        self.vel.y = -tuning.jump_velocity;
        self.grounded = false;
        self.jumping = true;
        self.jump_held = true;
        true
    }

    /// Release the jump input; cuts the jump short while still rising
    pub fn release_jump(&mut self, tuning: &Tuning) {
        self.jump_held = false;
        if self.vel.y < 0.0 {
            self.vel.y *= tuning.jump_cut;
        }
    }

    // === Integration ===

    /// Advance one fixed tick
    pub fn integrate(&mut self, tuning: &Tuning, dt: f32) {
        debug_assert!(
            self.pos.is_finite() && self.vel.is_finite(),
            "non-finite player state: pos={:?} vel={:?}",
            self.pos,
            self.vel
        );

        self.acc.y = tuning.gravity;
        self.vel += self.acc * dt;

        // Horizontal damping only
        self.vel.x *= if self.grounded {
            tuning.ground_friction
        } else {
            tuning.air_friction
        };

        self.pos += self.vel * dt;

        if self.grounded {
            self.jumping = false;
        }

        // Horizontal acceleration must be re-asserted by input every tick
        self.acc.x = 0.0;
    }

    // === Contact hooks (called by the resolver) ===

    pub fn on_ground(&mut self) {
        self.grounded = true;
        self.vel.y = 0.0;
    }

    pub fn on_ceiling(&mut self) {
        self.vel.y = 0.0;
    }

    pub fn on_wall(&mut self) {
        self.vel.x = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    fn standing_player() -> Player {
        let mut p = Player::from_tuning(&Tuning::default());
        p.reset(Vec2::new(100.0, 450.0));
        p.on_ground();
        p
    }

    #[test]
    fn test_jump_from_ground() {
        let tuning = Tuning::default();
        let mut p = standing_player();
        assert!(p.jump(&tuning));
        assert_eq!(p.vel.y, -700.0);
        assert!(!p.grounded);
        assert!(p.jumping);
        assert!(p.jump_held);
    }

    #[test]
    fn test_jump_while_airborne_is_noop() {
        let tuning = Tuning::default();
        let mut p = Player::from_tuning(&tuning);
        p.vel.y = 120.0;
        assert!(!p.jump(&tuning));
        assert_eq!(p.vel.y, 120.0);
        assert!(!p.jumping);
    }

    #[test]
    fn test_held_jump_does_not_retrigger() {
        let tuning = Tuning::default();
        let mut p = standing_player();
        assert!(p.jump(&tuning));
        // Landed again but key still held
        p.on_ground();
        assert!(!p.jump(&tuning));
        p.release_jump(&tuning);
        assert!(p.jump(&tuning));
    }

    #[test]
    fn test_release_cuts_rising_jump() {
        let tuning = Tuning::default();
        let mut p = standing_player();
        p.jump(&tuning);
        p.release_jump(&tuning);
        assert_eq!(p.vel.y, -350.0);
        assert!(!p.jump_held);
    }

    #[test]
    fn test_release_while_falling_keeps_velocity() {
        let tuning = Tuning::default();
        let mut p = Player::from_tuning(&tuning);
        p.vel.y = 200.0;
        p.jump_held = true;
        p.release_jump(&tuning);
        assert_eq!(p.vel.y, 200.0);
        assert!(!p.jump_held);
    }

    #[test]
    fn test_gravity_integration() {
        let tuning = Tuning::default();
        let mut p = Player::from_tuning(&tuning);
        p.reset(Vec2::new(0.0, 0.0));
        p.integrate(&tuning, SIM_DT);
        assert!((p.vel.y - 20.0).abs() < 1e-4);
        assert!((p.pos.y - 20.0 * SIM_DT).abs() < 1e-4);
        assert_eq!(p.acc.y, 1200.0);
    }

    #[test]
    fn test_ground_and_air_friction() {
        let tuning = Tuning::default();

        let mut grounded = standing_player();
        grounded.move_right(&tuning);
        grounded.integrate(&tuning, SIM_DT);
        let expected = 800.0 * SIM_DT * 0.85;
        assert!((grounded.vel.x - expected).abs() < 1e-4);

        let mut airborne = Player::from_tuning(&tuning);
        airborne.move_left(&tuning);
        airborne.integrate(&tuning, SIM_DT);
        let expected = -800.0 * SIM_DT * 0.97;
        assert!((airborne.vel.x - expected).abs() < 1e-4);
        assert_eq!(airborne.facing, Facing::Left);
    }

    #[test]
    fn test_horizontal_accel_resets_each_tick() {
        let tuning = Tuning::default();
        let mut p = standing_player();
        p.move_right(&tuning);
        p.integrate(&tuning, SIM_DT);
        assert_eq!(p.acc.x, 0.0);
        let vx = p.vel.x;
        p.integrate(&tuning, SIM_DT);
        assert!((p.vel.x - vx * 0.85).abs() < 1e-4);
    }

    #[test]
    fn test_landing_clears_jumping_flag() {
        let tuning = Tuning::default();
        let mut p = standing_player();
        p.jump(&tuning);
        p.on_ground();
        p.integrate(&tuning, SIM_DT);
        assert!(!p.jumping);
    }

    #[test]
    fn test_movement_state_derivation() {
        let t = 10.0;
        assert_eq!(MovementState::derive(false, Vec2::new(0.0, -5.0), t), MovementState::Jumping);
        assert_eq!(MovementState::derive(false, Vec2::new(0.0, 0.0), t), MovementState::Falling);
        assert_eq!(MovementState::derive(false, Vec2::new(50.0, 30.0), t), MovementState::Falling);
        assert_eq!(MovementState::derive(true, Vec2::new(-11.0, 0.0), t), MovementState::Running);
        assert_eq!(MovementState::derive(true, Vec2::new(10.0, 0.0), t), MovementState::Idle);
    }

    #[test]
    fn test_contact_hooks() {
        let mut p = Player::from_tuning(&Tuning::default());
        p.vel = Vec2::new(50.0, -80.0);
        p.on_ceiling();
        assert_eq!(p.vel, Vec2::new(50.0, 0.0));
        p.on_wall();
        assert_eq!(p.vel, Vec2::ZERO);
        assert!(!p.grounded);
        p.vel.y = 30.0;
        p.on_ground();
        assert!(p.grounded);
        assert_eq!(p.vel.y, 0.0);
    }

    #[test]
    fn test_reset() {
        let tuning = Tuning::default();
        let mut p = standing_player();
        p.jump(&tuning);
        p.move_left(&tuning);
        p.reset(Vec2::new(50.0, 400.0));
        assert_eq!(p.pos, Vec2::new(50.0, 400.0));
        assert_eq!(p.vel, Vec2::ZERO);
        assert_eq!(p.acc, Vec2::ZERO);
        assert!(!p.grounded && !p.jumping && !p.jump_held);
    }
}
