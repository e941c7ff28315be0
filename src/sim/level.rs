//! Level geometry and the level provider
//!
//! Levels are plain data. The only behavior is moving-platform oscillation.
//! Templates stay immutable inside a [`LevelLibrary`]; the simulation always
//! receives a deep copy so coin removal and platform motion never leak back.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::SimError;

/// Axis a moving platform travels along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MotionAxis {
    X,
    Y,
}

fn default_forward() -> bool {
    true
}

/// Back-and-forth motion between two coordinates on one axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformMotion {
    pub axis: MotionAxis,
    pub range_start: f32,
    pub range_end: f32,
    /// Units per tick
    pub speed: f32,
    /// Moving toward `range_end`
    #[serde(default = "default_forward")]
    pub moving_forward: bool,
}

/// A solid platform, optionally moving
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    #[serde(flatten)]
    pub rect: Rect,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motion: Option<PlatformMotion>,
    #[serde(default)]
    pub color: String,
}

impl Platform {
    pub fn new(x: f32, y: f32, width: f32, height: f32, color: &str) -> Self {
        Self {
            rect: Rect::new(x, y, width, height),
            motion: None,
            color: color.to_string(),
        }
    }

    pub fn with_motion(mut self, axis: MotionAxis, range_start: f32, range_end: f32, speed: f32) -> Self {
        self.motion = Some(PlatformMotion {
            axis,
            range_start,
            range_end,
            speed,
            moving_forward: true,
        });
        self
    }

    /// Advance one tick of oscillation. Position is clamped to the range and
    /// the direction flips on the tick the bound is reached. An inverted
    /// range acts as a single point and speed is taken as a magnitude, so
    /// the platform stays in range even if [`Platform::sanitize`] never ran.
    pub fn advance(&mut self) {
        let Some(motion) = self.motion.as_mut() else {
            return;
        };
        let lo = motion.range_start;
        let hi = motion.range_end.max(lo);
        let speed = motion.speed.abs();
        if !(lo.is_finite() && hi.is_finite() && speed.is_finite()) {
            return;
        }
        let coord = match motion.axis {
            MotionAxis::X => &mut self.rect.x,
            MotionAxis::Y => &mut self.rect.y,
        };

        if motion.moving_forward {
            *coord += speed;
            if *coord >= hi {
                *coord = hi;
                motion.moving_forward = false;
            }
        } else {
            *coord -= speed;
            if *coord <= lo {
                *coord = lo;
                motion.moving_forward = true;
            }
        }
        *coord = coord.clamp(lo, hi);
    }

    /// Repair a malformed motion descriptor in place. Returns true if
    /// anything had to change.
    pub fn sanitize(&mut self) -> bool {
        let Some(motion) = self.motion.as_mut() else {
            return false;
        };
        if !(motion.range_start.is_finite() && motion.range_end.is_finite() && motion.speed.is_finite()) {
            log::warn!("Platform motion has non-finite parameters, making it static");
            self.motion = None;
            return true;
        }
        let mut repaired = false;

        if motion.range_start > motion.range_end {
            log::warn!(
                "Platform motion range {}..{} is inverted, collapsing to {}",
                motion.range_start,
                motion.range_end,
                motion.range_start
            );
            motion.range_end = motion.range_start;
            repaired = true;
        }
        if motion.speed < 0.0 {
            log::warn!("Platform motion speed {} is negative, using its magnitude", motion.speed);
            motion.speed = motion.speed.abs();
            repaired = true;
        }

        let coord = match motion.axis {
            MotionAxis::X => &mut self.rect.x,
            MotionAxis::Y => &mut self.rect.y,
        };
        let clamped = coord.clamp(motion.range_start, motion.range_end);
        if clamped != *coord {
            log::warn!("Platform at {} starts outside its motion range, clamping to {}", *coord, clamped);
            *coord = clamped;
            repaired = true;
        }

        repaired
    }
}

/// A collectible; removed from the live level once picked up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    #[serde(flatten)]
    pub rect: Rect,
    pub value: u32,
    #[serde(default)]
    pub color: String,
}

impl Coin {
    pub fn new(x: f32, y: f32, value: u32, color: &str) -> Self {
        Self {
            rect: Rect::new(x, y, 20.0, 20.0),
            value,
            color: color.to_string(),
        }
    }
}

/// Static hazard; touching it costs a life
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hazard {
    #[serde(flatten)]
    pub rect: Rect,
    #[serde(default)]
    pub color: String,
}

impl Hazard {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            rect: Rect::new(x, y, width, height),
            color: "#FF0000".to_string(),
        }
    }
}

/// Level exit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    #[serde(flatten)]
    pub rect: Rect,
    #[serde(default)]
    pub color: String,
}

impl Goal {
    /// Reached once the player's top-left corner is at or past the goal's
    /// left edge and within its vertical span
    pub fn is_reached_by(&self, player_pos: Vec2) -> bool {
        player_pos.x >= self.rect.left()
            && player_pos.y >= self.rect.top()
            && player_pos.y <= self.rect.bottom()
    }
}

/// One playable level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    #[serde(default)]
    pub name: String,
    pub platforms: Vec<Platform>,
    #[serde(default)]
    pub coins: Vec<Coin>,
    #[serde(default)]
    pub hazards: Vec<Hazard>,
    pub goal: Goal,
    pub player_start: Vec2,
    #[serde(default)]
    pub background: String,
}

impl Level {
    /// Advance every moving platform by one tick
    pub fn advance_platforms(&mut self) {
        for platform in &mut self.platforms {
            platform.advance();
        }
    }

    /// Repair malformed platform motion. Returns the number of platforms fixed.
    pub fn sanitize(&mut self) -> usize {
        self.platforms
            .iter_mut()
            .map(Platform::sanitize)
            .filter(|&fixed| fixed)
            .count()
    }

    /// Sum of all coin values still present
    pub fn remaining_coin_value(&self) -> u32 {
        self.coins.iter().map(|c| c.value).sum()
    }
}

/// Source of levels for the simulation
pub trait LevelProvider {
    fn level_count(&self) -> usize;

    /// An independent copy of level `index`, or `None` if out of range
    fn level(&self, index: usize) -> Option<Level>;
}

/// Immutable set of level templates
#[derive(Debug, Clone)]
pub struct LevelLibrary {
    templates: Vec<Level>,
}

impl LevelLibrary {
    pub fn new(mut templates: Vec<Level>) -> Self {
        for (i, level) in templates.iter_mut().enumerate() {
            let fixed = level.sanitize();
            if fixed > 0 {
                log::warn!("Level {} ({}): repaired {} platform(s)", i + 1, level.name, fixed);
            }
        }
        Self { templates }
    }

    /// Parse a JSON array of levels
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let templates: Vec<Level> = serde_json::from_str(json)?;
        log::info!("Parsed {} level(s) from JSON", templates.len());
        Ok(Self::new(templates))
    }

    /// The three levels the game ships with
    pub fn builtin() -> Self {
        Self::new(vec![level_introduction(), level_increased_difficulty(), level_challenge()])
    }
}

impl LevelProvider for LevelLibrary {
    fn level_count(&self) -> usize {
        self.templates.len()
    }

    fn level(&self, index: usize) -> Option<Level> {
        self.templates.get(index).cloned()
    }
}

// === Built-in levels ===

const GRASS: &str = "#4CAF50";
const WOOD: &str = "#8B4513";
const GOLD: &str = "#FFD700";
const BONUS: &str = "#FFA500";

fn goal(x: f32, y: f32) -> Goal {
    Goal {
        rect: Rect::new(x, y, 50.0, 100.0),
        color: "#00FF00".to_string(),
    }
}

fn level_introduction() -> Level {
    Level {
        name: "Introduction".to_string(),
        platforms: vec![
            Platform::new(0.0, 500.0, 800.0, 100.0, GRASS),
            Platform::new(200.0, 400.0, 100.0, 20.0, WOOD),
            Platform::new(350.0, 320.0, 100.0, 20.0, WOOD),
            Platform::new(500.0, 240.0, 100.0, 20.0, WOOD),
        ],
        coins: vec![
            Coin::new(220.0, 370.0, 10, GOLD),
            Coin::new(370.0, 290.0, 10, GOLD),
            Coin::new(520.0, 210.0, 10, GOLD),
            Coin::new(650.0, 300.0, 20, BONUS),
        ],
        hazards: vec![Hazard::new(300.0, 480.0, 40.0, 20.0)],
        goal: goal(700.0, 400.0),
        player_start: Vec2::new(50.0, 400.0),
        background: "#87CEEB".to_string(),
    }
}

fn level_increased_difficulty() -> Level {
    Level {
        name: "Increased Difficulty".to_string(),
        platforms: vec![
            // Ground with gaps
            Platform::new(0.0, 500.0, 200.0, 100.0, GRASS),
            Platform::new(300.0, 500.0, 200.0, 100.0, GRASS),
            Platform::new(600.0, 500.0, 200.0, 100.0, GRASS),
            Platform::new(100.0, 350.0, 80.0, 20.0, WOOD),
            Platform::new(250.0, 400.0, 80.0, 20.0, WOOD),
            Platform::new(400.0, 350.0, 80.0, 20.0, WOOD),
            Platform::new(550.0, 400.0, 80.0, 20.0, WOOD),
            Platform::new(650.0, 300.0, 100.0, 20.0, WOOD),
        ],
        coins: vec![
            Coin::new(120.0, 320.0, 10, GOLD),
            Coin::new(270.0, 370.0, 10, GOLD),
            Coin::new(420.0, 320.0, 10, GOLD),
            Coin::new(570.0, 370.0, 10, GOLD),
            Coin::new(680.0, 270.0, 30, BONUS),
        ],
        hazards: vec![
            Hazard::new(220.0, 580.0, 60.0, 20.0),
            Hazard::new(520.0, 580.0, 60.0, 20.0),
            Hazard::new(350.0, 330.0, 30.0, 20.0),
        ],
        goal: goal(700.0, 200.0),
        player_start: Vec2::new(50.0, 400.0),
        background: "#6495ED".to_string(),
    }
}

fn level_challenge() -> Level {
    Level {
        name: "Challenge".to_string(),
        platforms: vec![
            Platform::new(0.0, 500.0, 150.0, 100.0, GRASS),
            Platform::new(200.0, 450.0, 80.0, 20.0, WOOD).with_motion(MotionAxis::X, 200.0, 350.0, 1.0),
            Platform::new(400.0, 400.0, 80.0, 20.0, WOOD).with_motion(MotionAxis::Y, 350.0, 450.0, 1.0),
            Platform::new(550.0, 350.0, 60.0, 20.0, WOOD),
            Platform::new(650.0, 300.0, 60.0, 20.0, WOOD),
            Platform::new(500.0, 250.0, 60.0, 20.0, WOOD),
            Platform::new(350.0, 200.0, 60.0, 20.0, WOOD),
            Platform::new(200.0, 150.0, 60.0, 20.0, WOOD),
            // Goal ledge
            Platform::new(650.0, 150.0, 150.0, 20.0, GRASS),
        ],
        coins: vec![
            Coin::new(220.0, 420.0, 10, GOLD),
            Coin::new(420.0, 370.0, 10, GOLD),
            Coin::new(560.0, 320.0, 10, GOLD),
            Coin::new(660.0, 270.0, 10, GOLD),
            Coin::new(510.0, 220.0, 10, GOLD),
            Coin::new(360.0, 170.0, 10, GOLD),
            Coin::new(210.0, 120.0, 10, GOLD),
            Coin::new(700.0, 120.0, 50, BONUS),
        ],
        hazards: vec![
            // Death pit
            Hazard::new(0.0, 600.0, 800.0, 20.0),
            Hazard::new(300.0, 450.0, 30.0, 20.0),
            Hazard::new(600.0, 350.0, 30.0, 20.0),
            Hazard::new(550.0, 250.0, 30.0, 20.0),
            Hazard::new(400.0, 200.0, 30.0, 20.0),
            Hazard::new(250.0, 150.0, 30.0, 20.0),
        ],
        goal: goal(700.0, 50.0),
        player_start: Vec2::new(50.0, 400.0),
        background: "#4682B4".to_string(),
    }
}
