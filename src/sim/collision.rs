//! Collision detection and response
//!
//! Player-vs-platform uses minimum-translation resolution: of the two axes,
//! separate along the one with the shallower penetration. Each platform is
//! resolved in list order against the already-corrected player, so a later
//! platform can override an earlier correction.

use super::level::{Coin, Hazard, Platform};
use super::player::Player;
use super::rect::Rect;

/// Which face of a platform the player was pushed out of
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Pushed out to the platform's left side
    WallLeft,
    /// Pushed out to the platform's right side
    WallRight,
    /// Landed on top
    Ground,
    /// Bumped the underside
    Ceiling,
}

/// Penetration depths of `a` into `b`, measured from each side of `b`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Penetration {
    /// a's right edge past b's left edge
    pub from_left: f32,
    /// b's right edge past a's left edge
    pub from_right: f32,
    /// a's bottom edge past b's top edge
    pub from_top: f32,
    /// b's bottom edge past a's top edge
    pub from_bottom: f32,
}

impl Penetration {
    /// Depths for two overlapping rectangles, `None` if they don't overlap
    pub fn between(a: &Rect, b: &Rect) -> Option<Self> {
        if !a.overlaps(b) {
            return None;
        }
        Some(Self {
            from_left: a.right() - b.left(),
            from_right: b.right() - a.left(),
            from_top: a.bottom() - b.top(),
            from_bottom: b.bottom() - a.top(),
        })
    }

    #[inline]
    pub fn min_x(&self) -> f32 {
        self.from_left.min(self.from_right)
    }

    #[inline]
    pub fn min_y(&self) -> f32 {
        self.from_top.min(self.from_bottom)
    }

    /// Horizontal resolution only when strictly shallower; ties go vertical
    #[inline]
    pub fn resolves_horizontally(&self) -> bool {
        self.min_x() < self.min_y()
    }
}

/// Push the player out of one platform. Returns the contact made, if any.
pub fn resolve_platform(player: &mut Player, platform: &Rect, padding: f32) -> Option<Contact> {
    let pen = Penetration::between(&player.rect(), platform)?;

    if pen.resolves_horizontally() {
        let contact = if pen.from_left < pen.from_right {
            player.pos.x = platform.left() - player.size.x - padding;
            Contact::WallLeft
        } else {
            player.pos.x = platform.right() + padding;
            Contact::WallRight
        };
        player.on_wall();
        Some(contact)
    } else if pen.from_top < pen.from_bottom {
        player.pos.y = platform.top() - player.size.y - padding;
        player.on_ground();
        Some(Contact::Ground)
    } else {
        player.pos.y = platform.bottom() + padding;
        player.on_ceiling();
        Some(Contact::Ceiling)
    }
}

/// Resolve against every platform in order. Grounded status is cleared first
/// and only a floor contact this pass sets it again.
pub fn resolve_platforms(player: &mut Player, platforms: &[Platform], padding: f32) -> Vec<Contact> {
    player.grounded = false;
    platforms
        .iter()
        .filter_map(|platform| resolve_platform(player, &platform.rect, padding))
        .collect()
}

/// Remove every coin the player touches, returning them in level order
pub fn collect_coins(player: &Player, coins: &mut Vec<Coin>) -> Vec<Coin> {
    let hitbox = player.rect();
    let mut collected = Vec::new();
    coins.retain(|coin| {
        if hitbox.overlaps(&coin.rect) {
            collected.push(coin.clone());
            false
        } else {
            true
        }
    });
    collected
}

/// Index of the first hazard the player touches; later hazards are not checked
pub fn first_hazard_hit(player: &Player, hazards: &[Hazard]) -> Option<usize> {
    let hitbox = player.rect();
    hazards.iter().position(|hazard| hitbox.overlaps(&hazard.rect))
}
