//! Melee weapon hitbox component

use crate::ecs::{Component, Entity};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// A hitbox that deals damage while its owner's attack animation is on an
/// active frame
///
/// Each target is hit at most once per swing. The swing ends when the
/// owner's frame leaves the active window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeleeWeapon {
    /// Entity swinging the weapon; never hit by it
    pub owner: Entity,

    /// Damage reported with each hit
    pub damage: f32,

    /// Knockback speed given to the target
    pub knockback: f32,

    /// Owner animation frames during which the hitbox is live
    pub active_frames: RangeInclusive<u32>,

    hit_this_swing: Vec<Entity>,
}

impl Component for MeleeWeapon {}

impl MeleeWeapon {
    /// Create a weapon owned by `owner`
    pub fn new(owner: Entity, damage: f32, knockback: f32, active_frames: RangeInclusive<u32>) -> Self {
        Self {
            owner,
            damage,
            knockback,
            active_frames,
            hit_this_swing: Vec::new(),
        }
    }

    /// Check whether `frame` lies in the active window
    pub fn is_active_on(&self, frame: u32) -> bool {
        self.active_frames.contains(&frame)
    }

    /// Check whether `target` was already hit during the current swing
    pub fn has_hit(&self, target: Entity) -> bool {
        self.hit_this_swing.contains(&target)
    }

    /// Record a hit on `target`; returns false if it was already hit
    pub fn register_hit(&mut self, target: Entity) -> bool {
        if self.has_hit(target) {
            return false;
        }
        self.hit_this_swing.push(target);
        true
    }

    /// Forget the targets hit during the last swing
    pub fn end_swing(&mut self) {
        self.hit_this_swing.clear();
    }
}
