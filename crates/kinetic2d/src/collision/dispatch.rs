//! Pair classification
//!
//! Chooses how a colliding pair is handled from the two entities' kinds and
//! trigger flags. The match is exhaustive over [`EntityKind`], so adding a
//! kind forces a decision here.

use crate::scene::{DoorSide, EntityKind};

/// Which member of a pair plays the named role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// The first entity of the pair
    A,
    /// The second entity of the pair
    B,
}

/// How a colliding pair is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairResponse {
    /// Move the player through the door
    Door {
        /// Which member is the player
        player: Role,
        /// Wall the door sits on
        side: DoorSide,
    },
    /// Weapon strikes a character
    MeleeHit {
        /// Which member is the weapon
        weapon: Role,
    },
    /// Weapon strikes a destructible prop
    PropHit {
        /// Which member is the weapon
        weapon: Role,
    },
    /// Report the contact without moving anything
    TriggerOnly {
        /// Which member acts as the trigger
        trigger: Role,
    },
    /// Default physical resolution
    Physical,
}

/// Classify a pair
pub const fn classify(kind_a: EntityKind, trigger_a: bool, kind_b: EntityKind, trigger_b: bool) -> PairResponse {
    use EntityKind::{Door, Enemy, Environment, Pickup, Player, Prop, Weapon};

    match (kind_a, kind_b) {
        (Player, Door(side)) => PairResponse::Door { player: Role::A, side },
        (Door(side), Player) => PairResponse::Door { player: Role::B, side },

        (Weapon, Player | Enemy) => PairResponse::MeleeHit { weapon: Role::A },
        (Player | Enemy, Weapon) => PairResponse::MeleeHit { weapon: Role::B },
        (Weapon, Prop) => PairResponse::PropHit { weapon: Role::A },
        (Prop, Weapon) => PairResponse::PropHit { weapon: Role::B },

        (Weapon | Pickup, _) => PairResponse::TriggerOnly { trigger: Role::A },
        (_, Weapon | Pickup) => PairResponse::TriggerOnly { trigger: Role::B },

        // Solid doors are walls for everything except the player
        (Player | Enemy | Environment | Prop | Door(_), Player | Enemy | Environment | Prop | Door(_)) => {
            if trigger_a {
                PairResponse::TriggerOnly { trigger: Role::A }
            } else if trigger_b {
                PairResponse::TriggerOnly { trigger: Role::B }
            } else {
                PairResponse::Physical
            }
        }
    }
}
