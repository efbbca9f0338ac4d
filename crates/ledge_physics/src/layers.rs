//! Collider categories
//!
//! Every collider carries a category that selects how the owning entity
//! responds to a contact. The category is also written into the rapier
//! collider's `user_data` so contact hooks can read it without a lookup.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification tag on a body used to select collision response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColliderCategory {
    Player,
    Platform,
    PlatformOneWay,
    Item,
    Enemy,
    #[default]
    Unknown,
}

impl ColliderCategory {
    /// Encode as rapier collider user data
    pub const fn to_user_data(self) -> u128 {
        match self {
            Self::Player => 1,
            Self::Platform => 2,
            Self::PlatformOneWay => 3,
            Self::Item => 4,
            Self::Enemy => 5,
            Self::Unknown => 0,
        }
    }

    /// Decode rapier collider user data; anything unrecognized is `Unknown`
    pub const fn from_user_data(data: u128) -> Self {
        match data {
            1 => Self::Player,
            2 => Self::Platform,
            3 => Self::PlatformOneWay,
            4 => Self::Item,
            5 => Self::Enemy,
            _ => Self::Unknown,
        }
    }

    /// Ground the player can stand on
    pub const fn is_platform(self) -> bool {
        matches!(self, Self::Platform | Self::PlatformOneWay)
    }
}

impl fmt::Display for ColliderCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Player => "PLAYER",
            Self::Platform => "PLATFORM",
            Self::PlatformOneWay => "PLATFORM_ONEWAY",
            Self::Item => "ITEM",
            Self::Enemy => "ENEMY",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(name)
    }
}
