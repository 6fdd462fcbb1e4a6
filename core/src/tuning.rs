//! Gameplay tuning shared by every system and loaded by adapters.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::grid::CELL_SIZE;

/// Largest accepted side length of the playable area.
pub const MAX_AREA_SIZE: f32 = 4096.0;

/// Largest accepted number of enemies per round.
pub const MAX_ENEMY_COUNT: u32 = 10_000;

/// Adjustable gameplay parameters. Missing fields fall back to [`Tuning::default`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Side length of the square playable area in world units.
    pub area_size: f32,
    /// Thickness of the boundary walls; half of it is kept clear along the edges.
    pub wall_thickness: f32,
    /// Collision radius of the player.
    pub player_radius: f32,
    /// Collision radius shared by every enemy.
    pub enemy_radius: f32,
    /// Half of an enemy's body height, used when resolving shots.
    pub enemy_half_height: f32,
    /// Base enemy speed in world units per second.
    pub enemy_speed: f32,
    /// Player walking speed in world units per second.
    pub player_speed: f32,
    /// Minimum distance between a freshly spawned enemy and the player.
    pub safe_spawn_distance: f32,
    /// Number of enemies requested when a round starts.
    pub enemy_count: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            area_size: 100.0,
            wall_thickness: 2.0,
            player_radius: 0.5,
            enemy_radius: 1.0,
            enemy_half_height: 1.75,
            enemy_speed: 1.0,
            player_speed: 12.0,
            safe_spawn_distance: 10.0,
            enemy_count: 20,
        }
    }
}

impl Tuning {
    /// Margin kept between an enemy center and the playable bounds.
    #[must_use]
    pub fn enemy_margin(&self) -> f32 {
        self.wall_thickness / 2.0 + self.enemy_radius
    }

    /// Margin kept between the player and the playable bounds.
    #[must_use]
    pub fn player_margin(&self) -> f32 {
        self.wall_thickness / 2.0 + self.player_radius
    }

    /// Checks that every parameter lies in a usable range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.area_size.is_finite() || self.area_size < CELL_SIZE {
            return Err(ConfigError::AreaTooSmall {
                area_size: self.area_size,
                minimum: CELL_SIZE,
            });
        }
        if self.area_size > MAX_AREA_SIZE {
            return Err(ConfigError::AreaTooLarge {
                area_size: self.area_size,
                maximum: MAX_AREA_SIZE,
            });
        }
        if self.enemy_count > MAX_ENEMY_COUNT {
            return Err(ConfigError::TooManyEnemies {
                enemy_count: self.enemy_count,
                maximum: MAX_ENEMY_COUNT,
            });
        }

        let non_negative = [
            ("wall_thickness", self.wall_thickness),
            ("player_radius", self.player_radius),
            ("enemy_radius", self.enemy_radius),
            ("enemy_half_height", self.enemy_half_height),
            ("safe_spawn_distance", self.safe_spawn_distance),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }

        let positive = [
            ("enemy_speed", self.enemy_speed),
            ("player_speed", self.player_speed),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        if self.enemy_margin() * 2.0 >= self.area_size {
            return Err(ConfigError::MarginExceedsArea {
                margin: self.enemy_margin(),
                area_size: self.area_size,
            });
        }

        Ok(())
    }
}

/// Reasons a [`Tuning`] may be rejected.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The playable area cannot hold a single cell.
    #[error("area size {area_size} is smaller than one cell ({minimum})")]
    AreaTooSmall {
        /// Requested side length.
        area_size: f32,
        /// Smallest accepted side length.
        minimum: f32,
    },
    /// The playable area would need an unreasonably large grid.
    #[error("area size {area_size} exceeds the maximum of {maximum}")]
    AreaTooLarge {
        /// Requested side length.
        area_size: f32,
        /// Largest accepted side length.
        maximum: f32,
    },
    /// More enemies were requested than a round supports.
    #[error("enemy count {enemy_count} exceeds the maximum of {maximum}")]
    TooManyEnemies {
        /// Requested enemy count.
        enemy_count: u32,
        /// Largest accepted enemy count.
        maximum: u32,
    },
    /// A length that must not be negative was negative or not finite.
    #[error("{field} must be a finite non-negative number, got {value}")]
    Negative {
        /// Name of the offending field.
        field: &'static str,
        /// Rejected value.
        value: f32,
    },
    /// A speed was zero, negative or not finite.
    #[error("{field} must be a finite positive number, got {value}")]
    NotPositive {
        /// Name of the offending field.
        field: &'static str,
        /// Rejected value.
        value: f32,
    },
    /// Boundary margins leave no room for enemies to move.
    #[error("enemy margin {margin} leaves no playable space in an area of {area_size}")]
    MarginExceedsArea {
        /// Margin kept on each side.
        margin: f32,
        /// Requested side length.
        area_size: f32,
    },
}
