//! Positional overlap queries against walls, agents and the player.

use glam::Vec3;
use maze_hunt_core::{planar, Agent, AgentId, EntityClass, Tuning, WallInstance};

/// Read-only collision oracle over a snapshot of walls, agents and the player.
///
/// Walls are tested as square boxes inflated by the class radius. Bodies are
/// tested as circles on the ground plane. The oracle never mutates anything,
/// so repeated queries against the same snapshot always agree.
#[derive(Clone, Copy, Debug)]
pub struct CollisionOracle<'a> {
    walls: &'a [WallInstance],
    agents: &'a [Agent],
    player: Vec3,
    player_radius: f32,
    enemy_radius: f32,
}

impl<'a> CollisionOracle<'a> {
    /// Captures an oracle over the provided snapshot.
    #[must_use]
    pub fn new(walls: &'a [WallInstance], agents: &'a [Agent], player: Vec3, tuning: &Tuning) -> Self {
        Self {
            walls,
            agents,
            player,
            player_radius: tuning.player_radius,
            enemy_radius: tuning.enemy_radius,
        }
    }

    /// Returns an oracle that shares the walls and player but reads `agents` instead.
    #[must_use]
    pub fn with_agents<'b>(&self, agents: &'b [Agent]) -> CollisionOracle<'b>
    where
        'a: 'b,
    {
        CollisionOracle {
            walls: self.walls,
            agents,
            player: self.player,
            player_radius: self.player_radius,
            enemy_radius: self.enemy_radius,
        }
    }

    /// Collision radius associated with `class`.
    #[must_use]
    pub const fn radius(&self, class: EntityClass) -> f32 {
        match class {
            EntityClass::Player => self.player_radius,
            EntityClass::Enemy => self.enemy_radius,
        }
    }

    /// Reports whether a body of `class` placed at `position` would overlap anything.
    ///
    /// Enemy queries only consider the player and other agents when `exclude`
    /// names the agent being moved; without it they test walls alone.
    #[must_use]
    pub fn collides(&self, position: Vec3, exclude: Option<AgentId>, class: EntityClass) -> bool {
        let radius = self.radius(class);
        if self.hits_wall(position, radius) {
            return true;
        }

        // Ground-plane distance; a 3D distance between eye and body heights would shrink the gap.
        let point = planar(position);
        match (class, exclude) {
            (EntityClass::Enemy, Some(excluded)) => {
                if point.distance(planar(self.player)) < self.enemy_radius + self.player_radius {
                    return true;
                }
                let spacing = self.enemy_radius * 2.0;
                self.agents
                    .iter()
                    .filter(|agent| agent.id != excluded)
                    .any(|agent| point.distance(planar(agent.position)) < spacing)
            }
            (EntityClass::Enemy, None) => false,
            (EntityClass::Player, _) => {
                let spacing = self.player_radius + self.enemy_radius;
                self.agents
                    .iter()
                    .any(|agent| point.distance(planar(agent.position)) < spacing)
            }
        }
    }

    fn hits_wall(&self, position: Vec3, radius: f32) -> bool {
        self.walls.iter().any(|wall| {
            (position.x - wall.center.x).abs() < wall.half_extent + radius
                && (position.z - wall.center.y).abs() < wall.half_extent + radius
        })
    }
}
