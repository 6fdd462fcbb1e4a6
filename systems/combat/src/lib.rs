#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that resolves hitscan shots fired by the player.
//!
//! Enemy bodies are treated as upright cylinders around their position. Walls
//! do not stop shots.

use glam::{Vec2, Vec3};
use maze_hunt_core::{Agent, AgentId, Command, Event, InputState, PlayMode};
use maze_hunt_world::{query, World};

const PARALLEL_EPSILON: f32 = 1e-6;

/// Shape used when testing shots against enemy bodies.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hitbox {
    /// Horizontal radius of the body.
    pub radius: f32,
    /// Half of the body's vertical extent around its position.
    pub half_height: f32,
}

/// Agent struck by a shot and the ray parameter of the impact.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    /// Agent that was struck.
    pub agent: AgentId,
    /// Distance along the normalized ray.
    pub distance: f32,
}

/// Combat system that fires when the player pulls the trigger.
#[derive(Debug, Default)]
pub struct Combat {
    paused: bool,
}

impl Combat {
    /// Creates a new combat system.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits `Command::FireShot` and, on a hit, `Command::EliminateAgent`.
    ///
    /// Shots are only resolved on frames that advanced time.
    pub fn handle(
        &mut self,
        events: &[Event],
        input: InputState,
        world: &World,
        out: &mut Vec<Command>,
    ) {
        let mut ticked = false;
        for event in events {
            match event {
                Event::PlayModeChanged { mode } => self.paused = *mode == PlayMode::Paused,
                Event::TimeAdvanced { .. } => ticked = true,
                _ => {}
            }
        }

        if self.paused || !ticked || !input.fire {
            return;
        }

        let Some(direction) = input.look.try_normalize() else {
            return;
        };
        let origin = query::player_position(world);
        out.push(Command::FireShot { origin, direction });

        let tuning = query::tuning(world);
        let hitbox = Hitbox {
            radius: tuning.enemy_radius,
            half_height: tuning.enemy_half_height,
        };
        if let Some(hit) = first_hit(origin, direction, query::agents(world), hitbox) {
            out.push(Command::EliminateAgent { agent: hit.agent });
        }
    }
}

/// Finds the nearest agent struck by a ray, preferring earlier agents on ties.
#[must_use]
pub fn first_hit(origin: Vec3, direction: Vec3, agents: &[Agent], hitbox: Hitbox) -> Option<Hit> {
    let direction = direction.try_normalize()?;
    let mut best: Option<Hit> = None;

    for agent in agents {
        let Some(distance) = intersect(origin, direction, agent.position, hitbox) else {
            continue;
        };
        if best.map_or(true, |current| distance < current.distance) {
            best = Some(Hit {
                agent: agent.id,
                distance,
            });
        }
    }

    best
}

fn intersect(origin: Vec3, direction: Vec3, center: Vec3, hitbox: Hitbox) -> Option<f32> {
    let (planar_enter, planar_exit) = circle_span(origin, direction, center, hitbox.radius)?;
    let (vertical_enter, vertical_exit) = slab_span(
        origin.y,
        direction.y,
        center.y - hitbox.half_height,
        center.y + hitbox.half_height,
    )?;

    let enter = planar_enter.max(vertical_enter).max(0.0);
    let exit = planar_exit.min(vertical_exit);
    (enter <= exit).then_some(enter)
}

fn circle_span(origin: Vec3, direction: Vec3, center: Vec3, radius: f32) -> Option<(f32, f32)> {
    let offset = Vec2::new(origin.x - center.x, origin.z - center.z);
    let heading = Vec2::new(direction.x, direction.z);
    let c = offset.length_squared() - radius * radius;
    let a = heading.length_squared();

    if a < PARALLEL_EPSILON {
        return (c <= 0.0).then_some((f32::NEG_INFINITY, f32::INFINITY));
    }

    let b = offset.dot(heading);
    let discriminant = b * b - a * c;
    if discriminant < 0.0 {
        return None;
    }
    let root = discriminant.sqrt();
    Some(((-b - root) / a, (-b + root) / a))
}

fn slab_span(origin: f32, direction: f32, low: f32, high: f32) -> Option<(f32, f32)> {
    if direction.abs() < PARALLEL_EPSILON {
        return (low..=high)
            .contains(&origin)
            .then_some((f32::NEG_INFINITY, f32::INFINITY));
    }
    let first = (low - origin) / direction;
    let second = (high - origin) / direction;
    Some((first.min(second), first.max(second)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HITBOX: Hitbox = Hitbox {
        radius: 1.0,
        half_height: 1.75,
    };

    fn agent(id: u32, x: f32, z: f32) -> Agent {
        Agent {
            id: AgentId::new(id),
            position: Vec3::new(x, 1.0, z),
            target: Vec3::new(x, 1.0, z),
        }
    }

    #[test]
    fn level_shot_hits_agent_ahead() {
        let agents = [agent(0, 0.0, -10.0)];
        let hit = first_hit(Vec3::new(0.0, 2.0, 0.0), Vec3::NEG_Z, &agents, HITBOX).expect("hit");
        assert_eq!(hit.agent, AgentId::new(0));
        assert!((hit.distance - 9.0).abs() < 1e-4);
    }

    #[test]
    fn nearest_agent_is_struck() {
        let agents = [agent(0, 0.0, -20.0), agent(1, 0.5, -6.0), agent(2, 0.0, 8.0)];
        let hit = first_hit(Vec3::new(0.0, 2.0, 0.0), Vec3::NEG_Z, &agents, HITBOX).expect("hit");
        assert_eq!(hit.agent, AgentId::new(1));
    }

    #[test]
    fn agents_behind_or_aside_are_missed() {
        let agents = [agent(0, 0.0, 10.0), agent(1, 3.0, -10.0)];
        assert_eq!(
            first_hit(Vec3::new(0.0, 2.0, 0.0), Vec3::NEG_Z, &agents, HITBOX),
            None
        );
    }

    #[test]
    fn steep_shots_pass_over_agents() {
        let agents = [agent(0, 0.0, -10.0)];
        let upward = Vec3::new(0.0, 1.0, -1.0);
        assert_eq!(
            first_hit(Vec3::new(0.0, 2.0, 0.0), upward, &agents, HITBOX),
            None
        );

        let downward = Vec3::new(0.0, -0.1, -1.0);
        assert!(first_hit(Vec3::new(0.0, 2.0, 0.0), downward, &agents, HITBOX).is_some());
    }

    #[test]
    fn shooting_from_inside_a_body_hits_it() {
        let agents = [agent(4, 0.2, 0.0)];
        let hit = first_hit(Vec3::new(0.0, 2.0, 0.0), Vec3::X, &agents, HITBOX).expect("hit");
        assert_eq!(hit.distance, 0.0);
    }

    #[test]
    fn vertical_shots_only_hit_overlapping_bodies() {
        let agents = [agent(0, 0.0, 0.0), agent(1, 5.0, 0.0)];
        let hit = first_hit(Vec3::new(0.3, 6.0, 0.0), Vec3::NEG_Y, &agents, HITBOX).expect("hit");
        assert_eq!(hit.agent, AgentId::new(0));
        assert!((hit.distance - 3.25).abs() < 1e-4);
    }
}
