#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Greedy enemy steering that walks agents toward random targets.
//!
//! Each tick every agent takes a jittered step toward its target. Agents that
//! arrive or whose straight-line step would collide pick a new target instead
//! of moving. There is no path planning: walls are avoided only by retargeting.

use std::time::Duration;

use glam::Vec3;
use maze_hunt_core::{Agent, AgentId, Command, EntityClass, Event};
use maze_hunt_world::{query, random_target, CollisionOracle, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Distance below which an agent counts as having reached its target.
pub const ARRIVAL_DISTANCE: f32 = 0.5;

/// Number of random targets drawn before settling for the last one.
pub const RETARGET_ATTEMPTS: usize = 10;

const HEADING_JITTER: f32 = 0.1;
const MIN_SPEED_FACTOR: f32 = 0.8;
const MAX_SPEED_FACTOR: f32 = 1.2;

/// Configuration parameters required to construct the steering system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

/// Pure system that reacts to elapsed time and emits agent movement commands.
#[derive(Debug)]
pub struct Steering {
    rng: ChaCha8Rng,
}

impl Steering {
    /// Creates a new steering system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Consumes world events and emits move and retarget commands for every agent.
    ///
    /// Agents are processed in world order against a scratch copy of the agent
    /// list, so later agents observe the positions earlier agents moved to.
    pub fn handle(&mut self, events: &[Event], world: &World, out: &mut Vec<Command>) {
        let mut agents: Option<Vec<Agent>> = None;

        for event in events {
            let Event::TimeAdvanced { dt } = event else {
                continue;
            };
            let scratch = agents.get_or_insert_with(|| query::agents(world).to_vec());
            self.step(*dt, world, scratch, out);
        }
    }

    fn step(&mut self, dt: Duration, world: &World, agents: &mut [Agent], out: &mut Vec<Command>) {
        let tuning = query::tuning(world);
        let bounds = query::bounds(world);
        let margin = tuning.enemy_margin();
        let base_step = tuning.enemy_speed * dt.as_secs_f32();
        let world_oracle = query::collision_oracle(world);

        for index in 0..agents.len() {
            let agent = agents[index];
            let decision = {
                let oracle = world_oracle.with_agents(agents);
                self.decide(&agent, base_step, &oracle, world, |point| {
                    bounds.clamp(point, margin)
                })
            };

            match decision {
                Decision::Retarget(target) => {
                    agents[index].target = target;
                    out.push(Command::RetargetAgent {
                        agent: agent.id,
                        target,
                    });
                }
                Decision::Move(to) => {
                    agents[index].position = to;
                    out.push(Command::MoveAgent { agent: agent.id, to });
                }
                Decision::Hold => {}
            }
        }
    }

    fn decide<F>(
        &mut self,
        agent: &Agent,
        base_step: f32,
        oracle: &CollisionOracle<'_>,
        world: &World,
        clamp: F,
    ) -> Decision
    where
        F: Fn(Vec3) -> Vec3,
    {
        let to_target = flatten(agent.target - agent.position);
        let distance = to_target.length();
        let heading = to_target.normalize_or_zero();
        let tentative = agent.position + heading * base_step;

        if distance < ARRIVAL_DISTANCE
            || oracle.collides(tentative, Some(agent.id), EntityClass::Enemy)
        {
            return Decision::Retarget(self.pick_target(agent.id, oracle, world));
        }

        let speed = base_step * self.rng.gen_range(MIN_SPEED_FACTOR..MAX_SPEED_FACTOR);
        let wander = Vec3::new(
            self.rng.gen_range(-HEADING_JITTER..HEADING_JITTER),
            0.0,
            self.rng.gen_range(-HEADING_JITTER..HEADING_JITTER),
        );
        let direction = (heading + wander).normalize_or_zero();
        let next = clamp(agent.position + direction * speed);

        if oracle.collides(next, Some(agent.id), EntityClass::Enemy) {
            Decision::Hold
        } else {
            Decision::Move(next)
        }
    }

    fn pick_target(&mut self, agent: AgentId, oracle: &CollisionOracle<'_>, world: &World) -> Vec3 {
        let mut candidate = random_target(world, &mut self.rng);
        for _ in 1..RETARGET_ATTEMPTS {
            if !oracle.collides(candidate, Some(agent), EntityClass::Enemy) {
                break;
            }
            candidate = random_target(world, &mut self.rng);
        }
        candidate
    }
}

impl Default for Steering {
    fn default() -> Self {
        Self::new(Config::new(0))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Decision {
    Retarget(Vec3),
    Move(Vec3),
    Hold,
}

fn flatten(vector: Vec3) -> Vec3 {
    Vec3::new(vector.x, 0.0, vector.z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_hunt_core::{CellKind, Grid};
    use maze_hunt_world::{apply, CELL_JITTER};

    fn open_world() -> World {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::ConfigureMaze {
                grid: Grid::filled(25, 25, -50.0, -50.0, CellKind::Empty),
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::PlacePlayer {
                position: Vec3::new(40.0, 2.0, 40.0),
            },
            &mut events,
        );
        world
    }

    fn spawn(world: &mut World, position: Vec3, target: Vec3) {
        let mut events = Vec::new();
        apply(world, Command::SpawnAgent { position, target }, &mut events);
    }

    fn tick() -> Vec<Event> {
        vec![Event::TimeAdvanced {
            dt: Duration::from_millis(16),
        }]
    }

    #[test]
    fn agent_at_its_target_retargets_without_moving() {
        let mut world = open_world();
        spawn(&mut world, Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 1.0, 0.0));
        let mut steering = Steering::new(Config::new(4));
        let mut commands = Vec::new();

        steering.handle(&tick(), &world, &mut commands);

        assert_eq!(commands.len(), 1);
        let Command::RetargetAgent { target, .. } = commands[0] else {
            panic!("expected a retarget, got {:?}", commands[0]);
        };
        let bounds = query::bounds(&world);
        assert!(bounds.contains(target, -CELL_JITTER));
        assert!(commands
            .iter()
            .all(|command| !matches!(command, Command::MoveAgent { .. })));
    }

    #[test]
    fn agent_walks_toward_distant_target() {
        let mut world = open_world();
        spawn(&mut world, Vec3::new(0.0, 1.0, 0.0), Vec3::new(20.0, 1.0, 0.0));
        let mut steering = Steering::new(Config::new(8));
        let mut commands = Vec::new();

        steering.handle(
            &[Event::TimeAdvanced {
                dt: Duration::from_secs(1),
            }],
            &world,
            &mut commands,
        );

        let [Command::MoveAgent { to, .. }] = commands.as_slice() else {
            panic!("expected a single move, got {commands:?}");
        };
        assert!(to.x >= 0.8 * 0.99 && to.x <= 1.2);
        assert!(to.z.abs() <= 0.2);
        assert_eq!(to.y, 1.0);
    }

    #[test]
    fn blocked_step_triggers_retarget() {
        let mut world = open_world();
        spawn(&mut world, Vec3::new(0.0, 1.0, 0.0), Vec3::new(20.0, 1.0, 0.0));
        spawn(&mut world, Vec3::new(2.5, 1.0, 0.0), Vec3::new(2.5, 1.0, 30.0));
        let mut steering = Steering::new(Config::new(2));
        let mut commands = Vec::new();

        steering.handle(
            &[Event::TimeAdvanced {
                dt: Duration::from_secs(1),
            }],
            &world,
            &mut commands,
        );

        let first = query::agents(&world)[0].id;
        assert!(matches!(
            commands[0],
            Command::RetargetAgent { agent, .. } if agent == first
        ));
    }

    #[test]
    fn later_agents_see_earlier_moves() {
        let mut world = open_world();
        spawn(&mut world, Vec3::new(0.0, 1.0, 0.0), Vec3::new(30.0, 1.0, 0.0));
        spawn(&mut world, Vec3::new(10.0, 1.0, 0.0), Vec3::new(-30.0, 1.0, 0.0));
        let mut steering = Steering::new(Config::new(5));
        let mut scratch = query::agents(&world).to_vec();
        let mut commands = Vec::new();

        steering.step(Duration::from_secs(4), &world, &mut scratch, &mut commands);

        let moved: Vec<_> = commands
            .iter()
            .filter_map(|command| match command {
                Command::MoveAgent { agent, to } => Some((*agent, *to)),
                _ => None,
            })
            .collect();
        for (agent, to) in moved {
            let snapshot = scratch.iter().find(|body| body.id == agent).expect("agent");
            assert_eq!(snapshot.position, to);
        }
        let gap = scratch[0].position.distance(scratch[1].position);
        assert!(gap >= 2.0 * query::tuning(&world).enemy_radius);
    }

    #[test]
    fn agents_stay_inside_bounds() {
        let mut world = open_world();
        for step in 0..8 {
            let offset = -42.0 + step as f32 * 12.0;
            spawn(
                &mut world,
                Vec3::new(offset, 1.0, -offset),
                Vec3::new(-offset * 3.0, 1.0, offset * 3.0),
            );
        }
        let mut steering = Steering::new(Config::new(21));
        let margin = query::tuning(&world).enemy_margin();
        let bounds = query::bounds(&world);

        for _ in 0..600 {
            let mut events = Vec::new();
            apply(
                &mut world,
                Command::Tick {
                    dt: Duration::from_millis(250),
                },
                &mut events,
            );
            let mut commands = Vec::new();
            steering.handle(&events, &world, &mut commands);
            for command in commands {
                apply(&mut world, command, &mut events);
            }
            for agent in query::agents(&world) {
                assert!(bounds.contains(agent.position, margin), "{agent:?}");
            }
        }
    }

    #[test]
    fn ignores_events_without_elapsed_time() {
        let mut world = open_world();
        spawn(&mut world, Vec3::ZERO, Vec3::ZERO);
        let mut steering = Steering::default();
        let mut commands = Vec::new();

        steering.handle(&[Event::PlayerRespawnRequested], &world, &mut commands);

        assert!(commands.is_empty());
    }
}
