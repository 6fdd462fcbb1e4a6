#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system that places the player and populates rounds.

use glam::Vec3;
use maze_hunt_core::{
    planar, Command, EntityClass, Event, ENEMY_HEIGHT, INITIAL_SPAWN, PLAYER_HEIGHT,
};
use maze_hunt_world::{query, random_empty_point, random_target, CollisionOracle, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Candidate positions tried before the player falls back to [`INITIAL_SPAWN`].
pub const PLAYER_SPAWN_ATTEMPTS: usize = 50;

/// Candidate positions tried per requested enemy.
pub const ATTEMPTS_PER_ENEMY: usize = 5;

/// Configuration parameters required to construct the spawning system.
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

/// Position and initial target chosen for a new agent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgentSeed {
    /// Spawn position.
    pub position: Vec3,
    /// First walking target.
    pub target: Vec3,
}

/// Pure system that chooses spawn points when rounds start or the player respawns.
#[derive(Debug)]
pub struct Spawning {
    rng: ChaCha8Rng,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Consumes events and emits placement commands.
    ///
    /// A round start places the player, clears every agent and spawns the new
    /// population in that order. A respawn request only moves the player.
    pub fn handle(&mut self, events: &[Event], world: &World, out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::RoundStarted { enemy_count } => {
                    // Existing agents are about to be cleared, so only walls matter.
                    let oracle = query::collision_oracle(world).with_agents(&[]);
                    let player = self.spawn_player_with(world, &oracle);
                    out.push(Command::PlacePlayer { position: player });
                    out.push(Command::ClearAgents);
                    for seed in self.populate(*enemy_count, player, world) {
                        out.push(Command::SpawnAgent {
                            position: seed.position,
                            target: seed.target,
                        });
                    }
                }
                Event::PlayerRespawnRequested => {
                    let position = self.spawn_player(world);
                    out.push(Command::PlacePlayer { position });
                }
                _ => {}
            }
        }
    }

    /// Picks a collision-free player position near a random open cell.
    ///
    /// Falls back to [`INITIAL_SPAWN`] when every attempt collides.
    pub fn spawn_player(&mut self, world: &World) -> Vec3 {
        let oracle = query::collision_oracle(world);
        self.spawn_player_with(world, &oracle)
    }

    fn spawn_player_with(&mut self, world: &World, oracle: &CollisionOracle<'_>) -> Vec3 {
        let bounds = query::bounds(world);
        let margin = query::tuning(world).player_margin();

        for _ in 0..PLAYER_SPAWN_ATTEMPTS {
            let Some(candidate) = random_empty_point(world, PLAYER_HEIGHT, &mut self.rng) else {
                break;
            };
            let candidate = bounds.clamp(candidate, margin);
            if !oracle.collides(candidate, None, EntityClass::Player) {
                return candidate;
            }
        }

        log::warn!("no collision-free player spawn found; using the initial spawn point");
        INITIAL_SPAWN
    }

    /// Chooses up to `count` enemy spawn points away from `player`.
    ///
    /// Candidates closer than the safe spawn distance to the player, closer
    /// than two enemy radii to an already chosen seed, or overlapping a wall
    /// are discarded. The attempt budget is `count * ATTEMPTS_PER_ENEMY`, so
    /// fewer seeds than requested may be returned.
    pub fn populate(&mut self, count: u32, player: Vec3, world: &World) -> Vec<AgentSeed> {
        let tuning = query::tuning(world);
        let bounds = query::bounds(world);
        let margin = tuning.enemy_margin();
        let spacing = tuning.enemy_radius * 2.0;
        let oracle = query::collision_oracle(world);

        let requested = usize::try_from(count).unwrap_or(usize::MAX);
        let budget = requested.saturating_mul(ATTEMPTS_PER_ENEMY);
        let mut seeds: Vec<AgentSeed> =
            Vec::with_capacity(requested.min(query::empty_cells(world).len()));

        for _ in 0..budget {
            if seeds.len() >= requested {
                break;
            }
            let Some(candidate) = random_empty_point(world, ENEMY_HEIGHT, &mut self.rng) else {
                break;
            };
            let candidate = bounds.clamp(candidate, margin);

            // Ground-plane distance, matching the collision oracle rather than eye-to-body 3D.
            if planar(candidate).distance(planar(player)) < tuning.safe_spawn_distance {
                continue;
            }
            if seeds
                .iter()
                .any(|seed| planar(seed.position).distance(planar(candidate)) < spacing)
            {
                continue;
            }
            if oracle.collides(candidate, None, EntityClass::Enemy) {
                continue;
            }

            let target = random_target(world, &mut self.rng);
            seeds.push(AgentSeed {
                position: candidate,
                target,
            });
        }

        if seeds.len() < requested {
            log::warn!(
                "placed {} of {} requested enemies",
                seeds.len(),
                requested
            );
        }
        seeds
    }
}
