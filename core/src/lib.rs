#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Hunt engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::time::Duration;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

mod grid;
mod tuning;

pub use grid::{Bounds, CellCoord, CellKind, Grid, WallInstance, CELL_HALF_EXTENT, CELL_SIZE};
pub use tuning::{ConfigError, Tuning, MAX_AREA_SIZE, MAX_ENEMY_COUNT};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Maze Hunt.";

/// Height at which enemy bodies are placed.
pub const ENEMY_HEIGHT: f32 = 1.0;

/// Eye height of the player.
pub const PLAYER_HEIGHT: f32 = 2.0;

/// Player position used when no collision-free spawn cell can be found.
pub const INITIAL_SPAWN: Vec3 = Vec3::new(0.0, PLAYER_HEIGHT, 0.0);

/// Enemy target used when the maze has no open cells.
pub const FALLBACK_TARGET: Vec3 = Vec3::new(0.0, ENEMY_HEIGHT, 0.0);

/// Projects a world-space point onto the ground plane as `(x, z)`.
#[must_use]
pub fn planar(point: Vec3) -> Vec2 {
    Vec2::new(point.x, point.z)
}

/// Describes whether the simulation currently advances.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayMode {
    /// Regular play: ticks advance agents, the player and the round clock.
    Hunting,
    /// Paused play: ticks are ignored until the mode changes back.
    Paused,
}

/// Lifecycle of the current round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RoundPhase {
    /// No round has been started yet.
    Idle,
    /// Enemies are live and the round clock runs.
    Running,
    /// Every enemy of the round was eliminated.
    Cleared,
}

/// Collision class used to pick radii and the set of bodies to test against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityClass {
    /// The single player body.
    Player,
    /// Any enemy agent.
    Enemy,
}

/// Unique identifier assigned to an agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(u32);

impl AgentId {
    /// Creates a new agent identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Enemy body tracked by the world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Agent {
    /// Identifier allocated by the world.
    pub id: AgentId,
    /// Current world-space position.
    pub position: Vec3,
    /// Destination the agent currently walks toward.
    pub target: Vec3,
}

/// Input snapshot polled by adapters once per tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InputState {
    /// Walk along the look direction.
    pub forward: bool,
    /// Walk against the look direction.
    pub backward: bool,
    /// Strafe to the left of the look direction.
    pub left: bool,
    /// Strafe to the right of the look direction.
    pub right: bool,
    /// Fire a shot along the look direction on this tick.
    pub fire: bool,
    /// Camera look direction in world space; need not be normalized.
    pub look: Vec3,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            forward: false,
            backward: false,
            left: false,
            right: false,
            fire: false,
            look: Vec3::NEG_Z,
        }
    }
}

/// Summary published once a round is cleared.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundReport {
    /// Enemies requested when the round started.
    pub enemy_count: u32,
    /// Enemies that were eliminated.
    pub eliminated: u32,
    /// Shots fired during the round.
    pub shots_fired: u32,
    /// Simulated time between the round start and its clearance.
    pub elapsed: Duration,
}

impl RoundReport {
    /// Fraction of shots that eliminated an enemy, or `None` without shots.
    #[must_use]
    pub fn accuracy(&self) -> Option<f32> {
        if self.shots_fired == 0 {
            return None;
        }
        Some(self.eliminated as f32 / self.shots_fired as f32)
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Installs a freshly generated maze, replacing walls and clearing agents.
    ConfigureMaze {
        /// Fully connected occupancy grid.
        grid: Grid,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that the world transition to the provided play mode.
    SetPlayMode {
        /// Mode the world should activate.
        mode: PlayMode,
    },
    /// Starts a new round, resetting its clock and counters.
    StartRound {
        /// Number of enemies the round asks for.
        enemy_count: u32,
    },
    /// Asks for the player to be moved to a fresh spawn point.
    RespawnPlayer,
    /// Teleports the player to a spawn position.
    PlacePlayer {
        /// Collision-free spawn position.
        position: Vec3,
    },
    /// Moves the player to a position validated by the player control system.
    MovePlayer {
        /// Destination of the move.
        to: Vec3,
    },
    /// Removes every agent without counting eliminations.
    ClearAgents,
    /// Inserts a new agent.
    SpawnAgent {
        /// Spawn position.
        position: Vec3,
        /// Initial walking target.
        target: Vec3,
    },
    /// Moves an agent to a position validated by the steering system.
    MoveAgent {
        /// Agent being moved.
        agent: AgentId,
        /// Destination of the move.
        to: Vec3,
    },
    /// Replaces an agent's walking target.
    RetargetAgent {
        /// Agent being retargeted.
        agent: AgentId,
        /// New walking target.
        target: Vec3,
    },
    /// Records a shot fired by the player.
    FireShot {
        /// Ray origin.
        origin: Vec3,
        /// Ray direction.
        direction: Vec3,
    },
    /// Removes an agent that was hit.
    EliminateAgent {
        /// Agent being eliminated.
        agent: AgentId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that a new maze replaced the previous one.
    MazeConfigured {
        /// Number of grid columns.
        columns: u32,
        /// Number of grid rows.
        rows: u32,
    },
    /// Announces that the simulation entered a new play mode.
    PlayModeChanged {
        /// Mode that became active after processing commands.
        mode: PlayMode,
    },
    /// Announces a round start; spawners react by placing bodies.
    RoundStarted {
        /// Number of enemies the round asks for.
        enemy_count: u32,
    },
    /// Asks spawners to choose a new player position.
    PlayerRespawnRequested,
    /// Confirms that the player was placed at a spawn point.
    PlayerPlaced {
        /// Spawn position.
        position: Vec3,
    },
    /// Confirms that the player moved.
    PlayerMoved {
        /// Position before the move.
        from: Vec3,
        /// Position after the move.
        to: Vec3,
    },
    /// Confirms that every agent was removed.
    AgentsCleared {
        /// Number of agents removed.
        removed: usize,
    },
    /// Confirms that an agent was created.
    AgentSpawned {
        /// Identifier assigned to the agent.
        agent: AgentId,
        /// Spawn position.
        position: Vec3,
    },
    /// Confirms that an agent moved.
    AgentMoved {
        /// Agent that moved.
        agent: AgentId,
        /// Position before the move.
        from: Vec3,
        /// Position after the move.
        to: Vec3,
    },
    /// Confirms that an agent picked a new target.
    AgentRetargeted {
        /// Agent that was retargeted.
        agent: AgentId,
        /// New walking target.
        target: Vec3,
    },
    /// Confirms that the player fired.
    ShotFired {
        /// Ray origin.
        origin: Vec3,
        /// Ray direction.
        direction: Vec3,
    },
    /// Confirms that an agent was eliminated.
    AgentEliminated {
        /// Agent that was removed.
        agent: AgentId,
    },
    /// Announces that the last enemy of a running round was eliminated.
    RoundCleared {
        /// Simulated time the round lasted.
        elapsed: Duration,
        /// Enemies eliminated during the round.
        eliminated: u32,
    },
    /// Publishes the statistics of a cleared round.
    RoundReportPublished {
        /// Aggregated round statistics.
        report: RoundReport,
    },
}
