#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Maze Hunt.

use std::time::Duration;

use glam::Vec3;
use maze_hunt_core::{
    Agent, AgentId, Bounds, CellCoord, Command, Event, Grid, PlayMode, RoundPhase, Tuning,
    WallInstance, FALLBACK_TARGET, INITIAL_SPAWN, WELCOME_BANNER,
};
use rand::Rng;

mod collision;

pub use collision::CollisionOracle;

/// Largest horizontal offset applied around a cell center when sampling points.
pub const CELL_JITTER: f32 = 1.0;

/// Represents the authoritative Maze Hunt world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    tuning: Tuning,
    grid: Grid,
    walls: Vec<WallInstance>,
    empty_cells: Vec<CellCoord>,
    bounds: Bounds,
    agents: Vec<Agent>,
    next_agent_id: u32,
    player: Vec3,
    play_mode: PlayMode,
    round: RoundPhase,
    round_clock: Duration,
    eliminated: u32,
    tick_index: u64,
}

impl World {
    /// Creates a new world with default tuning and no maze.
    #[must_use]
    pub fn new() -> Self {
        Self::with_tuning(Tuning::default())
    }

    /// Creates a new world governed by the provided tuning.
    #[must_use]
    pub fn with_tuning(tuning: Tuning) -> Self {
        Self {
            banner: WELCOME_BANNER,
            bounds: Bounds::centered(tuning.area_size),
            tuning,
            grid: Grid::unconfigured(),
            walls: Vec::new(),
            empty_cells: Vec::new(),
            agents: Vec::new(),
            next_agent_id: 0,
            player: INITIAL_SPAWN,
            play_mode: PlayMode::Hunting,
            round: RoundPhase::Idle,
            round_clock: Duration::ZERO,
            eliminated: 0,
            tick_index: 0,
        }
    }

    fn agent_mut(&mut self, agent: AgentId) -> Option<&mut Agent> {
        self.agents.iter_mut().find(|candidate| candidate.id == agent)
    }

    fn agent_index(&self, agent: AgentId) -> Option<usize> {
        self.agents.iter().position(|candidate| candidate.id == agent)
    }

    fn clear_agents(&mut self) -> usize {
        let removed = self.agents.len();
        self.agents.clear();
        removed
    }

    fn finish_round_if_cleared(&mut self, out_events: &mut Vec<Event>) {
        if self.round != RoundPhase::Running || !self.agents.is_empty() {
            return;
        }

        self.round = RoundPhase::Cleared;
        log::debug!(
            "round cleared after {:?} with {} eliminations",
            self.round_clock,
            self.eliminated
        );
        out_events.push(Event::RoundCleared {
            elapsed: self.round_clock,
            eliminated: self.eliminated,
        });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureMaze { grid } => {
            world.walls = WallInstance::from_grid(&grid);
            world.empty_cells = grid.empty_cells();
            let columns = grid.columns();
            let rows = grid.rows();
            world.grid = grid;
            let removed = world.clear_agents();
            world.round = RoundPhase::Idle;
            world.round_clock = Duration::ZERO;
            world.eliminated = 0;

            log::debug!(
                "maze configured: {}x{} cells, {} obstacles, {} open",
                columns,
                rows,
                world.walls.len(),
                world.empty_cells.len()
            );
            if removed > 0 {
                out_events.push(Event::AgentsCleared { removed });
            }
            out_events.push(Event::MazeConfigured { columns, rows });
        }
        Command::Tick { dt } => {
            if world.play_mode == PlayMode::Paused {
                return;
            }

            world.tick_index = world.tick_index.saturating_add(1);
            if world.round == RoundPhase::Running {
                world.round_clock = world.round_clock.saturating_add(dt);
            }
            out_events.push(Event::TimeAdvanced { dt });
            world.finish_round_if_cleared(out_events);
        }
        Command::SetPlayMode { mode } => {
            if world.play_mode != mode {
                world.play_mode = mode;
                out_events.push(Event::PlayModeChanged { mode });
            }
        }
        Command::StartRound { enemy_count } => {
            world.round = RoundPhase::Running;
            world.round_clock = Duration::ZERO;
            world.eliminated = 0;
            log::debug!("round started with {enemy_count} requested enemies");
            out_events.push(Event::RoundStarted { enemy_count });
        }
        Command::RespawnPlayer => {
            out_events.push(Event::PlayerRespawnRequested);
        }
        Command::PlacePlayer { position } => {
            world.player = position;
            out_events.push(Event::PlayerPlaced { position });
        }
        Command::MovePlayer { to } => {
            let from = world.player;
            world.player = to;
            out_events.push(Event::PlayerMoved { from, to });
        }
        Command::ClearAgents => {
            let removed = world.clear_agents();
            out_events.push(Event::AgentsCleared { removed });
        }
        Command::SpawnAgent { position, target } => {
            let agent = AgentId::new(world.next_agent_id);
            world.next_agent_id = world.next_agent_id.saturating_add(1);
            world.agents.push(Agent {
                id: agent,
                position,
                target,
            });
            out_events.push(Event::AgentSpawned { agent, position });
        }
        Command::MoveAgent { agent, to } => {
            if let Some(body) = world.agent_mut(agent) {
                let from = body.position;
                body.position = to;
                out_events.push(Event::AgentMoved { agent, from, to });
            }
        }
        Command::RetargetAgent { agent, target } => {
            if let Some(body) = world.agent_mut(agent) {
                body.target = target;
                out_events.push(Event::AgentRetargeted { agent, target });
            }
        }
        Command::FireShot { origin, direction } => {
            out_events.push(Event::ShotFired { origin, direction });
        }
        Command::EliminateAgent { agent } => {
            let Some(index) = world.agent_index(agent) else {
                return;
            };
            let _ = world.agents.remove(index);
            if world.round == RoundPhase::Running {
                world.eliminated = world.eliminated.saturating_add(1);
            }
            out_events.push(Event::AgentEliminated { agent });
            world.finish_round_if_cleared(out_events);
        }
    }
}

/// Samples a point near a uniformly chosen open cell at the provided height.
///
/// The point is the cell center shifted by up to [`CELL_JITTER`] along each
/// horizontal axis. Returns `None` when the maze has no open cells.
pub fn random_empty_point<R: Rng + ?Sized>(world: &World, height: f32, rng: &mut R) -> Option<Vec3> {
    if world.empty_cells.is_empty() {
        return None;
    }

    let cell = world.empty_cells[rng.gen_range(0..world.empty_cells.len())];
    let center = world.grid.cell_center(cell);
    let jitter_x = rng.gen_range(-CELL_JITTER..CELL_JITTER);
    let jitter_z = rng.gen_range(-CELL_JITTER..CELL_JITTER);
    Some(Vec3::new(center.x + jitter_x, height, center.y + jitter_z))
}

/// Picks a fresh walking target for an agent, or [`FALLBACK_TARGET`] when no cell is open.
pub fn random_target<R: Rng + ?Sized>(world: &World, rng: &mut R) -> Vec3 {
    random_empty_point(world, FALLBACK_TARGET.y, rng).unwrap_or(FALLBACK_TARGET)
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use glam::Vec3;
    use maze_hunt_core::{
        Agent, AgentId, Bounds, CellCoord, Grid, PlayMode, RoundPhase, Tuning, WallInstance,
    };

    use super::{CollisionOracle, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Gameplay parameters the world was created with.
    #[must_use]
    pub fn tuning(world: &World) -> &Tuning {
        &world.tuning
    }

    /// Provides read-only access to the configured maze grid.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Obstacles derived from the configured maze.
    #[must_use]
    pub fn walls(world: &World) -> &[WallInstance] {
        &world.walls
    }

    /// Open cells of the configured maze in row-major order.
    #[must_use]
    pub fn empty_cells(world: &World) -> &[CellCoord] {
        &world.empty_cells
    }

    /// Playable area on the ground plane.
    #[must_use]
    pub fn bounds(world: &World) -> Bounds {
        world.bounds
    }

    /// Live agents in insertion order.
    #[must_use]
    pub fn agents(world: &World) -> &[Agent] {
        &world.agents
    }

    /// Looks up a single agent by identifier.
    #[must_use]
    pub fn agent(world: &World, agent: AgentId) -> Option<&Agent> {
        world.agents.iter().find(|candidate| candidate.id == agent)
    }

    /// Current player position.
    #[must_use]
    pub fn player_position(world: &World) -> Vec3 {
        world.player
    }

    /// Reports the play mode currently active in the world.
    #[must_use]
    pub fn play_mode(world: &World) -> PlayMode {
        world.play_mode
    }

    /// Lifecycle phase of the current round.
    #[must_use]
    pub fn round_phase(world: &World) -> RoundPhase {
        world.round
    }

    /// Simulated time elapsed in the current round.
    #[must_use]
    pub fn round_clock(world: &World) -> Duration {
        world.round_clock
    }

    /// Number of agents eliminated in the current round.
    #[must_use]
    pub fn eliminated(world: &World) -> u32 {
        world.eliminated
    }

    /// Number of ticks that advanced the simulation.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Captures a collision oracle over the current walls, agents and player.
    #[must_use]
    pub fn collision_oracle(world: &World) -> CollisionOracle<'_> {
        CollisionOracle::new(&world.walls, &world.agents, world.player, &world.tuning)
    }
}
