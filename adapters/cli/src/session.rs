//! Frame loop that owns the world and wires every system together.

use std::time::Duration;

use maze_hunt_core::{Command, Event, InputState, PlayMode, RoundReport, Tuning};
use maze_hunt_system_analytics::Analytics;
use maze_hunt_system_combat::Combat;
use maze_hunt_system_maze_generation::{generate, MazeLayout};
use maze_hunt_system_player_control::PlayerControl;
use maze_hunt_system_spawning::{self as spawning, Spawning};
use maze_hunt_system_steering::{self as steering, Steering};
use maze_hunt_world::{self as world, query, World};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// A single game: one generated maze, the world and the systems driving it.
///
/// Commands submitted between frames are applied immediately. Their events
/// are buffered and delivered to the per-frame systems on the next
/// [`Session::step`], so play mode changes reach them before any tick.
#[derive(Debug)]
pub struct Session {
    world: World,
    layout: MazeLayout,
    steering: Steering,
    spawning: Spawning,
    player_control: PlayerControl,
    combat: Combat,
    analytics: Analytics,
    pending: Vec<Event>,
    reports: Vec<RoundReport>,
}

impl Session {
    /// Generates a maze and installs it in a fresh world.
    ///
    /// Every seeded system draws its own seed from `seed`, so one value
    /// reproduces the whole session.
    #[must_use]
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let mut seeds = ChaCha8Rng::seed_from_u64(seed);
        let layout = generate(tuning.area_size, seeds.next_u64());
        Self::assemble(tuning, layout, seeds)
    }

    /// Installs a prepared layout instead of generating one.
    #[must_use]
    pub fn with_layout(tuning: Tuning, layout: MazeLayout, seed: u64) -> Self {
        let mut seeds = ChaCha8Rng::seed_from_u64(seed);
        // Skip the draw `new` spends on generation.
        let _ = seeds.next_u64();
        Self::assemble(tuning, layout, seeds)
    }

    fn assemble(tuning: Tuning, layout: MazeLayout, mut seeds: ChaCha8Rng) -> Self {
        let steering = Steering::new(steering::Config::new(seeds.next_u64()));
        let spawning = Spawning::new(spawning::Config::new(seeds.next_u64()));

        let mut session = Self {
            world: World::with_tuning(tuning),
            layout,
            steering,
            spawning,
            player_control: PlayerControl::new(),
            combat: Combat::new(),
            analytics: Analytics::new(),
            pending: Vec::new(),
            reports: Vec::new(),
        };
        let grid = session.layout.grid.clone();
        session.submit(Command::ConfigureMaze { grid });
        session
    }

    /// Read-only access to the world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Layout produced by the maze generator.
    #[must_use]
    pub fn layout(&self) -> &MazeLayout {
        &self.layout
    }

    /// Reports of every round cleared so far.
    #[must_use]
    pub fn reports(&self) -> &[RoundReport] {
        &self.reports
    }

    /// Starts a round with the configured enemy count.
    pub fn start_round(&mut self) {
        let enemy_count = query::tuning(&self.world).enemy_count;
        self.submit(Command::StartRound { enemy_count });
    }

    /// Moves the player to a fresh spawn point.
    pub fn respawn_player(&mut self) {
        self.submit(Command::RespawnPlayer);
    }

    /// Pauses or resumes the simulation.
    pub fn set_play_mode(&mut self, mode: PlayMode) {
        self.submit(Command::SetPlayMode { mode });
    }

    /// Advances one frame and returns every event it produced.
    ///
    /// Steering runs first, then player control, then combat. Each system's
    /// commands are applied before the next system observes the world.
    pub fn step(&mut self, dt: Duration, input: InputState) -> Vec<Event> {
        let mut events = std::mem::take(&mut self.pending);
        let mut frame = self.execute(vec![Command::Tick { dt }]);
        events.append(&mut frame);

        let mut produced = Vec::new();
        let mut commands = Vec::new();

        self.steering.handle(&events, &self.world, &mut commands);
        produced.append(&mut self.execute(std::mem::take(&mut commands)));

        self.player_control
            .handle(&events, input, &self.world, &mut commands);
        produced.append(&mut self.execute(std::mem::take(&mut commands)));

        self.combat.handle(&events, input, &self.world, &mut commands);
        produced.append(&mut self.execute(commands));

        events.append(&mut produced);
        events
    }

    /// Applies a command between frames.
    pub fn submit(&mut self, command: Command) {
        let mut events = self.execute(vec![command]);
        self.pending.append(&mut events);
    }

    fn execute(&mut self, commands: Vec<Command>) -> Vec<Event> {
        let mut events = Vec::new();
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }

        let mut placements = Vec::new();
        self.spawning.handle(&events, &self.world, &mut placements);
        for command in placements {
            world::apply(&mut self.world, command, &mut events);
        }

        let mut published = Vec::new();
        self.analytics.handle(&events, &mut published);
        for event in &published {
            if let Event::RoundReportPublished { report } = event {
                self.reports.push(*report);
            }
        }
        events.append(&mut published);
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_hunt_core::RoundPhase;

    #[test]
    fn new_session_installs_generated_maze() {
        let session = Session::new(Tuning::default(), 3);

        assert_eq!(query::grid(session.world()), &session.layout().grid);
        assert_eq!(query::round_phase(session.world()), RoundPhase::Idle);
        assert!(session.layout().grid.is_connected());
    }

    #[test]
    fn paused_frames_do_not_advance() {
        let mut session = Session::new(Tuning::default(), 3);
        session.start_round();
        session.set_play_mode(PlayMode::Paused);

        let events = session.step(Duration::from_millis(16), InputState::default());

        assert_eq!(query::tick_index(session.world()), 0);
        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. })));
        assert!(events.contains(&Event::PlayModeChanged {
            mode: PlayMode::Paused
        }));
    }
}
