#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns polled input into validated player movement.

use std::time::Duration;

use glam::Vec3;
use maze_hunt_core::{Command, EntityClass, Event, InputState, PlayMode};
use maze_hunt_world::{query, World};

/// Player movement system driven by per-tick input snapshots.
#[derive(Debug, Clone)]
pub struct PlayerControl {
    play_mode: PlayMode,
}

impl Default for PlayerControl {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerControl {
    /// Creates a new player control system.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            play_mode: PlayMode::Hunting,
        }
    }

    /// Consumes world events and the latest input to emit a player move.
    ///
    /// Nothing is emitted while paused, without elapsed time, or when the
    /// requested position would overlap a wall or an agent.
    pub fn handle(
        &mut self,
        events: &[Event],
        input: InputState,
        world: &World,
        out: &mut Vec<Command>,
    ) {
        let mut elapsed = Duration::ZERO;
        for event in events {
            match event {
                Event::PlayModeChanged { mode } => self.play_mode = *mode,
                Event::TimeAdvanced { dt } => elapsed = elapsed.saturating_add(*dt),
                _ => {}
            }
        }

        if self.play_mode == PlayMode::Paused || elapsed.is_zero() {
            return;
        }

        if let Some(to) = next_position(input, elapsed, world) {
            out.push(Command::MovePlayer { to });
        }
    }
}

/// Horizontal forward and right vectors for a look direction.
///
/// Returns `None` when the look direction is vertical.
#[must_use]
pub fn planar_basis(look: Vec3) -> Option<(Vec3, Vec3)> {
    let forward = Vec3::new(look.x, 0.0, look.z).try_normalize()?;
    let right = forward.cross(Vec3::Y).normalize();
    Some((forward, right))
}

fn next_position(input: InputState, elapsed: Duration, world: &World) -> Option<Vec3> {
    let (forward, right) = planar_basis(input.look)?;

    let mut heading = Vec3::ZERO;
    if input.forward {
        heading += forward;
    }
    if input.backward {
        heading -= forward;
    }
    if input.right {
        heading += right;
    }
    if input.left {
        heading -= right;
    }
    if heading == Vec3::ZERO {
        return None;
    }

    let tuning = query::tuning(world);
    let current = query::player_position(world);
    let step = tuning.player_speed * elapsed.as_secs_f32();
    let next = query::bounds(world).clamp(current + heading * step, tuning.player_margin());
    if next == current {
        return None;
    }

    if query::collision_oracle(world).collides(next, None, EntityClass::Player) {
        return None;
    }
    Some(next)
}
