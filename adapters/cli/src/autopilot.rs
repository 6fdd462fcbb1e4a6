//! Scripted input used when no human is at the controls.

use maze_hunt_core::{planar, InputState};
use maze_hunt_world::{query, World};

/// Aims at the closest agent, walks toward it and fires at a fixed cadence.
#[derive(Clone, Debug)]
pub struct Autopilot {
    fire_interval: u32,
    frame: u32,
}

impl Autopilot {
    /// Creates an autopilot that pulls the trigger every `fire_interval` frames.
    ///
    /// An interval of zero is treated as one.
    #[must_use]
    pub fn new(fire_interval: u32) -> Self {
        Self {
            fire_interval: fire_interval.max(1),
            frame: 0,
        }
    }

    /// Produces the input snapshot for the next frame.
    pub fn input(&mut self, world: &World) -> InputState {
        self.frame = self.frame.wrapping_add(1);

        let player = query::player_position(world);
        let nearest = query::agents(world).iter().min_by(|a, b| {
            let a = planar(a.position).distance_squared(planar(player));
            let b = planar(b.position).distance_squared(planar(player));
            a.total_cmp(&b)
        });
        let Some(agent) = nearest else {
            return InputState::default();
        };
        let Some(look) = (agent.position - player).try_normalize() else {
            return InputState::default();
        };

        InputState {
            forward: true,
            fire: self.frame % self.fire_interval == 0,
            look,
            ..InputState::default()
        }
    }
}
