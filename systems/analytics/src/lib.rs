#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic analytics system that tallies rounds and publishes reports.

use maze_hunt_core::{Event, RoundReport};

/// Pure analytics system that folds world events into round reports.
#[derive(Debug, Default)]
pub struct Analytics {
    round: Option<RoundTally>,
    last_report: Option<RoundReport>,
}

impl Analytics {
    /// Creates a new analytics system without any tracked round.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the last round report published by the system, if any.
    #[must_use]
    pub fn last_report(&self) -> Option<&RoundReport> {
        self.last_report.as_ref()
    }

    /// Shots fired so far in the round being tracked.
    #[must_use]
    pub fn shots_fired(&self) -> u32 {
        self.round.map_or(0, |round| round.shots_fired)
    }

    /// Consumes world events and publishes `Event::RoundReportPublished`.
    ///
    /// Shots are only counted between `RoundStarted` and `RoundCleared`. A
    /// freshly configured maze abandons the round being tracked.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Event>) {
        for event in events {
            match event {
                Event::MazeConfigured { .. } => {
                    if self.round.take().is_some() {
                        log::debug!("maze replaced; abandoning tracked round");
                    }
                }
                Event::RoundStarted { enemy_count } => {
                    self.round = Some(RoundTally::new(*enemy_count));
                }
                Event::ShotFired { .. } => {
                    if let Some(round) = self.round.as_mut() {
                        round.shots_fired = round.shots_fired.saturating_add(1);
                    }
                }
                Event::RoundCleared {
                    elapsed,
                    eliminated,
                } => {
                    let Some(round) = self.round.take() else {
                        continue;
                    };
                    let report = RoundReport {
                        enemy_count: round.enemy_count,
                        eliminated: *eliminated,
                        shots_fired: round.shots_fired,
                        elapsed: *elapsed,
                    };
                    log::info!(
                        "round cleared in {:.2}s: {} eliminated with {} shots",
                        report.elapsed.as_secs_f32(),
                        report.eliminated,
                        report.shots_fired
                    );
                    self.last_report = Some(report);
                    out.push(Event::RoundReportPublished { report });
                }
                _ => {}
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct RoundTally {
    enemy_count: u32,
    shots_fired: u32,
}

impl RoundTally {
    const fn new(enemy_count: u32) -> Self {
        Self {
            enemy_count,
            shots_fired: 0,
        }
    }
}
