use std::time::Duration;

use glam::Vec3;
use maze_hunt_core::{AgentId, Event, RoundReport};
use maze_hunt_system_analytics::Analytics;

fn shot() -> Event {
    Event::ShotFired {
        origin: Vec3::new(0.0, 2.0, 0.0),
        direction: Vec3::NEG_Z,
    }
}

#[test]
fn cleared_round_publishes_report() {
    let mut analytics = Analytics::new();
    let mut emitted = Vec::new();

    analytics.handle(&[Event::RoundStarted { enemy_count: 2 }], &mut emitted);
    analytics.handle(
        &[
            shot(),
            Event::AgentEliminated {
                agent: AgentId::new(0),
            },
        ],
        &mut emitted,
    );
    analytics.handle(&[shot()], &mut emitted);
    assert!(emitted.is_empty(), "no report before the round clears");
    assert_eq!(analytics.shots_fired(), 2);

    analytics.handle(
        &[
            shot(),
            Event::AgentEliminated {
                agent: AgentId::new(1),
            },
            Event::RoundCleared {
                elapsed: Duration::from_secs(42),
                eliminated: 2,
            },
        ],
        &mut emitted,
    );

    let expected = RoundReport {
        enemy_count: 2,
        eliminated: 2,
        shots_fired: 3,
        elapsed: Duration::from_secs(42),
    };
    assert_eq!(
        emitted,
        vec![Event::RoundReportPublished { report: expected }]
    );
    assert_eq!(analytics.last_report(), Some(&expected));
    assert_eq!(analytics.shots_fired(), 0, "tally resets after clearing");
}

#[test]
fn restarting_a_round_resets_the_tally() {
    let mut analytics = Analytics::new();
    let mut emitted = Vec::new();

    analytics.handle(
        &[Event::RoundStarted { enemy_count: 5 }, shot(), shot()],
        &mut emitted,
    );
    analytics.handle(
        &[
            Event::RoundStarted { enemy_count: 0 },
            Event::TimeAdvanced {
                dt: Duration::from_millis(16),
            },
            Event::RoundCleared {
                elapsed: Duration::from_millis(16),
                eliminated: 0,
            },
        ],
        &mut emitted,
    );

    let Some(Event::RoundReportPublished { report }) = emitted.first() else {
        panic!("expected a published report, got {emitted:?}");
    };
    assert_eq!(report.enemy_count, 0);
    assert_eq!(report.shots_fired, 0);
    assert_eq!(report.accuracy(), None);
}

#[test]
fn duplicate_clear_events_publish_once() {
    let mut analytics = Analytics::new();
    let mut emitted = Vec::new();
    let cleared = Event::RoundCleared {
        elapsed: Duration::from_secs(3),
        eliminated: 1,
    };

    analytics.handle(
        &[
            Event::RoundStarted { enemy_count: 1 },
            shot(),
            cleared.clone(),
            cleared,
        ],
        &mut emitted,
    );

    assert_eq!(emitted.len(), 1);
    assert_eq!(
        analytics.last_report().and_then(RoundReport::accuracy),
        Some(1.0)
    );
}
