//! End-to-end acquisition attempts through the real Notecard client.

use kidtracker::app::commands::AppCommand;
use kidtracker::app::events::{AppEvent, AttemptOutcome};
use kidtracker::app::service::AppService;
use kidtracker::config::TrackerConfig;
use kidtracker::drivers::button::RequestFlag;
use kidtracker::fsm::StateId;
use kidtracker::notecard::NotecardClient;
use serde_json::json;

use crate::mock_hw::{MockClock, MockNotecard, RecordingSink};

struct Rig {
    app: AppService,
    flag: &'static RequestFlag,
    notecard: NotecardClient<MockNotecard>,
    clock: MockClock,
    sink: RecordingSink,
}

impl Rig {
    fn new(config: TrackerConfig, card: MockNotecard) -> Self {
        let flag: &'static RequestFlag = Box::leak(Box::new(RequestFlag::new()));
        let mut rig = Self {
            app: AppService::new(config, flag),
            flag,
            notecard: NotecardClient::new(card),
            clock: MockClock::new(),
            sink: RecordingSink::new(),
        };
        rig.app.start(&mut rig.notecard, &mut rig.sink);
        rig
    }

    fn press(&mut self) {
        self.flag.on_falling_edge(self.clock.now as u32);
    }

    fn run(&mut self) -> AttemptOutcome {
        self.app
            .run_attempt(&mut self.notecard, &mut self.clock, &mut self.sink)
            .expect("attempt should run")
            .outcome
    }

    fn tick(&mut self) -> StateId {
        self.app
            .tick(&mut self.notecard, &mut self.clock, &mut self.sink)
    }

    fn card(&self) -> &MockNotecard {
        self.notecard.transport()
    }
}

fn card() -> MockNotecard {
    MockNotecard::new()
}

#[test]
fn new_fix_sends_alert_and_restores_periodic() {
    let mut c = card();
    c.fix(100, 0.0, 0.0)
        .fix(100, 0.0, 0.0)
        .fix(100, 0.0, 0.0)
        .fix(100, 0.0, 0.0)
        .fix(105, 40.0, -73.0);
    let mut rig = Rig::new(TrackerConfig::default(), c);

    rig.press();
    assert_eq!(rig.run(), AttemptOutcome::Delivered);

    let card = rig.card();
    assert_eq!(
        card.names(),
        [
            "card.location",
            "card.location.mode",
            "card.location",
            "card.location",
            "card.location",
            "card.location",
            "note.add",
            "card.location.mode",
        ]
    );
    let commands = card.commands();
    assert_eq!(
        *commands[0],
        json!({"req": "card.location.mode", "mode": "continuous"})
    );
    assert_eq!(
        *commands[1],
        json!({
            "req": "note.add",
            "file": "alert.qo",
            "sync": true,
            "body": {
                "message": "Your kids are requesting you. https://maps.google.com/maps?q=40.000000000000,-73.000000000000"
            }
        })
    );
    assert_eq!(
        *commands[2],
        json!({"req": "card.location.mode", "mode": "periodic", "seconds": 120})
    );

    assert_eq!(rig.clock.delays, [2_000, 2_000, 2_000]);
    assert!(!rig.flag.is_pending());
    assert_eq!(rig.app.state(), StateId::Idle);
}

#[test]
fn events_describe_the_attempt() {
    let mut c = card();
    c.fix(100, 0.0, 0.0).fix(101, 1.5, 2.5);
    let mut rig = Rig::new(TrackerConfig::default(), c);
    rig.press();
    rig.run();

    let events = &rig.sink.events;
    assert_eq!(events[0], AppEvent::Started(StateId::Idle));
    let alert = events
        .iter()
        .find_map(|e| match e {
            AppEvent::AlertDispatched(r) => Some(*r),
            _ => None,
        })
        .expect("alert event");
    assert!(alert.sent);
    assert_eq!((alert.latitude, alert.longitude), (1.5, 2.5));

    let finished: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            AppEvent::AttemptFinished(s) => Some(*s),
            _ => None,
        })
        .collect();
    assert_eq!(finished.len(), 1);
    assert_eq!(finished[0].polls, 1);
    assert_eq!(finished[0].elapsed_ms, 0);

    assert!(events.contains(&AppEvent::StateChanged {
        from: StateId::Searching,
        to: StateId::Delivered,
    }));
    assert!(events.contains(&AppEvent::StateChanged {
        from: StateId::Delivered,
        to: StateId::Idle,
    }));
}

#[test]
fn stop_marker_ends_attempt_without_alert() {
    let mut c = card();
    c.fix(100, 0.0, 0.0).fix(100, 0.0, 0.0).stop(100);
    let mut rig = Rig::new(TrackerConfig::default(), c);
    rig.press();

    assert_eq!(rig.run(), AttemptOutcome::Stopped);
    let card = rig.card();
    assert_eq!(card.count("note.add"), 0);
    // Continuous mode is left in place.
    assert_eq!(card.count("card.location.mode"), 1);
    assert!(!rig.flag.is_pending());
}

#[test]
fn new_fix_wins_over_stop_marker() {
    let mut c = card();
    c.fix(100, 0.0, 0.0)
        .reply(json!({"time": 200, "lat": 3.0, "lon": 4.0, "stop": true}));
    let mut rig = Rig::new(TrackerConfig::default(), c);
    rig.press();

    assert_eq!(rig.run(), AttemptOutcome::Delivered);
    assert_eq!(rig.card().count("note.add"), 1);
}

#[test]
fn unchanged_fix_times_out_after_ten_minutes() {
    let mut c = card();
    c.location_fallback = Some(json!({"time": 100, "lat": 1.0, "lon": 1.0}));
    let mut rig = Rig::new(TrackerConfig::default(), c);
    rig.press();

    let summary = rig
        .app
        .run_attempt(&mut rig.notecard, &mut rig.clock, &mut rig.sink)
        .unwrap();
    assert_eq!(summary.outcome, AttemptOutcome::TimedOut);
    assert_eq!(summary.polls, 300);
    assert_eq!(summary.elapsed_ms, 600_000);

    let card = rig.card();
    assert_eq!(card.count("note.add"), 0);
    assert_eq!(card.count("card.location.mode"), 1);
    assert!(!rig.flag.is_pending());
}

#[test]
fn failure_restores_periodic_when_configured() {
    let config = TrackerConfig {
        restore_mode_on_failure: true,
        acquisition_timeout_secs: 10,
        ..TrackerConfig::default()
    };
    let mut c = card();
    c.location_fallback = Some(json!({"time": 100}));
    let mut rig = Rig::new(config, c);
    rig.press();

    assert_eq!(rig.run(), AttemptOutcome::TimedOut);
    let card = rig.card();
    let last = card.commands().last().copied().cloned();
    assert_eq!(
        last,
        Some(json!({"req": "card.location.mode", "mode": "periodic", "seconds": 120}))
    );
}

#[test]
fn silent_polls_keep_searching() {
    let mut c = card();
    c.fix(100, 0.0, 0.0).silence().silence().fix(101, 5.0, 6.0);
    let mut rig = Rig::new(TrackerConfig::default(), c);
    rig.press();

    assert_eq!(rig.run(), AttemptOutcome::Delivered);
    assert_eq!(rig.card().count("card.location"), 4);
    assert_eq!(rig.notecard.failure_count(), 2);
}

#[test]
fn silent_notecard_times_out() {
    let config = TrackerConfig {
        acquisition_timeout_secs: 20,
        ..TrackerConfig::default()
    };
    let mut rig = Rig::new(config, card());
    rig.press();

    assert_eq!(rig.run(), AttemptOutcome::TimedOut);
    // Baseline read plus ten polls.
    assert_eq!(rig.card().count("card.location"), 11);
    assert_eq!(rig.card().count("note.add"), 0);
}

#[test]
fn failed_baseline_treats_any_fix_as_new() {
    let mut c = card();
    c.silence().fix(100, 7.0, 8.0);
    let mut rig = Rig::new(TrackerConfig::default(), c);
    rig.press();

    assert_eq!(rig.run(), AttemptOutcome::Delivered);
}

#[test]
fn rejected_alert_still_restores_periodic() {
    let mut c = card();
    c.fix(100, 0.0, 0.0).fix(101, 1.0, 1.0);
    c.reject("note.add", "note: notefile not found");
    let mut rig = Rig::new(TrackerConfig::default(), c);
    rig.press();

    assert_eq!(rig.run(), AttemptOutcome::Delivered);
    assert!(rig.sink.events.iter().any(|e| matches!(
        e,
        AppEvent::AlertDispatched(r) if !r.sent
    )));
    assert_eq!(rig.card().count("note.add"), 1, "alert is not retried");
    assert_eq!(rig.card().count("card.location.mode"), 2);
}

#[test]
fn presses_during_attempt_are_coalesced() {
    let mut c = card();
    c.fix(100, 0.0, 0.0)
        .fix(100, 0.0, 0.0)
        .fix(100, 0.0, 0.0)
        .fix(101, 1.0, 1.0);
    let mut rig = Rig::new(TrackerConfig::default(), c);
    rig.press();

    while rig.tick() != StateId::Searching {}
    rig.press();
    rig.clock.now += 100;
    rig.press();
    while rig.tick() != StateId::Idle {}

    assert!(!rig.flag.is_pending());
    assert!(
        rig.app
            .run_attempt(&mut rig.notecard, &mut rig.clock, &mut rig.sink)
            .is_none()
    );
    assert_eq!(rig.card().count("note.add"), 1);
}

#[test]
fn idle_without_press_never_talks_to_notecard() {
    let mut rig = Rig::new(TrackerConfig::default(), card());
    for _ in 0..100 {
        assert_eq!(rig.tick(), StateId::Idle);
    }
    assert!(rig.card().requests.is_empty());
    assert!(rig.clock.delays.is_empty());
}

#[test]
fn second_press_starts_a_fresh_attempt() {
    let mut c = card();
    c.fix(100, 0.0, 0.0)
        .fix(101, 1.0, 1.0)
        .fix(101, 1.0, 1.0)
        .fix(102, 2.0, 2.0);
    let mut rig = Rig::new(TrackerConfig::default(), c);

    rig.press();
    assert_eq!(rig.run(), AttemptOutcome::Delivered);
    rig.clock.now += 1_000;
    rig.press();
    assert_eq!(rig.run(), AttemptOutcome::Delivered);
    assert_eq!(rig.card().count("note.add"), 2);
}

#[test]
fn software_request_runs_like_a_press() {
    let mut c = card();
    c.fix(100, 0.0, 0.0).fix(101, 1.0, 1.0);
    let mut rig = Rig::new(TrackerConfig::default(), c);

    rig.app
        .handle_command(AppCommand::RequestLocation, &mut rig.sink);
    assert_eq!(rig.run(), AttemptOutcome::Delivered);
}
