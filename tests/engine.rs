use interval_timer::config::{ChangeRule, GlobalTimerDef, TimerConfig, TimerDef};
use interval_timer::control::ControlAction;
use interval_timer::timer::{Engine, EngineOptions, EntityId};

fn config(global: u32, sides: Vec<TimerDef>) -> TimerConfig {
    TimerConfig {
        global_timer: GlobalTimerDef {
            frames: global,
            ..GlobalTimerDef::default()
        },
        timers: sides,
        ..TimerConfig::default()
    }
}

fn side(title: &str, frames: u32, changes: Vec<ChangeRule>) -> TimerDef {
    TimerDef {
        title: title.into(),
        frames,
        changes,
        ..TimerDef::default()
    }
}

fn started(config: &TimerConfig) -> Engine {
    let mut engine = Engine::from_config(config, EngineOptions::default());
    engine.apply(ControlAction::PauseResume);
    engine
}

fn text(engine: &Engine, id: EntityId) -> String {
    engine
        .readouts()
        .into_iter()
        .find(|r| r.id == id)
        .map(|r| r.text)
        .expect("readout")
}

#[test]
fn side_timer_reloads_after_showing_zero() {
    let mut engine = started(&config(3000, vec![side("a", 10, vec![])]));
    for _ in 0..10 {
        engine.tick();
    }
    assert_eq!(text(&engine, EntityId::Side(0)), "0000");
    engine.tick();
    assert_eq!(text(&engine, EntityId::Side(0)), "0010");
    assert_eq!(engine.sides()[0].remaining_frames(), 10);
}

#[test]
fn overwrite_rule_fires_once_when_global_reaches_trigger() {
    let rule = ChangeRule {
        trigger_frame: 50,
        change_to: 20,
        overwrite: true,
    };
    let mut engine = started(&config(200, vec![side("a", 100, vec![rule])]));
    for _ in 0..149 {
        engine.tick();
    }
    assert_eq!(engine.sides()[0].fired_rules(), 0);

    engine.tick();
    assert_eq!(engine.global().remaining_frames(), 50);
    assert_eq!(engine.sides()[0].fired_rules(), 1);
    assert_eq!(text(&engine, EntityId::Side(0)), "0020");

    engine.tick();
    assert_eq!(engine.sides()[0].remaining_frames(), 19);
    assert_eq!(engine.sides()[0].max_frames(), 20);
}

#[test]
fn non_overwrite_rule_applies_at_next_reload() {
    let rule = ChangeRule {
        trigger_frame: 95,
        change_to: 3,
        overwrite: false,
    };
    let mut engine = started(&config(100, vec![side("a", 8, vec![rule])]));
    for _ in 0..5 {
        engine.tick();
    }
    assert_eq!(engine.sides()[0].max_frames(), 3);
    assert_eq!(engine.sides()[0].remaining_frames(), 3);
    for _ in 0..4 {
        engine.tick();
    }
    assert_eq!(engine.sides()[0].remaining_frames(), 3);
}

#[test]
fn global_exhaustion_stops_the_run() {
    let mut engine = started(&config(5, vec![side("a", 100, vec![])]));
    for _ in 0..5 {
        engine.tick();
    }
    assert!(!engine.is_running());
    assert_eq!(text(&engine, EntityId::Global), "0000");
    let side_before = engine.sides()[0].remaining_frames();

    assert!(engine.tick().is_none());
    assert_eq!(engine.sides()[0].remaining_frames(), side_before);
    assert_eq!(engine.frames_elapsed(), 5);
}

#[test]
fn reset_is_idempotent_and_rearms_rules() {
    let rule = ChangeRule {
        trigger_frame: 90,
        change_to: 7,
        overwrite: true,
    };
    let cfg = config(100, vec![side("a", 40, vec![rule])]);
    let mut engine = started(&cfg);
    for _ in 0..20 {
        engine.tick();
    }
    engine.apply(ControlAction::Reset);
    let first: Vec<String> = engine.readouts().into_iter().map(|r| r.text).collect();
    engine.apply(ControlAction::Reset);
    let second: Vec<String> = engine.readouts().into_iter().map(|r| r.text).collect();

    assert_eq!(first, second);
    assert_eq!(first, vec!["0100".to_string(), "0040".to_string()]);
    assert!(!engine.is_running());
    assert_eq!(engine.sides()[0].fired_rules(), 0);
    assert_eq!(engine.sides()[0].max_frames(), 40);
}

#[test]
fn empty_timer_list_runs_only_the_global_counter() {
    let mut engine = started(&config(30, vec![]));
    let readouts = engine.readouts();
    assert_eq!(readouts.len(), 1);
    assert_eq!(readouts[0].id, EntityId::Global);
    assert_eq!(readouts[0].title, "Global");
    engine.tick();
    assert_eq!(text(&engine, EntityId::Global), "0029");
}

#[test]
fn pausing_keeps_counters() {
    let mut engine = started(&config(3000, vec![side("a", 500, vec![])]));
    for _ in 0..3 {
        engine.tick();
    }
    engine.apply(ControlAction::PauseResume);
    assert!(engine.tick().is_none());
    assert_eq!(engine.global().remaining_frames(), 2997);
    engine.apply(ControlAction::PauseResume);
    assert!(engine.tick().is_some());
    assert_eq!(engine.global().remaining_frames(), 2996);
}

#[test]
fn padding_follows_the_configured_total() {
    let mut engine = started(&config(123456, vec![side("a", 7, vec![])]));
    engine.tick();
    assert_eq!(text(&engine, EntityId::Global), "123455");
    assert_eq!(text(&engine, EntityId::Side(0)), "0006");
}
