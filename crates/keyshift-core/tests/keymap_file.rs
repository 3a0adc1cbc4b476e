use keyshift_core::keycodes::*;
use keyshift_core::{load_config, Action, Dispatcher, HidReport, KeyCode, KeyEdge, KeyEvent};
use pretty_assertions::assert_eq;
use std::path::PathBuf;
use std::time::{Duration, Instant};

const ESC_CTRL: KeyCode = KeyCode::user(20);
const PAREN_SHIFT: KeyCode = KeyCode::user(21);
const WORD_LEFT: KeyCode = KeyCode::user(22);

fn load_dispatcher() -> Dispatcher {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let mut p = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    p.push("..");
    p.push("..");
    p.push("keymaps");
    p.push("kwf-extended.json");

    let config = load_config(&p).expect("load kwf-extended.json");
    Dispatcher::new(config)
}

fn at(t0: Instant, ms: u64) -> Instant {
    t0 + Duration::from_millis(ms)
}

fn run(d: &mut Dispatcher, key: KeyCode, edge: KeyEdge, t: Instant, out: &mut Vec<Action>) {
    out.extend(d.on_event(KeyEvent { key, edge, t }));
}

#[test]
fn rolled_key_does_not_cancel_tap() {
    let mut d = load_dispatcher();
    let t0 = Instant::now();
    let mut all = Vec::new();

    run(&mut d, ESC_CTRL, KeyEdge::Down, t0, &mut all);
    run(&mut d, KC_A, KeyEdge::Down, at(t0, 40), &mut all);
    run(&mut d, ESC_CTRL, KeyEdge::Up, at(t0, 120), &mut all);
    run(&mut d, KC_A, KeyEdge::Up, at(t0, 160), &mut all);

    assert_eq!(
        all,
        vec![
            Action::Press(KC_LCTRL),
            Action::Press(KC_A),
            Action::Release(KC_LCTRL),
            Action::Press(KC_ESCAPE),
            Action::Release(KC_ESCAPE),
            Action::Release(KC_A),
        ]
    );
}

#[test]
fn hold_past_timeout_is_modifier_only() {
    let mut d = load_dispatcher();
    let t0 = Instant::now();
    let mut all = Vec::new();

    run(&mut d, ESC_CTRL, KeyEdge::Down, t0, &mut all);
    run(&mut d, KC_C, KeyEdge::Down, at(t0, 350), &mut all);
    run(&mut d, KC_C, KeyEdge::Up, at(t0, 380), &mut all);
    run(&mut d, ESC_CTRL, KeyEdge::Up, at(t0, 400), &mut all);

    assert_eq!(
        all,
        vec![
            Action::Press(KC_LCTRL),
            Action::Press(KC_C),
            Action::Release(KC_C),
            Action::Release(KC_LCTRL),
        ]
    );
}

#[test]
fn tap_threshold_one_unit_either_side() {
    let t0 = Instant::now();

    let mut d = load_dispatcher();
    let mut all = Vec::new();
    run(&mut d, PAREN_SHIFT, KeyEdge::Down, t0, &mut all);
    run(&mut d, PAREN_SHIFT, KeyEdge::Up, at(t0, 299), &mut all);
    assert_eq!(
        all,
        vec![
            Action::Press(KC_LSHIFT),
            Action::Release(KC_LSHIFT),
            Action::Press(KC_LSHIFT),
            Action::Press(KC_9),
            Action::Release(KC_9),
            Action::Release(KC_LSHIFT),
        ]
    );

    let mut d = load_dispatcher();
    let mut all = Vec::new();
    run(&mut d, PAREN_SHIFT, KeyEdge::Down, t0, &mut all);
    run(&mut d, PAREN_SHIFT, KeyEdge::Up, at(t0, 301), &mut all);
    assert_eq!(
        all,
        vec![Action::Press(KC_LSHIFT), Action::Release(KC_LSHIFT)]
    );
}

#[test]
fn mod_tap_shift_selects_high_level() {
    // The Shift-holding mod-tap key is read by the capitalized '(' / '[' key.
    let mut d = load_dispatcher();
    let t0 = Instant::now();
    let mut report = HidReport::new();

    d.drive(KeyEvent::new(PAREN_SHIFT, true, t0), &mut report);
    d.drive(KeyEvent::new(KeyCode::user(4), true, at(t0, 350)), &mut report);
    assert!(report.is_down(KC_LBRACKET));
    assert!(!report.is_down(KC_LSHIFT));

    d.drive(KeyEvent::new(KeyCode::user(4), false, at(t0, 380)), &mut report);
    assert!(report.is_down(KC_LSHIFT));

    d.drive(KeyEvent::new(PAREN_SHIFT, false, at(t0, 400)), &mut report);
    assert!(report.is_clear());
}

#[test]
fn toggle_with_ctrl_shift() {
    let mut d = load_dispatcher();
    let t0 = Instant::now();
    let mut all = Vec::new();

    run(&mut d, KC_LCTRL, KeyEdge::Down, t0, &mut all);
    run(&mut d, KC_LSHIFT, KeyEdge::Down, t0, &mut all);
    all.clear();

    run(&mut d, WORD_LEFT, KeyEdge::Down, at(t0, 10), &mut all);
    assert_eq!(
        all,
        vec![
            Action::Release(KC_LCTRL),
            Action::Press(KC_LALT),
            Action::Press(KC_LEFT),
            Action::Release(KC_LALT),
            Action::Press(KC_LCTRL),
        ]
    );

    all.clear();
    run(&mut d, WORD_LEFT, KeyEdge::Up, at(t0, 20), &mut all);
    assert_eq!(
        all,
        vec![
            Action::Release(KC_LCTRL),
            Action::Press(KC_LALT),
            Action::Release(KC_LEFT),
            Action::Release(KC_LALT),
            Action::Press(KC_LCTRL),
        ]
    );
    assert!(d.modifiers().is_settled());
}
