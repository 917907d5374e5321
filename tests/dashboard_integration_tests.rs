//! Dashboard integration tests: full sessions driven through the public API
//! with a scripted input feed and an in-memory surface.

use std::cell::RefCell;
use std::rc::Rc;

use joint_dashboard::prelude::*;
use proptest::prelude::*;

fn list(specs: &[(&str, f64, f64, f64)]) -> ParameterList {
    ParameterList::from_specs(
        specs
            .iter()
            .map(|&(name, min, max, value)| ParameterSpec::new(name, min, max, value)),
    )
    .expect("valid parameters")
}

fn ten_joints() -> ParameterList {
    let specs: Vec<ParameterSpec> = (0..10)
        .map(|i| ParameterSpec::new(format!("joint{i}"), 0.0, 1.0, 0.5))
        .collect();
    ParameterList::from_specs(specs).expect("valid parameters")
}

fn session<H: MutationHook>(
    params: ParameterList,
    hook: H,
    msgs: impl IntoIterator<Item = DashboardMsg>,
) -> (Dashboard<H>, SessionSummary, TextSurface) {
    let mut dashboard = Dashboard::new(
        params,
        &DashboardConfig::default(),
        HookPolicy::Continue,
        hook,
    );
    let mut input = ScriptedInput::new(msgs);
    let mut surface = TextSurface::new();
    let summary = dashboard
        .run(&mut input, &mut surface)
        .expect("session completes");
    (dashboard, summary, surface)
}

fn visible_names(frame: &Frame) -> Vec<&str> {
    frame.rows.iter().map(|row| row.name.as_str()).collect()
}

// ══════════════════════════════════════════════════════════════════
// End-to-end scenario
// ══════════════════════════════════════════════════════════════════

#[test]
fn down_right_right_quit_updates_b_and_notifies_twice() {
    let (dashboard, summary, surface) = session(
        list(&[("a", 0.0, 1.0, 0.5), ("b", 0.0, 1.0, 0.5)]),
        RecordingHook::default(),
        [
            DashboardMsg::MoveDown,
            DashboardMsg::Increase,
            DashboardMsg::Increase,
            DashboardMsg::Quit,
        ],
    );

    assert_eq!(summary.state, SessionState::Exiting);
    assert_eq!(summary.selected, Some(1));
    assert!((summary.params.get(1).unwrap().value() - 0.6).abs() < 1e-9);
    assert!((summary.params.get(0).unwrap().value() - 0.5).abs() < 1e-12);

    let calls = &dashboard.hook().calls;
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].0, "b");
    assert!((calls[0].1 - 0.55).abs() < 1e-9);
    assert_eq!(calls[1].0, "b");
    assert!((calls[1].1 - 0.6).abs() < 1e-9);

    let last = surface.last().expect("at least one frame");
    let b_line = last
        .iter()
        .find(|line| line.contains(" b "))
        .expect("row for b is drawn");
    assert!(b_line.contains('*'), "b row carries the selection marker");
    assert!(b_line.contains("0.6000"), "value column is cut, not rounded");
}

#[test]
fn every_frame_has_panel_dimensions() {
    let (_, _, surface) = session(
        ten_joints(),
        NoopHook,
        [DashboardMsg::MoveDown, DashboardMsg::Increase, DashboardMsg::Other],
    );
    let config = DashboardConfig::default();
    for frame in surface.frames() {
        assert_eq!(frame.len(), usize::from(config.panel_height));
        for line in frame {
            assert_eq!(line.chars().count(), usize::from(config.panel_width));
        }
    }
}

#[test]
fn title_and_footer_sit_on_the_border() {
    let (_, _, surface) = session(
        list(&[("a", 0.0, 1.0, 0.5)]),
        NoopHook,
        std::iter::empty(),
    );
    let first = &surface.frames()[0];
    assert!(first[0].starts_with("┌─ Joint Control "));
    assert!(
        first
            .last()
            .unwrap()
            .contains(" use arrow keys, or 'q' to quit ")
    );
}

// ══════════════════════════════════════════════════════════════════
// Windowing through the controller
// ══════════════════════════════════════════════════════════════════

#[test]
fn window_follows_selection_down_a_long_list() {
    let mut dashboard = Dashboard::new(
        ten_joints(),
        &DashboardConfig::default(),
        HookPolicy::Continue,
        NoopHook,
    );
    assert_eq!(
        visible_names(&dashboard.frame()),
        ["joint0", "joint1", "joint2", "joint3", "joint4", "joint5", "joint6"]
    );

    for _ in 0..5 {
        dashboard.handle(DashboardMsg::MoveDown).unwrap();
    }
    assert_eq!(dashboard.model().window(), 2..9);
    let frame = dashboard.frame();
    assert_eq!(frame.rows[3].name, "joint5");
    assert!(frame.rows[3].selected);

    for _ in 0..10 {
        dashboard.handle(DashboardMsg::MoveDown).unwrap();
    }
    assert_eq!(dashboard.model().selected, Some(9));
    assert_eq!(dashboard.model().window(), 3..10);
    assert!(dashboard.frame().rows.last().unwrap().selected);
}

#[test]
fn short_list_shows_everything() {
    let mut dashboard = Dashboard::new(
        list(&[
            ("a", 0.0, 1.0, 0.1),
            ("b", 0.0, 1.0, 0.2),
            ("c", 0.0, 1.0, 0.3),
            ("d", 0.0, 1.0, 0.4),
        ]),
        &DashboardConfig::default(),
        HookPolicy::Continue,
        NoopHook,
    );
    dashboard.handle(DashboardMsg::MoveDown).unwrap();
    dashboard.handle(DashboardMsg::MoveDown).unwrap();
    assert_eq!(dashboard.model().window(), 0..4);
    assert_eq!(visible_names(&dashboard.frame()), ["a", "b", "c", "d"]);
}

#[test]
fn selection_does_not_wrap() {
    let (_, summary, _) = session(
        list(&[("a", 0.0, 1.0, 0.5), ("b", 0.0, 1.0, 0.5)]),
        NoopHook,
        [DashboardMsg::MoveUp, DashboardMsg::MoveUp],
    );
    assert_eq!(summary.selected, Some(0));

    let (_, summary, _) = session(
        list(&[("a", 0.0, 1.0, 0.5), ("b", 0.0, 1.0, 0.5)]),
        NoopHook,
        [DashboardMsg::MoveDown, DashboardMsg::MoveDown, DashboardMsg::MoveDown],
    );
    assert_eq!(summary.selected, Some(1));
}

// ══════════════════════════════════════════════════════════════════
// Clamping, reset and hooks
// ══════════════════════════════════════════════════════════════════

#[test]
fn pressing_past_the_bound_keeps_notifying_with_the_clamped_value() {
    let msgs = std::iter::repeat_n(DashboardMsg::Increase, 30);
    let (dashboard, summary, _) = session(
        list(&[("knees", 0.0, 3.0, 2.9)]),
        RecordingHook::default(),
        msgs,
    );
    assert_eq!(summary.params.get(0).unwrap().value(), 3.0);
    let calls = &dashboard.hook().calls;
    assert_eq!(calls.len(), 30);
    assert!(calls.iter().all(|(_, v)| *v <= 3.0));
    assert_eq!(calls.last().unwrap().1, 3.0);
}

#[test]
fn reset_all_zeroes_into_bounds_and_skips_unchanged() {
    let (dashboard, summary, _) = session(
        list(&[
            ("hip", -1.0, 1.0, 0.4),
            ("zero", -1.0, 1.0, 0.0),
            ("toes", 1.0, 2.0, 1.5),
        ]),
        RecordingHook::default(),
        [DashboardMsg::ResetAll],
    );
    let values: Vec<f64> = summary.params.iter().map(Parameter::value).collect();
    assert_eq!(values, [0.0, 0.0, 1.0]);
    let names: Vec<&str> = dashboard
        .hook()
        .calls
        .iter()
        .map(|(n, _)| n.as_str())
        .collect();
    assert_eq!(names, ["hip", "toes"]);
}

#[test]
fn degenerate_bounds_draw_marker_at_start() {
    let dashboard = Dashboard::new(
        list(&[("fixed", 1.0, 1.0, 1.0)]),
        &DashboardConfig::default(),
        HookPolicy::Continue,
        NoopHook,
    );
    assert_eq!(dashboard.frame().rows[0].bar, "|!..........|");
}

#[test]
fn empty_list_is_an_empty_panel() {
    let (dashboard, summary, surface) = session(
        ParameterList::default(),
        RecordingHook::default(),
        [
            DashboardMsg::MoveDown,
            DashboardMsg::Increase,
            DashboardMsg::ResetAll,
        ],
    );
    assert!(summary.params.is_empty());
    assert_eq!(summary.selected, None);
    assert!(dashboard.hook().calls.is_empty());
    assert!(surface.frames().iter().all(|f| f == &surface.frames()[0]));
}

#[test]
fn channel_hook_delivers_every_change_in_order() {
    let (hook, rx) = ChannelHook::bounded(64);
    let (dashboard, _, _) = session(
        list(&[("a", 0.0, 1.0, 0.5), ("b", 0.0, 1.0, 0.5)]),
        hook,
        [
            DashboardMsg::Increase,
            DashboardMsg::MoveDown,
            DashboardMsg::Decrease,
            DashboardMsg::MoveUp,
            DashboardMsg::Decrease,
        ],
    );
    drop(dashboard);

    let updates: Vec<ValueUpdate> = rx.iter().collect();
    let seen: Vec<(u64, &str)> = updates.iter().map(|u| (u.seq, u.name.as_str())).collect();
    assert_eq!(seen, [(1, "a"), (2, "b"), (3, "a")]);
    assert!((updates[2].value - 0.5).abs() < 1e-9);
}

#[test]
fn closed_channel_under_continue_policy_shows_status_and_counts() {
    let (hook, rx) = ChannelHook::bounded(1);
    drop(rx);
    let (dashboard, summary, surface) = session(
        list(&[("a", 0.0, 1.0, 0.5)]),
        hook,
        [DashboardMsg::Increase],
    );
    assert_eq!(summary.hook_failures, 1);
    assert!((summary.params.get(0).unwrap().value() - 0.55).abs() < 1e-9);
    assert!(dashboard.frame().status.unwrap().contains("JD-2002"));
    assert!(surface.last().unwrap()[2].contains("JD-2002"));
}

#[test]
fn abort_policy_surfaces_the_hook_error() {
    let mut dashboard = Dashboard::new(
        list(&[("a", 0.0, 1.0, 0.5)]),
        &DashboardConfig::default(),
        HookPolicy::Abort,
        |name: &str, _value: f64| -> Result<()> { Err(JdError::hook(name, "bus offline")) },
    );
    let mut input = ScriptedInput::new([DashboardMsg::Decrease, DashboardMsg::Quit]);
    let mut surface = TextSurface::new();
    let err = dashboard.run(&mut input, &mut surface).unwrap_err();
    assert!(err.to_string().contains("bus offline"));
    assert_eq!(dashboard.model().state, SessionState::Exiting);
}

#[test]
fn hook_sees_value_already_applied_before_redraw() {
    let observed = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&observed);
    let (_, _, surface) = session(
        list(&[("a", 0.0, 1.0, 0.5)]),
        move |name: &str, value: f64| -> Result<()> {
            sink.borrow_mut().push((name.to_string(), value));
            Ok(())
        },
        [DashboardMsg::Decrease],
    );
    assert_eq!(observed.borrow().len(), 1);
    assert!((observed.borrow()[0].1 - 0.45).abs() < 1e-9);
    // initial frame + the redraw that follows the hook call
    assert_eq!(surface.frames().len(), 2);
    assert!(surface.frames()[1].iter().any(|l| l.contains("0.45")));
}

#[test]
fn redraw_without_input_is_identical() {
    let dashboard = Dashboard::new(
        ten_joints(),
        &DashboardConfig::default(),
        HookPolicy::Continue,
        NoopHook,
    );
    let mut surface = TextSurface::new();
    surface.draw(&dashboard.frame()).unwrap();
    surface.draw(&dashboard.frame()).unwrap();
    assert_eq!(surface.frames()[0], surface.frames()[1]);
}

// ══════════════════════════════════════════════════════════════════
// Properties
// ══════════════════════════════════════════════════════════════════

fn arb_msg() -> impl Strategy<Value = DashboardMsg> {
    prop_oneof![
        Just(DashboardMsg::MoveUp),
        Just(DashboardMsg::MoveDown),
        Just(DashboardMsg::Increase),
        Just(DashboardMsg::Decrease),
        Just(DashboardMsg::Other),
        Just(DashboardMsg::Resized),
    ]
}

proptest! {
    #[test]
    fn sessions_keep_values_in_bounds_and_selection_visible(
        msgs in prop::collection::vec(arb_msg(), 0..80),
    ) {
        let edits = msgs
            .iter()
            .filter(|m| matches!(m, DashboardMsg::Increase | DashboardMsg::Decrease))
            .count();
        let (dashboard, summary, surface) = session(ten_joints(), RecordingHook::default(), msgs);

        prop_assert_eq!(dashboard.hook().calls.len(), edits);
        for param in &summary.params {
            let (min, max) = param.bounds();
            prop_assert!(min <= param.value() && param.value() <= max);
        }
        for (_, value) in &dashboard.hook().calls {
            prop_assert!((0.0..=1.0).contains(value));
        }
        let window = dashboard.model().window();
        prop_assert_eq!(window.len(), 7);
        prop_assert!(window.contains(&summary.selected.unwrap()));
        let last = surface.last().unwrap();
        prop_assert_eq!(last.iter().filter(|l| l.contains('*')).count(), 1);
    }
}
