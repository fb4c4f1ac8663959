use shared::domain::TransparencyValue;

use crate::fakes::{assert_close, FakeLayer};
use crate::{PreviewController, SessionError, SessionState, TransparencySession};

fn value(percent: u8) -> TransparencyValue {
    TransparencyValue::new(percent).expect("in range")
}

#[test]
fn start_fails_on_empty_selection() {
    let result = TransparencySession::<FakeLayer>::start(Vec::new(), value(50), false);
    assert!(matches!(result, Err(SessionError::EmptySelection)));
}

#[test]
fn start_captures_each_target_exactly_once_before_any_mutation() {
    let basemap = FakeLayer::new(1, "Basemap", 0.2);
    let parcels = FakeLayer::new(2, "Parcels", 0.8);

    let session =
        TransparencySession::start(vec![basemap.clone(), parcels.clone()], value(50), true)
            .expect("start");

    assert_eq!(session.state(), SessionState::Active);
    assert_eq!(session.initial_value().percent(), 50);
    assert!(session.preview_enabled());
    assert_eq!(basemap.read_calls(), 1);
    assert_eq!(parcels.read_calls(), 1);
    assert_eq!(basemap.write_calls(), 0);
    assert_eq!(parcels.write_calls(), 0);
}

#[test]
fn failed_read_during_capture_aborts_start() {
    let basemap = FakeLayer::new(1, "Basemap", 0.2);
    let orphaned = FakeLayer::failing_reads(2, "Orphaned");

    let result = TransparencySession::start(vec![basemap.clone(), orphaned], value(50), true);

    assert!(matches!(
        result,
        Err(SessionError::TargetUnavailable { ref name, .. }) if name == "Orphaned"
    ));
    assert_eq!(basemap.write_calls(), 0);
}

#[test]
fn scrubbing_with_preview_applies_inverse_opacity_then_cancel_restores() {
    let basemap = FakeLayer::new(1, "Basemap", 0.2);
    let parcels = FakeLayer::new(2, "Parcels", 0.8);
    let mut session =
        TransparencySession::start(vec![basemap.clone(), parcels.clone()], value(50), true)
            .expect("start");

    session.on_value_changed(value(30)).expect("preview 30");
    assert_close(basemap.current_opacity(), 0.70);
    assert_close(parcels.current_opacity(), 0.70);

    session.on_value_changed(value(80)).expect("preview 80");
    assert_close(basemap.current_opacity(), 0.20);
    assert_close(parcels.current_opacity(), 0.20);

    session.cancel().expect("cancel");
    assert_close(basemap.current_opacity(), 0.2);
    assert_close(parcels.current_opacity(), 0.8);
    assert_eq!(session.state(), SessionState::Cancelled);
}

#[test]
fn preview_disabled_leaves_targets_untouched_until_confirm() {
    let basemap = FakeLayer::new(1, "Basemap", 0.2);
    let parcels = FakeLayer::new(2, "Parcels", 0.8);
    let mut session =
        TransparencySession::start(vec![basemap.clone(), parcels.clone()], value(50), false)
            .expect("start");

    session.on_value_changed(value(30)).expect("value change");
    assert_eq!(basemap.write_calls(), 0);
    assert_eq!(parcels.write_calls(), 0);
    assert_close(basemap.current_opacity(), 0.2);
    assert_close(parcels.current_opacity(), 0.8);

    let result = session.confirm(value(30)).expect("confirm");
    assert_close(basemap.current_opacity(), 0.70);
    assert_close(parcels.current_opacity(), 0.70);
    assert_eq!(result.final_value.percent(), 30);
    assert_close(result.applied_opacity, 0.70);
    assert_eq!(result.target_count, 2);
    assert!(!result.preview_enabled);
}

#[test]
fn cancel_with_preview_disabled_never_writes() {
    let basemap = FakeLayer::new(1, "Basemap", 0.4);
    let mut session =
        TransparencySession::start(vec![basemap.clone()], value(50), false).expect("start");

    session.on_value_changed(value(90)).expect("value change");
    session.cancel().expect("cancel");

    assert_eq!(basemap.write_calls(), 0);
    assert_close(basemap.current_opacity(), 0.4);
}

#[test]
fn confirm_overrides_whatever_the_preview_left_behind() {
    let basemap = FakeLayer::new(1, "Basemap", 0.2);
    let mut session =
        TransparencySession::start(vec![basemap.clone()], value(50), true).expect("start");

    session.on_value_changed(value(30)).expect("preview");
    let result = session.confirm(value(80)).expect("confirm");

    assert_close(basemap.current_opacity(), 0.20);
    assert_close(result.applied_opacity, 0.20);
    assert_eq!(session.state(), SessionState::Committed);
}

#[test]
fn second_confirm_fails_with_invalid_state() {
    let basemap = FakeLayer::new(1, "Basemap", 0.2);
    let mut session =
        TransparencySession::start(vec![basemap], value(50), false).expect("start");

    session.confirm(value(30)).expect("first confirm");
    let err = session.confirm(value(30)).expect_err("second confirm");

    assert!(matches!(
        err,
        SessionError::InvalidSessionState {
            operation: "confirm",
            state: SessionState::Committed,
        }
    ));
}

#[test]
fn every_operation_after_cancel_fails_with_invalid_state() {
    let basemap = FakeLayer::new(1, "Basemap", 0.2);
    let mut session =
        TransparencySession::start(vec![basemap], value(50), true).expect("start");

    session.cancel().expect("cancel");

    assert!(matches!(
        session.on_value_changed(value(10)),
        Err(SessionError::InvalidSessionState {
            state: SessionState::Cancelled,
            ..
        })
    ));
    assert!(matches!(
        session.confirm(value(10)),
        Err(SessionError::InvalidSessionState { .. })
    ));
    assert!(matches!(
        session.cancel(),
        Err(SessionError::InvalidSessionState {
            operation: "cancel",
            ..
        })
    ));
}

#[test]
fn rollback_right_after_capture_restores_pre_capture_opacity() {
    let basemap = FakeLayer::new(1, "Basemap", 0.35);
    let mut controller =
        PreviewController::capture(vec![basemap.clone()], true).expect("capture");

    controller.rollback();

    assert_close(basemap.current_opacity(), 0.35);
}

#[test]
fn rollback_twice_matches_rollback_once() {
    let basemap = FakeLayer::new(1, "Basemap", 0.35);
    let mut controller =
        PreviewController::capture(vec![basemap.clone()], true).expect("capture");

    controller.preview(value(90));
    controller.rollback();
    let after_first = basemap.current_opacity();
    controller.rollback();

    assert_close(basemap.current_opacity(), after_first);
    assert_close(basemap.current_opacity(), 0.35);
}

#[test]
fn broadcast_continues_past_a_failing_target() {
    let basemap = FakeLayer::new(1, "Basemap", 0.2);
    let broken = FakeLayer::failing_writes(2, "Broken", 0.5);
    let labels = FakeLayer::new(3, "Labels", 0.6);
    let mut controller = PreviewController::capture(
        vec![basemap.clone(), broken.clone(), labels.clone()],
        true,
    )
    .expect("capture");

    controller.preview(value(30));
    assert_close(basemap.current_opacity(), 0.70);
    assert_close(broken.current_opacity(), 0.5);
    assert_close(labels.current_opacity(), 0.70);
    assert_eq!(broken.write_calls(), 1);
    assert_eq!(broken.repaints(), 0);

    controller.rollback();
    assert_close(basemap.current_opacity(), 0.2);
    assert_close(labels.current_opacity(), 0.6);
    assert_eq!(broken.write_calls(), 2);
}

#[test]
fn repaint_follows_every_successful_apply() {
    let basemap = FakeLayer::new(1, "Basemap", 0.2);
    let mut controller =
        PreviewController::capture(vec![basemap.clone()], true).expect("capture");

    controller.preview(value(30));
    controller.commit(value(40));

    assert_eq!(basemap.repaints(), 2);
}
