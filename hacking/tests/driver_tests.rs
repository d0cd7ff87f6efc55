use std::time::Duration;

use hacking::config::HackConfig;
use hacking::dice::ScriptedDice;
use hacking::difficulty::MatrixSize;
use hacking::driver::TICK_INTERVAL;
use hacking::error::DriverError;
use hacking::{HackAction, HackPhase, HackSession, Modification, SessionDriver};
use tokio::time::sleep;

fn timed_session(draws: &[u8]) -> HackSession<ScriptedDice> {
    let config = HackConfig::new(6, 0, 4, MatrixSize::Four, 30);
    HackSession::new(config, ScriptedDice::new(draws.iter().copied()))
}

fn session_with(config: HackConfig, draws: &[u8]) -> HackSession<ScriptedDice> {
    HackSession::new(config, ScriptedDice::new(draws.iter().copied()))
}

#[tokio::test(start_paused = true)]
async fn countdown_ticks_once_per_second_until_expiry() {
    let (handle, task) = SessionDriver::spawn(timed_session(&[1, 2, 3, 4]), TICK_INTERVAL);

    let report = handle.apply(HackAction::RollMatrix).await.expect("roll");
    assert!(report.applied);
    assert_eq!(report.snapshot.time_left, 30);
    assert!(report.snapshot.countdown_running);

    sleep(Duration::from_millis(10_500)).await;
    assert_eq!(handle.state().await.expect("state").time_left, 20);

    sleep(Duration::from_secs(25)).await;
    let snapshot = handle.state().await.expect("state");
    assert_eq!(snapshot.time_left, 0);
    assert!(snapshot.timer_expired);
    assert!(snapshot.clock_ran_out);
    assert!(snapshot.hack_complete);
    assert_eq!(snapshot.phase, HackPhase::Complete);

    handle.shutdown();
    let session = task.await.expect("driver task");
    assert_eq!(session.time_left(), 0);
}

#[tokio::test(start_paused = true)]
async fn pause_freezes_the_countdown() {
    let (handle, _task) = SessionDriver::spawn(timed_session(&[1, 2, 3, 4]), TICK_INTERVAL);
    handle.apply(HackAction::RollMatrix).await.expect("roll");

    sleep(Duration::from_millis(5_500)).await;
    let paused = handle.apply(HackAction::TogglePause).await.expect("pause");
    assert!(paused.applied);
    assert_eq!(paused.snapshot.time_left, 25);
    assert!(!paused.snapshot.countdown_running);

    sleep(Duration::from_secs(10)).await;
    assert_eq!(handle.state().await.expect("state").time_left, 25);

    let resumed = handle.apply(HackAction::TogglePause).await.expect("resume");
    assert!(!resumed.snapshot.hack_paused);
    sleep(Duration::from_millis(2_500)).await;
    assert_eq!(handle.state().await.expect("state").time_left, 23);
}

#[tokio::test(start_paused = true)]
async fn rerolling_the_matrix_replaces_the_ticker() {
    let (handle, _task) =
        SessionDriver::spawn(timed_session(&[1, 2, 3, 4, 1, 2, 3, 4]), TICK_INTERVAL);
    handle.apply(HackAction::RollMatrix).await.expect("roll");

    sleep(Duration::from_millis(3_500)).await;
    let first = handle.state().await.expect("state");
    assert_eq!(first.time_left, 27);

    let rerolled = handle.apply(HackAction::RollMatrix).await.expect("reroll");
    assert_eq!(rerolled.snapshot.time_left, 30);
    assert!(rerolled.snapshot.generation > first.generation);

    // Only the new run's ticker fires: one tick at +1s, nothing from the old cadence.
    sleep(Duration::from_millis(1_200)).await;
    assert_eq!(handle.state().await.expect("state").time_left, 29);
}

#[tokio::test(start_paused = true)]
async fn ending_the_hack_stops_the_countdown() {
    let (handle, _task) = SessionDriver::spawn(timed_session(&[1, 2, 3, 4]), TICK_INTERVAL);
    handle.apply(HackAction::RollMatrix).await.expect("roll");
    sleep(Duration::from_millis(2_500)).await;

    let ended = handle.apply(HackAction::EndHack).await.expect("end");
    let again = handle.apply(HackAction::EndHack).await.expect("end again");
    assert_eq!(ended.snapshot, again.snapshot);
    assert!(again.snapshot.hack_complete);

    sleep(Duration::from_secs(10)).await;
    assert_eq!(handle.state().await.expect("state").time_left, 28);
}

#[tokio::test(start_paused = true)]
async fn resolving_the_matrix_stops_the_countdown() {
    let config = HackConfig::new(1, 0, 4, MatrixSize::Two, 30);
    let (handle, _task) = SessionDriver::spawn(session_with(config, &[6, 6]), TICK_INTERVAL);
    let rolled = handle.apply(HackAction::RollMatrix).await.expect("roll");
    let dice: Vec<_> = rolled.snapshot.dice.iter().map(|die| die.id).collect();

    sleep(Duration::from_millis(2_500)).await;
    handle.apply(HackAction::ToggleDie { id: dice[0] }).await.expect("select");
    handle.apply(HackAction::ToggleDie { id: dice[1] }).await.expect("select");
    let modified = handle
        .apply(HackAction::Modify {
            mode: Modification::Subtract,
        })
        .await
        .expect("modify");
    assert!(modified.applied);
    assert!(modified.snapshot.matrix_resolved);
    assert!(!modified.snapshot.countdown_running);
    assert_eq!(modified.snapshot.time_left, 28);

    sleep(Duration::from_secs(10)).await;
    let snapshot = handle.state().await.expect("state");
    assert_eq!(snapshot.time_left, 28);
    assert!(!snapshot.countdown_running);
    assert!(!snapshot.clock_ran_out);
    assert_eq!(snapshot.phase, HackPhase::Complete);
}

#[tokio::test(start_paused = true)]
async fn spending_the_last_attempt_stops_the_countdown() {
    // Knowledge -3 with a d4 of 1 floors at a single attempt.
    let config = HackConfig::new(6, -3, 1, MatrixSize::Four, 30);
    let draws = [1, 2, 3, 4, 1, 1, 1, 1];
    let (handle, _task) = SessionDriver::spawn(session_with(config, &draws), TICK_INTERVAL);
    handle.apply(HackAction::RollMatrix).await.expect("roll");

    sleep(Duration::from_millis(1_500)).await;
    let rerolled = handle.apply(HackAction::RerollActive).await.expect("reroll");
    assert!(rerolled.applied);
    assert_eq!(rerolled.snapshot.attempts_remaining, 0);
    assert!(rerolled.snapshot.hack_complete);
    assert!(!rerolled.snapshot.countdown_running);
    assert_eq!(rerolled.snapshot.time_left, 29);

    sleep(Duration::from_secs(10)).await;
    let snapshot = handle.state().await.expect("state");
    assert_eq!(snapshot.time_left, 29);
    assert!(!snapshot.countdown_running);
    assert!(!snapshot.timer_expired);
}

#[tokio::test(start_paused = true)]
async fn full_access_never_starts_the_clock() {
    let draws = [6, 6, 6, 6, 3, 1, 2, 3, 4];
    let (handle, _task) = SessionDriver::spawn(timed_session(&draws), TICK_INTERVAL);
    let rolled = handle.apply(HackAction::RollMatrix).await.expect("roll");
    assert!(rolled.snapshot.show_deep_hack_choice);
    assert_eq!(rolled.snapshot.time_left, 0);

    sleep(Duration::from_secs(5)).await;
    let deep = handle.apply(HackAction::StartDeepHack).await.expect("deep");
    assert!(deep.applied);
    assert_eq!(deep.snapshot.phase, HackPhase::DeepHack);
    assert_eq!(deep.snapshot.breach_code, 3);
    assert_eq!(deep.snapshot.dice.len(), 4);
    assert_eq!(deep.snapshot.time_left, 0);

    sleep(Duration::from_secs(5)).await;
    assert_eq!(handle.state().await.expect("state").time_left, 0);
}

#[tokio::test(start_paused = true)]
async fn subscribers_see_ticks_and_actions() {
    let (handle, _task) = SessionDriver::spawn(timed_session(&[1, 2, 3, 4]), TICK_INTERVAL);
    let mut updates = handle.subscribe();
    assert_eq!(updates.borrow_and_update().phase, HackPhase::Empty);

    handle.apply(HackAction::RollMatrix).await.expect("roll");
    assert!(updates.has_changed().expect("driver alive"));
    assert_eq!(updates.borrow_and_update().time_left, 30);

    updates.changed().await.expect("tick update");
    assert_eq!(updates.borrow_and_update().time_left, 29);
    assert_eq!(handle.latest().time_left, 29);
}

#[tokio::test(start_paused = true)]
async fn fast_tick_interval_speeds_up_the_clock() {
    let (handle, _task) =
        SessionDriver::spawn(timed_session(&[1, 2, 3, 4]), Duration::from_millis(100));
    handle.apply(HackAction::RollMatrix).await.expect("roll");

    sleep(Duration::from_millis(1_050)).await;
    assert_eq!(handle.state().await.expect("state").time_left, 20);
}

#[tokio::test]
async fn rejected_actions_report_not_applied() {
    let (handle, _task) = SessionDriver::spawn(timed_session(&[1, 2, 3, 4]), TICK_INTERVAL);
    let report = handle.apply(HackAction::RerollActive).await.expect("reroll");
    assert!(!report.applied);
    assert_eq!(report.snapshot.attempts_used, 0);

    let report = handle.apply(HackAction::StartDeepHack).await.expect("deep");
    assert!(!report.applied);
}

#[tokio::test]
async fn shutdown_is_idempotent_and_closes_the_handle() {
    let (handle, task) = SessionDriver::spawn(timed_session(&[]), TICK_INTERVAL);
    handle.shutdown();
    handle.shutdown();
    let session = task.await.expect("driver task");
    assert!(session.matrix().is_empty());

    assert_eq!(handle.state().await, Err(DriverError::Closed));
    assert_eq!(
        handle.apply(HackAction::RollMatrix).await.map(|r| r.applied),
        Err(DriverError::Closed)
    );
}
