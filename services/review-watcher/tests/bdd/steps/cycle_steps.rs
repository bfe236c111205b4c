//! BDD step definitions for running poll cycles and checking their effects

use cucumber::{then, when};
use review_watcher::verdict::ReviewStatus;
use review_watcher::{CycleOutcome, WatcherError};

use crate::world::{WatcherWorld, TELEGRAM_API};

const STATUS_PREFIX: &str = "Changed review status of";
const FAILURE_PREFIX: &str = "Program failure:";

fn parse_status(s: &str) -> ReviewStatus {
    s.parse()
        .unwrap_or_else(|e| panic!("Unknown status in feature file: {}", e))
}

#[when(expr = "the watcher runs {int} cycle(s)")]
async fn run_cycles(world: &mut WatcherWorld, count: usize) {
    for _ in 0..count {
        let outcome = world.watcher().run_cycle().await;
        world.outcomes.push(outcome);
    }
}

#[then(expr = "{int} status notification(s) should have been sent")]
fn status_notifications_sent(world: &mut WatcherWorld, expected: usize) {
    let sent = world.http.messages_starting_with(STATUS_PREFIX);
    assert_eq!(sent.len(), expected, "status notifications: {:?}", sent);
}

#[then("no status notifications should have been sent")]
fn no_status_notifications(world: &mut WatcherWorld) {
    status_notifications_sent(world, 0);
}

#[then(expr = "{int} failure report(s) should have been sent")]
fn failure_reports_sent(world: &mut WatcherWorld, expected: usize) {
    let sent = world.http.messages_starting_with(FAILURE_PREFIX);
    assert_eq!(sent.len(), expected, "failure reports: {:?}", sent);
}

#[then(expr = "the last status notification should announce {string} for {string}")]
fn last_notification_announces(world: &mut WatcherWorld, status: String, name: String) {
    let sent = world.http.messages_starting_with(STATUS_PREFIX);
    let last = sent.last().expect("no status notification was sent");
    let expected = format!(
        "Changed review status of \"{}\". {}",
        name,
        parse_status(&status).verdict()
    );
    assert_eq!(last, &expected);
}

#[then(expr = "the status notifications should announce {string} in order")]
fn notifications_in_order(world: &mut WatcherWorld, statuses: String) {
    let sent = world.http.messages_starting_with(STATUS_PREFIX);
    let expected: Vec<ReviewStatus> = statuses.split(',').map(|s| parse_status(s.trim())).collect();
    assert_eq!(sent.len(), expected.len(), "status notifications: {:?}", sent);
    for (message, status) in sent.iter().zip(expected) {
        assert!(
            message.ends_with(status.verdict()),
            "'{}' should end with the {} verdict",
            message,
            status
        );
    }
}

#[then(expr = "every message should go to chat {string}")]
fn messages_go_to_chat(world: &mut WatcherWorld, chat_id: String) {
    let posts = world.http.posts.lock().unwrap();
    assert!(!posts.is_empty(), "no messages were sent");
    for post in posts.iter() {
        assert_eq!(post.url, format!("{}/botbot-token/sendMessage", TELEGRAM_API));
        assert_eq!(post.param("chat_id"), Some(chat_id.as_str()));
    }
}

#[then(expr = "the cursor should be {int}")]
fn cursor_is(world: &mut WatcherWorld, expected: i64) {
    assert_eq!(world.watcher().cursor(), expected);
}

#[then(expr = "the status API should have been queried with cursors {string}")]
fn queried_with_cursors(world: &mut WatcherWorld, cursors: String) {
    let expected: Vec<String> = cursors.split(',').map(|c| c.trim().to_string()).collect();
    assert_eq!(world.http.queried_cursors(), expected);
}

#[then(expr = "every status API request should authorize with {string}")]
fn requests_authorized(world: &mut WatcherWorld, header: String) {
    let gets = world.http.gets.lock().unwrap();
    assert!(!gets.is_empty(), "the status API was never queried");
    for get in gets.iter() {
        assert!(get.url.ends_with("/homework_statuses/"), "{}", get.url);
        assert!(
            get.headers
                .iter()
                .any(|(k, v)| k == "Authorization" && v == &header),
            "headers: {:?}",
            get.headers
        );
    }
}

#[then(expr = "the last status seen should be {string}")]
fn last_seen_is(world: &mut WatcherWorld, status: String) {
    assert_eq!(world.watcher().last_seen(), Some(parse_status(&status)));
}

#[then("no status should have been seen yet")]
fn nothing_seen(world: &mut WatcherWorld) {
    assert_eq!(world.watcher().last_seen(), None);
}

#[then(expr = "cycle {int} should have failed with a {word} error")]
fn cycle_failed_with(world: &mut WatcherWorld, index: usize, kind: String) {
    let outcome = world
        .outcomes
        .get(index - 1)
        .unwrap_or_else(|| panic!("cycle {} did not run", index));
    let CycleOutcome::Failed { error, .. } = outcome else {
        panic!("cycle {} did not fail: {:?}", index, outcome);
    };
    let matched = match kind.as_str() {
        "transport" => matches!(error, WatcherError::Transport(_)),
        "decode" => matches!(error, WatcherError::Decode(_)),
        "schema" => matches!(error, WatcherError::Schema(_)),
        "field" => matches!(error, WatcherError::UnknownField(_)),
        "status" => matches!(error, WatcherError::UnknownStatus(_)),
        other => panic!("Unknown error kind in feature file: {}", other),
    };
    assert!(matched, "cycle {} failed with {:?}, expected {}", index, error, kind);
}

#[then(expr = "cycle {int} should have notified without delivery")]
fn cycle_notified_undelivered(world: &mut WatcherWorld, index: usize) {
    let outcome = &world.outcomes[index - 1];
    assert!(
        matches!(
            outcome,
            CycleOutcome::Notified {
                delivered: false,
                ..
            }
        ),
        "{:?}",
        outcome
    );
}
