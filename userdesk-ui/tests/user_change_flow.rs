//! End-to-end behaviour of the user change component on its runtime,
//! backed by the in-memory users stub.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use userdesk_model::User;
use userdesk_ui::app::commands::parse_command;
use userdesk_ui::domains::user_change::{
    Message, UserChange, UserChangeServices,
};
use userdesk_ui::infra::services::{SessionReadiness, Severity, ToastQueue};
use userdesk_ui::infra::testing::stubs::StubUserAdminService;
use userdesk_ui::runtime::Runtime;

struct Harness {
    runtime: Runtime,
    readiness: SessionReadiness,
    toasts: ToastQueue,
}

fn harness(stub: &StubUserAdminService) -> Harness {
    let (readiness, gate) = SessionReadiness::new();
    let toasts = ToastQueue::new();
    let services = UserChangeServices {
        users: Arc::new(stub.clone()),
        notifier: Arc::new(toasts.clone()),
        session: Arc::new(gate),
    };
    Harness {
        runtime: Runtime::new(UserChange::new(services)),
        readiness,
        toasts,
    }
}

async fn settle(runtime: &mut Runtime) {
    tokio::time::timeout(Duration::from_secs(5), runtime.run_until_idle())
        .await
        .expect("runtime should go idle");
}

async fn wait_for_lists(stub: &StubUserAdminService, count: usize) {
    tokio::time::timeout(
        Duration::from_secs(5),
        stub.wait_for_list_calls(count),
    )
    .await
    .expect("list call should reach the backend");
}

#[tokio::test]
async fn list_fetch_keeps_exact_records_in_order() {
    let users = vec![
        User::new(3, "carol"),
        User::new(1, "alice"),
        User::new(2, "bob"),
    ];
    let stub = StubUserAdminService::new().with_users(users.clone());
    let mut h = harness(&stub);

    h.runtime.dispatch(Message::LoadUsers);
    settle(&mut h.runtime).await;

    assert_eq!(h.runtime.state().users, users);
    assert!(h.runtime.state().is_loaded());
}

#[tokio::test]
async fn successful_add_clears_draft_and_refetches() {
    let stub = StubUserAdminService::new();
    let mut h = harness(&stub);

    h.runtime.dispatch(Message::UsernameChanged("dora".into()));
    h.runtime.dispatch(Message::AddUser);
    settle(&mut h.runtime).await;

    assert_eq!(h.runtime.state().username, "");
    assert_eq!(stub.create_calls(), 1);
    assert_eq!(stub.list_calls(), 1);
    assert_eq!(h.runtime.state().users, vec![User::new(1, "dora")]);
}

#[tokio::test]
async fn rename_notifies_once_without_touching_list() {
    let stub = StubUserAdminService::new().with_users(vec![User::new(1, "a")]);
    let mut h = harness(&stub);

    h.runtime.dispatch(Message::LoadUsers);
    settle(&mut h.runtime).await;
    let lists_before = stub.list_calls();

    h.runtime.dispatch(Message::UpdateUser(User::new(1, "neo")));
    settle(&mut h.runtime).await;

    let toasts = h.toasts.drain();
    assert_eq!(toasts.len(), 1);
    assert!(toasts[0].text.contains("neo"));
    assert_eq!(toasts[0].severity, Severity::Warning);
    assert_eq!(h.runtime.state().users, vec![User::new(1, "a")]);
    assert_eq!(stub.list_calls(), lists_before);
    assert_eq!(stub.users(), vec![User::new(1, "neo")]);
}

#[tokio::test]
async fn rejected_rename_command_leaves_list_as_fetched() {
    let stub = StubUserAdminService::new().with_users(vec![User::new(1, "a")]);
    let mut h = harness(&stub);

    h.runtime.dispatch(Message::LoadUsers);
    settle(&mut h.runtime).await;

    stub.set_failure(Some("rejected"));
    let command = parse_command("rename 1 neo").expect("valid command");
    for message in command.into_messages() {
        h.runtime.dispatch(message);
    }
    settle(&mut h.runtime).await;

    let toasts = h.toasts.drain();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].severity, Severity::Error);
    assert_eq!(h.runtime.state().users, vec![User::new(1, "a")]);
    assert_eq!(stub.users(), vec![User::new(1, "a")]);
}

#[tokio::test]
async fn rename_command_reaches_rows_with_textual_ids() {
    let stub =
        StubUserAdminService::new().with_users(vec![User::new("7", "a")]);
    let mut h = harness(&stub);

    h.runtime.dispatch(Message::LoadUsers);
    settle(&mut h.runtime).await;

    let command = parse_command("rename 7 neo").expect("valid command");
    for message in command.into_messages() {
        h.runtime.dispatch(message);
    }
    settle(&mut h.runtime).await;

    assert_eq!(h.runtime.state().users, vec![User::new("7", "neo")]);
    assert_eq!(stub.users(), vec![User::new("7", "neo")]);
    let toasts = h.toasts.drain();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].severity, Severity::Warning);
}

#[tokio::test]
async fn overlapping_loads_settle_in_arrival_order() {
    let a = User::new(1, "a");
    let b = User::new(2, "b");
    let stub = StubUserAdminService::new()
        .with_users(vec![a.clone()])
        .hold_list_responses();
    let mut h = harness(&stub);

    h.runtime.dispatch(Message::LoadUsers);
    assert!(h.runtime.step().await);
    wait_for_lists(&stub, 1).await;

    stub.set_users(vec![a.clone(), b.clone()]);
    h.runtime.dispatch(Message::LoadUsers);
    assert!(h.runtime.step().await);
    wait_for_lists(&stub, 2).await;
    assert_eq!(h.runtime.in_flight(), 2);

    // The second request answers first...
    assert!(stub.release_list(1));
    assert!(h.runtime.step().await);
    assert_eq!(h.runtime.state().users, vec![a.clone(), b.clone()]);

    // ...and the older response, arriving last, wins.
    assert!(stub.release_list(0));
    settle(&mut h.runtime).await;
    assert_eq!(h.runtime.state().users, vec![a]);
    assert_eq!(h.runtime.in_flight(), 0);
}

#[tokio::test]
async fn mount_waits_for_session_then_lists_once() {
    let stub = StubUserAdminService::new().with_users(vec![User::new(1, "a")]);
    let mut h = harness(&stub);

    h.runtime.mount();
    assert!(h.runtime.step().await);
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
    assert_eq!(stub.list_calls(), 0);
    assert_eq!(h.runtime.in_flight(), 1);
    assert!(!h.runtime.state().is_loaded());

    h.readiness.mark_ready();
    settle(&mut h.runtime).await;

    assert_eq!(stub.list_calls(), 1);
    assert_eq!(h.runtime.state().users, vec![User::new(1, "a")]);
}

#[tokio::test]
async fn mount_then_add_scenario() {
    let stub = StubUserAdminService::new().with_users(vec![User::new(1, "a")]);
    let mut h = harness(&stub);

    h.runtime.mount();
    h.readiness.mark_ready();
    settle(&mut h.runtime).await;
    assert_eq!(h.runtime.state().users, vec![User::new(1, "a")]);

    h.runtime.dispatch(Message::UsernameChanged("b".into()));
    h.runtime.dispatch(Message::AddUser);
    settle(&mut h.runtime).await;

    assert_eq!(h.runtime.state().username, "");
    assert_eq!(stub.list_calls(), 2);
    assert_eq!(
        h.runtime.state().users,
        vec![User::new(1, "a"), User::new(2, "b")]
    );
}

#[tokio::test]
async fn backend_failures_surface_as_error_toasts() {
    let stub = StubUserAdminService::new().with_users(vec![User::new(1, "a")]);
    let mut h = harness(&stub);

    h.runtime.dispatch(Message::LoadUsers);
    settle(&mut h.runtime).await;

    stub.set_failure(Some("backend down"));
    h.runtime.dispatch(Message::UsernameChanged("x".into()));
    h.runtime.dispatch(Message::AddUser);
    h.runtime.dispatch(Message::LoadUsers);
    settle(&mut h.runtime).await;

    let toasts = h.toasts.drain();
    assert_eq!(toasts.len(), 2);
    assert!(toasts.iter().all(|t| t.severity == Severity::Error));
    assert_eq!(h.runtime.state().users, vec![User::new(1, "a")]);
    assert_eq!(h.runtime.state().username, "x");
}

#[tokio::test]
async fn observers_render_only_on_state_change() {
    let stub = StubUserAdminService::new().with_users(vec![User::new(1, "a")]);
    let mut h = harness(&stub);
    let renders = Arc::new(AtomicUsize::new(0));
    let counter = renders.clone();
    h.runtime.subscribe(move |view| {
        assert_eq!(view.template, "user-change-template");
        counter.fetch_add(1, Ordering::SeqCst);
    });

    h.runtime.dispatch(Message::SetShowUsers(true));
    h.runtime.dispatch(Message::SetShowUsers(true));
    h.runtime.dispatch(Message::LoadUsers);
    settle(&mut h.runtime).await;

    // Visibility once, list once; the repeated toggle and the request
    // itself change nothing.
    assert_eq!(renders.load(Ordering::SeqCst), 2);
    assert_eq!(h.runtime.view().rows.len(), 1);
}

#[tokio::test]
async fn shutdown_stops_the_loop() {
    let stub = StubUserAdminService::new();
    let mut h = harness(&stub);
    let handle = h.runtime.handle();

    assert!(handle.dispatch(Message::SetShowUsers(true)));
    handle.shutdown();
    tokio::time::timeout(Duration::from_secs(5), h.runtime.run())
        .await
        .expect("run returns after shutdown");

    assert!(h.runtime.is_shut_down());
    assert!(h.runtime.state().show_users);
    assert!(!h.runtime.step().await);
}
