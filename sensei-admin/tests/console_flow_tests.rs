// End-to-end console flows against the in-memory repository
//
// Effects returned by the app are executed inline and their events fed
// straight back, so every flow runs deterministically without a terminal.

use std::collections::VecDeque;
use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pretty_assertions::assert_eq;
use sensei_admin::tui::columns::{cell_content, CellContext};
use sensei_admin::tui::effects::{execute, Effect};
use sensei_admin::tui::forms::Modal;
use sensei_admin::tui::state::clipboard::MemoryClipboard;
use sensei_admin::tui::state::paged_list::ListView;
use sensei_admin::tui::types::ui::{AppMode, Column};
use sensei_admin::tui::{App, Event};
use sensei_admin_core::{MemoryNodeRepository, NodeRecord, NodeRole, NodeStatus, NodeRepository};

const NODE_A: &str = "02aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
const NODE_B: &str = "03bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

fn two_node_fleet() -> MemoryNodeRepository {
    MemoryNodeRepository::new(vec![
        NodeRecord::new(
            NODE_A,
            "alpha",
            "alice",
            NodeRole::Child,
            NodeStatus::Stopped,
            "127.0.0.1",
            9736,
        ),
        NodeRecord::new(
            NODE_B,
            "bravo",
            "bob",
            NodeRole::Child,
            NodeStatus::Running,
            "127.0.0.1",
            9737,
        ),
    ])
}

async fn drive(app: &mut App, repo: &dyn NodeRepository, effects: Vec<Effect>) {
    let mut queue: VecDeque<Effect> = effects.into();
    while let Some(effect) = queue.pop_front() {
        let event = execute(repo, effect).await;
        queue.extend(app.handle_event(event, Instant::now()));
    }
}

async fn press(app: &mut App, repo: &dyn NodeRepository, code: KeyCode) {
    let effects = app.handle_event(
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE)),
        Instant::now(),
    );
    drive(app, repo, effects).await;
}

async fn mounted(repo: &dyn NodeRepository) -> App {
    let mut app = App::new(5, Box::new(MemoryClipboard::default()));
    let effects = app.start();
    drive(&mut app, repo, effects).await;
    app
}

fn statuses(app: &App) -> Vec<(String, NodeStatus)> {
    app.rows()
        .iter()
        .map(|r| (r.alias.clone(), r.status))
        .collect()
}

#[tokio::test]
async fn test_two_node_listing_shows_matching_actions() {
    let repo = two_node_fleet();
    let app = mounted(&repo).await;

    assert_eq!(repo.list_calls(), 1);
    let ListView::Rows {
        rows,
        has_more,
        total,
        ..
    } = app.view()
    else {
        panic!("expected rows, got {:?}", app.view());
    };
    assert_eq!(rows.len(), 2);
    assert!(!has_more);
    assert_eq!(total, 2);

    let ctx = CellContext::default();
    assert_eq!(cell_content(Column::Actions, &rows[0], &ctx).text, "▶ ⊕");
    assert_eq!(cell_content(Column::Actions, &rows[1], &ctx).text, "■ ⊕");
}

#[tokio::test]
async fn test_confirmed_stop_refetches_with_new_status() {
    let repo = two_node_fleet();
    let mut app = mounted(&repo).await;

    press(&mut app, &repo, KeyCode::Down).await;
    press(&mut app, &repo, KeyCode::Char('s')).await;
    assert!(app.overlays.confirm.is_open());
    assert_eq!(repo.stop_calls(), 0);

    press(&mut app, &repo, KeyCode::Char('y')).await;

    assert_eq!(repo.stop_calls(), 1);
    assert_eq!(repo.list_calls(), 2);
    assert!(!app.overlays.confirm.is_open());
    assert_eq!(
        statuses(&app),
        vec![
            ("alpha".to_string(), NodeStatus::Stopped),
            ("bravo".to_string(), NodeStatus::Stopped),
        ]
    );
}

#[tokio::test]
async fn test_declined_stop_never_reaches_backend() {
    let repo = two_node_fleet();
    let mut app = mounted(&repo).await;

    press(&mut app, &repo, KeyCode::Down).await;
    press(&mut app, &repo, KeyCode::Char('s')).await;
    press(&mut app, &repo, KeyCode::Esc).await;

    assert_eq!(repo.stop_calls(), 0);
    assert_eq!(repo.list_calls(), 1);
    assert!(!app.overlays.confirm.is_open());
}

#[tokio::test]
async fn test_failed_stop_keeps_listing_and_reports() {
    let repo = two_node_fleet();
    repo.fail_next_stop("channel manager busy");
    let mut app = mounted(&repo).await;

    press(&mut app, &repo, KeyCode::Down).await;
    press(&mut app, &repo, KeyCode::Char('s')).await;
    press(&mut app, &repo, KeyCode::Char('y')).await;

    assert_eq!(repo.stop_calls(), 1);
    assert_eq!(repo.list_calls(), 1);
    assert!(app
        .overlays
        .confirm
        .error()
        .unwrap()
        .contains("channel manager busy"));
    assert!(app.actions.row_error(NODE_B).is_some());
    assert_eq!(statuses(&app)[1].1, NodeStatus::Running);

    // Retrying from the reopened dialog succeeds and refreshes.
    press(&mut app, &repo, KeyCode::Char('y')).await;
    assert_eq!(repo.stop_calls(), 2);
    assert_eq!(repo.list_calls(), 2);
    assert!(app.actions.row_error(NODE_B).is_none());
}

#[tokio::test]
async fn test_start_flow_with_passphrase() {
    let repo = two_node_fleet();
    repo.set_passphrase(NODE_A, "correct horse");
    let mut app = mounted(&repo).await;

    press(&mut app, &repo, KeyCode::Char('s')).await;
    assert!(matches!(
        app.overlays.modal.current(),
        Some(Modal::StartNode(form)) if form.pubkey == NODE_A
    ));

    for c in "wrong".chars() {
        press(&mut app, &repo, KeyCode::Char(c)).await;
    }
    press(&mut app, &repo, KeyCode::Enter).await;

    assert_eq!(repo.start_calls(), 1);
    assert_eq!(repo.list_calls(), 1);
    let Some(Modal::StartNode(form)) = app.overlays.modal.current() else {
        panic!("form should stay open after a failed start");
    };
    assert!(form.error.as_deref().unwrap().contains("invalid passphrase"));

    for _ in 0.."wrong".len() {
        press(&mut app, &repo, KeyCode::Backspace).await;
    }
    for c in "correct horse".chars() {
        press(&mut app, &repo, KeyCode::Char(c)).await;
    }
    press(&mut app, &repo, KeyCode::Enter).await;

    assert_eq!(repo.start_calls(), 2);
    assert_eq!(repo.list_calls(), 2);
    assert!(!app.overlays.modal.is_showing());
    assert_eq!(statuses(&app)[0].1, NodeStatus::Running);
}

#[tokio::test]
async fn test_unmatched_search_shows_empty_state() {
    let repo = two_node_fleet();
    let mut app = mounted(&repo).await;

    press(&mut app, &repo, KeyCode::Char('/')).await;
    for c in "zzz".chars() {
        press(&mut app, &repo, KeyCode::Char(c)).await;
    }

    assert_eq!(repo.list_calls(), 4);
    assert_eq!(
        app.view(),
        ListView::Empty {
            headline: "No nodes found",
            subtext: "Try changing the search term",
        }
    );
}

#[tokio::test]
async fn test_fetch_failure_then_retry() {
    let repo = two_node_fleet();
    repo.fail_next_list("connection refused");
    let mut app = mounted(&repo).await;

    assert!(matches!(app.view(), ListView::Failed { message } if message.contains("connection refused")));

    press(&mut app, &repo, KeyCode::Char('r')).await;
    assert_eq!(app.rows().len(), 2);
}

#[tokio::test]
async fn test_out_of_order_responses_keep_latest() {
    let repo = two_node_fleet();
    let mut app = App::new(5, Box::new(MemoryClipboard::default()));

    let first = app.start();
    app.ui_state.search_input = "bravo".to_string();
    let second = app.apply_search();

    // The newer request finishes first; the older one arrives late.
    drive(&mut app, &repo, second).await;
    drive(&mut app, &repo, first).await;

    let aliases: Vec<&str> = app.rows().iter().map(|r| r.alias.as_str()).collect();
    assert_eq!(aliases, vec!["bravo"]);
}

#[tokio::test]
async fn test_paging_walks_the_fleet() {
    let repo = MemoryNodeRepository::demo();
    let mut app = mounted(&repo).await;
    assert_eq!(app.rows().len(), 5);

    press(&mut app, &repo, KeyCode::Right).await;
    assert_eq!(app.list.page(), 1);
    assert_eq!(app.rows().len(), 2);

    // No further pages: the key does not change and nothing is fetched.
    let calls = repo.list_calls();
    press(&mut app, &repo, KeyCode::Right).await;
    assert_eq!(repo.list_calls(), calls);

    press(&mut app, &repo, KeyCode::Left).await;
    assert_eq!(app.list.page(), 0);
}

#[tokio::test]
async fn test_open_channel_navigates_with_connection() {
    let repo = two_node_fleet();
    let mut app = mounted(&repo).await;

    press(&mut app, &repo, KeyCode::Char('o')).await;

    let AppMode::ChannelOpen(route) = &app.ui_state.mode else {
        panic!("expected channel-open screen");
    };
    assert_eq!(
        route.path(),
        format!("/admin/channels/open?connection={}@127.0.0.1:9736", NODE_A)
    );
}
