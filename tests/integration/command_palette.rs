//! Command palette: built-in style commands executed through the search.

#[path = "../common/fixture.rs"]
#[allow(dead_code)]
mod fixture;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use dida::app::{App, AppAction};
use dida::command::{Command, CommandModal, CommandRegistry, CommandSearcher, SearchController, TaskSearcher};
use dida::goto::Goto;
use dida::router::{Navigator, RouteName, Router};
use dida::token::TokenStore;

use fixture::{FixtureProjects, FixtureSource};

fn press(app: &mut App<FixtureSource, FixtureProjects>, code: KeyCode) -> Option<AppAction> {
    app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
}

#[tokio::test(start_paused = true)]
async fn palette_runs_navigation_command() {
    let token = TokenStore::new();
    token.set_token("token");
    let router = Arc::new(Router::new(token));
    router.push(RouteName::Task.into());
    let goto = Goto::new(Arc::clone(&router) as Arc<dyn Navigator>);

    let registry = CommandRegistry::new();
    let home = goto.clone();
    registry.add_command(Command::new("前往主页", move || {
        home.goto_home();
    }));
    registry.add_command(Command::new("前往设置", move || {
        goto.goto_settings();
    }));

    let search = SearchController::new(
        TaskSearcher::new(Arc::new(FixtureSource::default()), Arc::new(FixtureProjects)),
        CommandSearcher::new(registry.clone()),
    );
    let mut app = App::new(search).with_mac_shortcut(false);

    app.handle_key_event(KeyEvent::new(KeyCode::Char('k'), KeyModifiers::CONTROL));
    for c in ">设置".chars() {
        press(&mut app, KeyCode::Char(c));
    }
    app.search().settled().await;

    let action = press(&mut app, KeyCode::Enter);
    let Some(AppAction::ExecuteCommand(name)) = action else {
        panic!("expected a command, got {action:?}");
    };
    assert!(registry.execute(&name));
    assert_eq!(router.current_route(), RouteName::Settings);
}

#[tokio::test(start_paused = true)]
async fn down_arrow_picks_second_command() {
    let hits = Arc::new(AtomicUsize::new(0));
    let registry = CommandRegistry::new();
    registry.add_command(Command::new("first", || {}));
    let counter = Arc::clone(&hits);
    registry.add_command(Command::new("second", move || {
        counter.fetch_add(1, Ordering::SeqCst);
    }));

    let search = SearchController::new(
        TaskSearcher::new(Arc::new(FixtureSource::default()), Arc::new(FixtureProjects)),
        CommandSearcher::new(registry.clone()),
    );
    let mut app = App::new(search).with_mac_shortcut(false);
    app.handle_key_event(KeyEvent::new(KeyCode::Char('k'), KeyModifiers::CONTROL));
    press(&mut app, KeyCode::Char('>'));
    app.search().settled().await;
    press(&mut app, KeyCode::Down);

    let Some(AppAction::ExecuteCommand(name)) = press(&mut app, KeyCode::Enter) else {
        panic!("expected a command");
    };
    registry.execute(&name);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn modal_shortcut_depends_on_platform() {
    let modal = CommandModal::new();
    let cmd_k = KeyEvent::new(KeyCode::Char('k'), KeyModifiers::SUPER);
    assert!(!modal.handle_shortcut(&cmd_k, false));
    assert!(modal.handle_shortcut(&cmd_k, true));
    assert!(modal.is_shown());
}

#[tokio::test(start_paused = true)]
async fn ctrl_k_opens_palette_on_mac_and_searches() {
    let search = fixture::controller();
    let mut app = App::new(search).with_mac_shortcut(true);
    app.handle_key_event(KeyEvent::new(KeyCode::Char('k'), KeyModifiers::CONTROL));
    assert!(app.modal().is_shown());

    press(&mut app, KeyCode::Char('>'));
    app.search().settled().await;
    assert_eq!(app.palette_entries().len(), 2);
}

#[test]
fn registry_reset_between_sessions() {
    let registry = fixture::registry();
    assert_eq!(registry.len(), 2);
    registry.reset_command();
    assert!(registry.is_empty());
}
