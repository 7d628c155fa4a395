//! Task and project stores against the in-process development backend.

use std::sync::Arc;

use dida::api::{AuthApi, DidaApi, HttpClient, HttpError, TaskApi};
use dida::goto::Goto;
use dida::login;
use dida::message::LogNotifier;
use dida::router::{Navigator, RouteName, Router};
use dida::store::{
    COMPLETE_SMART_PROJECT, ProjectLookup, ProjectsStore, Selector, StoreError, TaskSource,
    TasksSelector, TasksStore,
};
use dida::token::TokenStore;
use dida_proto::task::TaskStatus;
use dida_server::server::{ServerState, start_server_with_state};

struct Backend {
    base_url: String,
    state: Arc<ServerState>,
    api: Arc<DidaApi>,
    token: TokenStore,
    _handle: tokio::task::JoinHandle<()>,
}

/// Starts a seeded backend and signs in.
async fn backend() -> Backend {
    let state = Arc::new(ServerState::default());
    state.store.seed_demo().await.unwrap();
    let (addr, handle) = start_server_with_state("127.0.0.1:0", Arc::clone(&state))
        .await
        .expect("failed to start dida server");

    let base_url = format!("http://{addr}");
    let token = TokenStore::new();
    let http = HttpClient::new(
        &base_url,
        dida::api::DEFAULT_REQUEST_TIMEOUT,
        token.clone(),
        Arc::new(LogNotifier),
    )
    .unwrap();
    let api = Arc::new(DidaApi::new(http));
    token.set_token(api.fetch_login("dida-user", "dida-password").await.unwrap());

    Backend {
        base_url,
        state,
        api,
        token,
        _handle: handle,
    }
}

async fn stores(
    backend: &Backend,
) -> (ProjectsStore<DidaApi>, Arc<TasksSelector>, TasksStore<DidaApi>) {
    let projects = ProjectsStore::new(Arc::clone(&backend.api));
    projects.init().await.unwrap();
    let selector = Arc::new(TasksSelector::new());
    let life = projects.projects().into_iter().next().unwrap();
    selector.set_current_selector(Some(Selector::List(life)));
    let tasks = TasksStore::new(Arc::clone(&backend.api), Arc::clone(&selector));
    (projects, selector, tasks)
}

#[tokio::test]
async fn load_tasks_shows_active_tasks_of_selected_project() {
    let backend = backend().await;
    let (_projects, _selector, tasks) = stores(&backend).await;
    tasks.load_tasks().await.unwrap();

    let titles: Vec<_> = tasks.tasks().into_iter().map(|t| t.title).collect();
    assert_eq!(titles, vec!["吃饭".to_string()]);
}

#[tokio::test]
async fn completed_smart_project_shows_completed_tasks() {
    let backend = backend().await;
    let (_projects, selector, tasks) = stores(&backend).await;
    selector.set_current_selector(Some(Selector::Smart(COMPLETE_SMART_PROJECT)));
    tasks.load_tasks().await.unwrap();

    let listed = tasks.tasks();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title, "运动");
    assert_eq!(listed[0].status, TaskStatus::Completed);
}

#[tokio::test]
async fn add_then_complete_round_trips_through_backend() {
    let backend = backend().await;
    let (_projects, _selector, tasks) = stores(&backend).await;
    tasks.load_tasks().await.unwrap();

    let added = tasks.add_task("买菜").await.unwrap().unwrap();
    assert_eq!(tasks.tasks()[0].id, added.id);
    assert_eq!(tasks.current_active_task().unwrap().id, added.id);

    tasks.complete_task(&added).await.unwrap();
    assert!(tasks.tasks().iter().all(|t| t.id != added.id));
    assert!(tasks.current_active_task().is_none());

    let completed = backend.state.store.list_tasks(TaskStatus::Completed).await;
    assert!(completed.iter().any(|t| t.id == added.id));
}

#[tokio::test]
async fn remove_and_restore() {
    let backend = backend().await;
    let (_projects, _selector, tasks) = stores(&backend).await;
    tasks.load_tasks().await.unwrap();
    let meal = tasks.tasks().remove(0);

    tasks.remove_task(&meal).await.unwrap();
    let removed = backend.state.store.list_tasks(TaskStatus::Removed).await;
    assert!(removed.iter().any(|t| t.id == meal.id));

    tasks.restore_task(&meal).await.unwrap();
    let active = backend.state.store.list_tasks(TaskStatus::Active).await;
    assert!(active.iter().any(|t| t.id == meal.id));
}

#[tokio::test]
async fn move_task_to_other_project() {
    let backend = backend().await;
    let (projects, _selector, tasks) = stores(&backend).await;
    tasks.load_tasks().await.unwrap();
    let meal = tasks.tasks().remove(0);
    let work = projects.projects().into_iter().nth(1).unwrap();

    tasks.move_task_to_project(&meal, &work.id).await.unwrap();
    assert!(tasks.tasks().is_empty());

    let moved = backend.state.store.list_tasks(TaskStatus::Active).await;
    let moved = moved.iter().find(|t| t.id == meal.id).unwrap();
    assert_eq!(moved.project_id, work.id);
}

#[tokio::test]
async fn not_removed_tasks_cover_active_and_completed() {
    let backend = backend().await;
    let (projects, _selector, tasks) = stores(&backend).await;

    let all = tasks.find_all_tasks_not_removed().await.unwrap();
    assert_eq!(all.len(), 3);
    assert!(all.iter().all(|t| t.status != TaskStatus::Removed));
    assert!(all.iter().all(|t| projects.find_project(&t.project_id).is_some()));
}

#[tokio::test]
async fn backend_error_surfaces_as_api_error() {
    let backend = backend().await;
    let err = backend.api.fetch_create_task("x", "no-such-project").await.unwrap_err();
    assert!(matches!(err, HttpError::Api { code: -1, .. }));
}

#[tokio::test]
async fn revoked_session_is_unauthorized() {
    let backend = backend().await;
    let (_projects, _selector, tasks) = stores(&backend).await;
    backend.state.revoke_all().await;

    let err = tasks.load_tasks().await.unwrap_err();
    assert!(matches!(err, StoreError::Http(HttpError::Unauthorized)));
    assert!(backend.token.has_token());
}

#[tokio::test]
async fn credentials_recover_from_a_revoked_saved_token() {
    let backend = backend().await;
    let path = std::env::temp_dir()
        .join(format!("dida-session-test-{}", std::process::id()))
        .join("token");
    let saved = TokenStore::persistent(&path);
    saved.set_token(backend.token.token().unwrap());
    backend.state.revoke_all().await;

    // Next launch: the stale token is loaded from disk.
    let token = TokenStore::persistent(&path);
    assert!(token.has_token());
    let api = DidaApi::new(
        HttpClient::new(
            &backend.base_url,
            dida::api::DEFAULT_REQUEST_TIMEOUT,
            token.clone(),
            Arc::new(LogNotifier),
        )
        .unwrap(),
    );
    let router = Arc::new(Router::new(token.clone()));
    let goto = Goto::new(Arc::clone(&router) as Arc<dyn Navigator>);

    login::start_session(&api, &token, &goto, Some("dida-user"), Some("dida-password"))
        .await
        .unwrap();

    let projects = ProjectsStore::new(Arc::new(api));
    projects.init().await.unwrap();
    assert!(!projects.projects().is_empty());
    assert_eq!(router.current_route(), RouteName::Task);
    assert_eq!(TokenStore::persistent(&path).token(), token.token());

    token.clean_token();
}
