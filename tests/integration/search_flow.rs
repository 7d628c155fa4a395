//! End-to-end behaviour of the debounced palette search.
//!
//! Drives a [`SearchController`] over fixture tasks and commands with the
//! Tokio clock paused, so the debounce window is deterministic.

#[path = "../common/fixture.rs"]
#[allow(dead_code)]
mod fixture;

use std::time::Duration;

use dida::command::{DEFAULT_DEBOUNCE, SearchState};
use dida::store::COMPLETE_SMART_PROJECT;

use fixture::{FailingSource, FixtureSource, controller, controller_with};

// =============================================================================
// UI flags
// =============================================================================

#[tokio::test(start_paused = true)]
async fn loading_while_debouncing() {
    let search = controller();
    search.set_search("test");
    tokio::time::sleep(DEFAULT_DEBOUNCE - Duration::from_millis(1)).await;
    assert!(search.loading());
}

#[tokio::test(start_paused = true)]
async fn loading_clears_when_search_completes() {
    let search = controller();
    search.set_search("test");
    search.settled().await;
    assert!(!search.loading());
}

#[tokio::test(start_paused = true)]
async fn searching_after_commit() {
    let search = controller();
    search.set_search("吃饭");
    assert!(!search.searching());
    search.settled().await;
    assert!(search.searching());
}

// =============================================================================
// Task search
// =============================================================================

#[tokio::test(start_paused = true)]
async fn title_search_returns_enriched_task() {
    let search = controller();
    search.set_search("吃饭");
    search.settled().await;

    let hits = search.task_searcher().filtered_tasks();
    assert_eq!(hits.len(), 1);
    let task = &hits[0].item;
    assert_eq!(task.title, "吃饭");
    assert_eq!(task.desc, "今天晚上吃什么");
    assert_eq!(task.id, "0");
    assert!(!task.done);
    assert_eq!(task.from.as_ref().unwrap().name, "生活");
}

#[tokio::test(start_paused = true)]
async fn content_search_returns_task() {
    let search = controller();
    search.set_search("吃什么");
    search.settled().await;
    assert_eq!(search.task_searcher().filtered_tasks().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn completed_task_comes_from_smart_project() {
    let search = controller();
    search.set_search("运动");
    search.settled().await;

    let hits = search.task_searcher().filtered_tasks();
    assert!(hits[0].item.done);
    assert_eq!(hits[0].item.from.as_ref().unwrap().name, COMPLETE_SMART_PROJECT.name);
}

#[tokio::test(start_paused = true)]
async fn nothing_matches_unknown_text() {
    let search = controller();
    search.set_search("写代码");
    search.settled().await;
    assert!(search.task_searcher().filtered_tasks().is_empty());
    assert!(search.searching());
}

#[tokio::test(start_paused = true)]
async fn clearing_search_resets_tasks() {
    let search = controller();
    search.set_search("吃饭");
    search.settled().await;
    search.set_search("");
    search.settled().await;
    assert!(search.task_searcher().filtered_tasks().is_empty());
    assert_eq!(search.state(), SearchState::default());
}

// =============================================================================
// Command search
// =============================================================================

#[tokio::test(start_paused = true)]
async fn command_prefix_finds_command() {
    let search = controller();
    search.set_search(">主页");
    search.settled().await;

    let commands = search.command_searcher().filtered_commands();
    assert_eq!(commands.len(), 1);
    assert_eq!(commands[0].name(), "前往主页");
    assert!(search.task_searcher().filtered_tasks().is_empty());
}

#[tokio::test(start_paused = true)]
async fn bare_prefix_lists_every_command() {
    let search = controller();
    search.set_search("> ");
    search.settled().await;
    assert_eq!(search.command_searcher().filtered_commands().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn clearing_search_empties_commands() {
    let search = controller();
    search.set_search(">主页");
    search.settled().await;
    search.set_search("");
    assert!(search.command_searcher().filtered_commands().is_empty());
    assert!(!search.loading());
    assert!(!search.searching());
}

#[tokio::test(start_paused = true)]
async fn resets_are_idempotent() {
    let search = controller();
    search.reset_search();
    search.reset_search();
    search.task_searcher().reset_search_tasks();
    search.command_searcher().reset_search_commands();
    search.command_searcher().reset_search_commands();
    assert!(search.task_searcher().filtered_tasks().is_empty());
    assert!(search.command_searcher().filtered_commands().is_empty());
}

// =============================================================================
// Failures and overlapping searches
// =============================================================================

#[tokio::test(start_paused = true)]
async fn failed_fetch_records_error_and_stops_loading() {
    let search = controller_with(FailingSource);
    search.set_search("吃饭");
    search.settled().await;

    let state = search.state();
    assert!(!state.loading);
    assert!(state.searching);
    assert!(state.last_error.is_some());
    assert!(search.task_searcher().filtered_tasks().is_empty());
}

#[tokio::test(start_paused = true)]
async fn reset_during_fetch_discards_result() {
    let search = controller_with(FixtureSource {
        delay: Duration::from_secs(1),
    });
    search.set_search("吃饭");
    tokio::time::sleep(DEFAULT_DEBOUNCE + Duration::from_millis(10)).await;
    search.reset_search();
    tokio::time::sleep(Duration::from_secs(2)).await;

    assert!(search.task_searcher().filtered_tasks().is_empty());
    assert_eq!(search.state(), SearchState::default());
}

#[tokio::test(start_paused = true)]
async fn newer_query_wins_over_slow_fetch() {
    let search = controller_with(FixtureSource {
        delay: Duration::from_secs(1),
    });
    search.set_search("吃饭");
    tokio::time::sleep(DEFAULT_DEBOUNCE + Duration::from_millis(10)).await;
    search.set_search("运动");
    search.settled().await;

    let hits = search.task_searcher().filtered_tasks();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].item.title, "运动");
    assert!(!search.loading());
}

#[tokio::test(start_paused = true)]
async fn subscribers_see_results_arrive() {
    let search = controller();
    let mut results = search.task_searcher().subscribe();
    search.set_search("睡觉");
    results.changed().await.unwrap();
    assert_eq!(results.borrow_and_update()[0].item.title, "睡觉");
}
