//! `dida`: terminal client for the dida to-do app.
//!
//! Signs in (or reuses a saved token), loads the first project and opens
//! the TUI. `Ctrl+K` (or `Cmd+K` on macOS) opens the palette; `>` switches
//! it to commands.
//!
//! ```bash
//! # Against a local development backend
//! cargo run --bin dida-server -- --seed-demo
//! cargo run --bin dida -- --username dida-user --password dida-password
//! ```

use std::io;
use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use crossterm::{
    event::{
        self, Event, KeyEventKind, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
        supports_keyboard_enhancement,
    },
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing_appender::non_blocking::WorkerGuard;

use dida::api::{DidaApi, HttpClient, HttpError};
use dida::app::{App, AppAction};
use dida::command::{Command, CommandRegistry, CommandSearcher, SearchController, TaskSearcher};
use dida::config::{CliArgs, ClientConfig};
use dida::goto::{Goto, SystemOpener, open_github};
use dida::login;
use dida::message::{Notifier, RedirectNotifier};
use dida::router::{Navigator, RouteName, Router};
use dida::store::{ProjectsStore, Selector, StoreError, TasksSelector, TasksStore};
use dida::token::TokenStore;
use dida::ui;

type Tasks = TasksStore<DidaApi>;
type Projects = ProjectsStore<DidaApi>;

#[tokio::main]
async fn main() -> io::Result<()> {
    let cli = CliArgs::parse();

    let config = match ClientConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: failed to load config file: {e}");
            ClientConfig::default()
        }
    };

    // Logs go to a file; ratatui owns the terminal.
    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    tracing::info!(base_url = %config.base_url, "dida starting");

    let token = config
        .token_file
        .as_ref()
        .map_or_else(TokenStore::new, TokenStore::persistent);
    let router = Arc::new(Router::new(token.clone()));
    let navigator: Arc<dyn Navigator> = Arc::clone(&router) as Arc<dyn Navigator>;
    let goto = Goto::new(Arc::clone(&navigator));
    let notifier = Arc::new(RedirectNotifier::new(Arc::clone(&navigator)));
    let http_notifier: Arc<dyn Notifier> = Arc::clone(&notifier) as Arc<dyn Notifier>;

    let http = HttpClient::new(
        &config.base_url,
        config.request_timeout,
        token.clone(),
        http_notifier,
    )
    .map_err(io::Error::other)?;
    let api = Arc::new(DidaApi::new(http));

    if let Err(e) = login::start_session(
        api.as_ref(),
        &token,
        &goto,
        config.username.as_deref(),
        config.password.as_deref(),
    )
    .await
    {
        eprintln!("Sign-in failed: {e}");
        if matches!(e, login::LoginError::MissingCredentials) {
            eprintln!("Pass --username and --password (or DIDA_USER / DIDA_PASSWORD)");
        }
        return Ok(());
    }

    let selector = Arc::new(TasksSelector::new());
    let projects = Arc::new(ProjectsStore::new(Arc::clone(&api)));
    let tasks = Arc::new(TasksStore::new(Arc::clone(&api), Arc::clone(&selector)));
    if let Err(e) = load_initial(&projects, &selector, &tasks).await {
        if matches!(e, StoreError::Http(HttpError::Unauthorized)) {
            // The saved session is gone; the next launch must sign in again.
            token.clean_token();
            eprintln!("Session expired. Run dida again with --username / --password.");
        } else {
            eprintln!("Failed to load tasks: {e}");
        }
        return Ok(());
    }

    let registry = CommandRegistry::new();
    register_commands(&registry, &goto, &token);

    let search = SearchController::with_debounce(
        TaskSearcher::new(Arc::clone(&tasks), Arc::clone(&projects)),
        CommandSearcher::new(registry.clone()),
        config.debounce,
    );
    let mut app = App::new(search);
    app.set_tasks(tasks.tasks());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    // Without enhancement most terminals never report `cmd`; `ctrl+k` still works.
    let enhanced = matches!(supports_keyboard_enhancement(), Ok(true));
    if enhanced {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        )?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let session = Session {
        config: &config,
        router: &router,
        notifier: &notifier,
        registry: &registry,
        tasks: &tasks,
        token: &token,
    };
    let result = run_app(&mut terminal, &mut app, &session).await;

    if enhanced {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if router.current_route() == RouteName::Login {
        println!("Signed out. Run dida again with --username / --password to sign in.");
    }
    tracing::info!("dida exiting");
    result
}

/// Initialize file-based logging.
///
/// Returns a [`WorkerGuard`] that must be held until shutdown to flush
/// buffered log entries.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = std::env::temp_dir().join("dida.log");
    let log_path = file_path.unwrap_or(&default_path);

    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

/// Loads projects, selects the first one and loads its tasks.
async fn load_initial(
    projects: &Projects,
    selector: &TasksSelector,
    tasks: &Tasks,
) -> Result<(), StoreError> {
    projects.init().await?;
    if let Some(first) = projects.projects().into_iter().next() {
        selector.set_current_selector(Some(Selector::List(first)));
    }
    tasks.load_tasks().await
}

fn register_commands(registry: &CommandRegistry, goto: &Goto, token: &TokenStore) {
    let home = goto.clone();
    registry.add_command(Command::new("前往主页", move || {
        home.goto_home();
    }));
    let settings = goto.clone();
    registry.add_command(Command::new("前往设置", move || {
        settings.goto_settings();
    }));
    registry.add_command(Command::new("打开 GitHub", || open_github(&SystemOpener)));
    let (session_goto, session_token) = (goto.clone(), token.clone());
    registry.add_command(Command::new("退出登录", move || {
        login::sign_out(&session_token, &session_goto);
    }));
}

/// Everything the event loop needs besides the app itself.
struct Session<'a> {
    config: &'a ClientConfig,
    router: &'a Router,
    notifier: &'a RedirectNotifier,
    registry: &'a CommandRegistry,
    tasks: &'a Tasks,
    token: &'a TokenStore,
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<Tasks, Projects>,
    session: &Session<'_>,
) -> io::Result<()> {
    loop {
        app.route = session.router.current_route();
        if let Some(message) = session.notifier.take_error() {
            app.status_message = Some(message);
        }
        if app.route == RouteName::Login {
            return Ok(());
        }

        let signed_in = session.token.has_token();
        terminal.draw(|frame| ui::draw(frame, app, signed_in))?;

        if event::poll(session.config.poll_timeout)?
            && let Event::Key(key) = event::read()?
        {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if let Some(action) = app.handle_key_event(key)
                && let Err(e) = perform(action, app, session).await
            {
                tracing::warn!(error = %e, "action failed");
                app.status_message = Some(e.to_string());
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

async fn perform(
    action: AppAction,
    app: &mut App<Tasks, Projects>,
    session: &Session<'_>,
) -> Result<(), StoreError> {
    let tasks = session.tasks;
    match action {
        AppAction::ExecuteCommand(name) => {
            if !session.registry.execute(&name) {
                tracing::debug!(name, "command vanished before execution");
            }
        }
        AppAction::OpenTask(id) => tasks.change_active_task(id.as_str()),
        AppAction::CompleteTask(id) => {
            let task = tasks.find_task(&id)?;
            tasks.complete_task(&task).await?;
        }
        AppAction::RemoveTask(id) => {
            let task = tasks.find_task(&id)?;
            tasks.remove_task(&task).await?;
        }
        AppAction::Reload => tasks.load_tasks().await?,
    }
    app.set_tasks(tasks.tasks());
    Ok(())
}
