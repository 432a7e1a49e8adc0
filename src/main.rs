use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::info;

use kebubbi::KebubbiError;
use kebubbi::alert::AlertDispatcher;
use kebubbi::capability::{
    DesktopNotifier, TerminalBell, VisibilitySignal, acquire_permissions,
};
use kebubbi::client::{ApiClient, BacklogApi};
use kebubbi::completion::{CompletionCoordinator, complete_and_cascade};
use kebubbi::config::fetch_config;
use kebubbi::drafts::{DraftStore, JsonFileStore};
use kebubbi::poller::BacklogPoller;
use kebubbi::tui::{Action, Message, update};
use kebubbi::tui::app::App;

/// UI housekeeping tick, independent of the poll cadence.
const TICK_INTERVAL_MS: u64 = 500;

#[tokio::main]
async fn main() -> Result<(), KebubbiError> {
    // Initialize tracing subscriber for logging output.
    tracing_subscriber::fmt::init();

    let app_config = fetch_config()?;

    let settings = JsonFileStore::open(&app_config.data_dir)?;
    let drafts = DraftStore::new(settings.clone());
    let held = drafts.load_all();
    if !held.is_empty() {
        info!(count = held.len(), "recovered held orders from disk");
    }
    let next_sequence = drafts.peek_next_sequence();

    // Acquire alert capabilities before the first poll; degraded
    // channels never block startup.
    let bell = TerminalBell::new();
    let notifier = DesktopNotifier::new();
    let gate = acquire_permissions(&bell, &notifier, &settings);
    info!(?gate, "permission gate passed");

    let api = Arc::new(ApiClient::new(app_config.api_base_url.as_str())?);
    let (tx, mut rx) = mpsc::unbounded_channel::<Message>();
    let visibility = VisibilitySignal::new(true);
    let dispatcher = Arc::new(AlertDispatcher::new(Box::new(bell), Box::new(notifier)));

    let poller = BacklogPoller::new(
        Arc::clone(&api),
        dispatcher,
        visibility.clone(),
        tx.clone(),
        app_config.poll_interval,
    );
    tokio::spawn(poller.run());

    let coordinator = Arc::new(CompletionCoordinator::new(Arc::clone(&api)));

    kebubbi::tui::event::spawn_event_reader(tx.clone());
    kebubbi::tui::event::spawn_tick_timer(tx.clone(), TICK_INTERVAL_MS);

    let mut terminal = kebubbi::tui::setup_terminal()?;
    let mut app = App::new(
        visibility,
        app_config.reset_secret.clone(),
        held.len(),
        next_sequence,
    );

    let run_result = run_event_loop(&mut terminal, &mut app, &mut rx, &api, &coordinator, &tx).await;

    kebubbi::tui::restore_terminal(&mut terminal)?;
    run_result
}

async fn run_event_loop(
    terminal: &mut kebubbi::tui::Tui,
    app: &mut App,
    rx: &mut mpsc::UnboundedReceiver<Message>,
    api: &Arc<ApiClient>,
    coordinator: &Arc<CompletionCoordinator<ApiClient>>,
    tx: &mpsc::UnboundedSender<Message>,
) -> Result<(), KebubbiError> {
    while !app.should_quit {
        terminal
            .draw(|frame| kebubbi::tui::render(frame, app))
            .map_err(|e| KebubbiError::Io(format!("draw failed: {e}")))?;

        let Some(message) = rx.recv().await else {
            break;
        };

        if let Some(action) = update(app, message) {
            execute_action(app, action, api, coordinator, tx);
        }
    }
    Ok(())
}

/// Runs an action's I/O off the event loop; results come back as
/// messages.
fn execute_action(
    app: &App,
    action: Action,
    api: &Arc<ApiClient>,
    coordinator: &Arc<CompletionCoordinator<ApiClient>>,
    tx: &mpsc::UnboundedSender<Message>,
) {
    match action {
        Action::CompleteOrder(id) => {
            let expanded = app.stats.expanded_scopes();
            let coordinator = Arc::clone(coordinator);
            let api = Arc::clone(api);
            let tx = tx.clone();
            tokio::spawn(complete_and_cascade(coordinator, api, tx, id, expanded));
        }
        Action::FetchCompleted(scope) => {
            let api = Arc::clone(api);
            let tx = tx.clone();
            tokio::spawn(async move {
                match api.completed_orders(scope).await {
                    Ok(orders) => {
                        let _ = tx.send(Message::CompletedList { scope, orders });
                    }
                    Err(e) => {
                        tracing::warn!(?scope, error = %e, "completed list fetch failed");
                    }
                }
            });
        }
        Action::ResetCompleted(secret) => {
            let api = Arc::clone(api);
            let tx = tx.clone();
            tokio::spawn(async move {
                let error = api.reset_completed(&secret).await.err().map(|e| e.to_string());
                let _ = tx.send(Message::ResetFinished { error });
            });
        }
        Action::TriggerBackup => {
            let api = Arc::clone(api);
            let tx = tx.clone();
            tokio::spawn(async move {
                match api.backup().await {
                    Ok(receipt) => {
                        let _ = tx.send(Message::BackupFinished {
                            error: None,
                            link: receipt.link,
                        });
                    }
                    Err(e) => {
                        let _ = tx.send(Message::BackupFinished {
                            error: Some(e.to_string()),
                            link: None,
                        });
                    }
                }
            });
        }
    }
}
