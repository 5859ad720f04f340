//! Movie/TV browser TUI main loop.
//!
//! A single task owns [`BrowserState`] and multiplexes three sources with
//! `tokio::select!`: terminal events, completed fetches, and a tick that
//! polls the search debouncer. Fetches run as spawned tasks and report back
//! over an unbounded channel.

/// Browser locations.
pub mod route;
/// Browser state types.
pub mod state;
mod ui;
/// Pure display derivations.
pub mod view;

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use futures::StreamExt;
use moviehub_api::tmdb::images::hero_image;
use moviehub_api::tmdb::{MediaKind, TmdbApi};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use self::route::Route;
use self::state::{BrowserState, DetailStatus, FetchOutcome, FetchRequest, Screen};
use crate::debounce::Debouncer;

/// How often the debouncer is polled.
const TICK_INTERVAL: Duration = Duration::from_millis(50);

/// Startup options of the browser.
#[allow(clippy::module_name_repetitions)]
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    /// Tab shown first.
    pub initial_tab: MediaKind,
    /// Quiet period before a typed query is searched.
    pub debounce: Duration,
    /// Location to open immediately, e.g. a detail page.
    pub open_route: Option<Route>,
}

/// What the event loop should do after a key press.
#[derive(Debug, PartialEq, Eq)]
pub enum KeyAction {
    /// Leave the browser.
    Quit,
    /// Keep running and perform these fetches.
    Continue(Vec<FetchRequest>),
    /// Open a URL in the system browser.
    OpenUrl(String),
}

/// Runs the browser TUI.
///
/// # Errors
///
/// Returns an error if terminal setup or event handling fails.
#[allow(clippy::module_name_repetitions)]
pub async fn run_browser<C>(client: Arc<C>, options: BrowserOptions) -> Result<()>
where
    C: TmdbApi + Sync + 'static,
{
    let mut state = BrowserState::new(options.initial_tab);
    let mut debouncer = Debouncer::new(String::new(), options.debounce);
    let (tx, rx) = unbounded_channel();

    dispatch(&client, &tx, state.fetch_top_rated());
    if let Some(request) = options.open_route.and_then(|route| state.open_route(route)) {
        dispatch(&client, &tx, request);
    }

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)
        .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let result = run_event_loop(
        &mut terminal,
        &mut state,
        &mut debouncer,
        &client,
        &tx,
        rx,
    )
    .await;

    // Cleanup (always attempt even if event loop failed)
    disable_raw_mode().context("failed to disable raw mode")?;
    crossterm::execute!(io::stdout(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;

    result
}

/// Main event loop.
async fn run_event_loop<C>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut BrowserState,
    debouncer: &mut Debouncer<String>,
    client: &Arc<C>,
    tx: &UnboundedSender<FetchOutcome>,
    mut rx: UnboundedReceiver<FetchOutcome>,
) -> Result<()>
where
    C: TmdbApi + Sync + 'static,
{
    let mut events = EventStream::new();
    let mut tick = tokio::time::interval(TICK_INTERVAL);

    loop {
        terminal
            .draw(|frame| ui::draw(frame, state))
            .context("failed to draw TUI")?;

        let requests = tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    match handle_key(state, debouncer, key, Instant::now()) {
                        KeyAction::Quit => return Ok(()),
                        KeyAction::Continue(requests) => requests,
                        KeyAction::OpenUrl(url) => {
                            open_url(state, &url);
                            Vec::new()
                        }
                    }
                }
                Some(Ok(_)) => Vec::new(),
                Some(Err(e)) => return Err(e).context("failed to read terminal event"),
                None => return Ok(()),
            },
            Some(outcome) = rx.recv() => {
                state.apply(outcome);
                Vec::new()
            }
            _ = tick.tick() => poll_debouncer(state, debouncer, Instant::now())
                .into_iter()
                .collect(),
        };

        for request in requests {
            dispatch(client, tx, request);
        }
    }
}

/// Runs a settled query, if the debouncer has one.
fn poll_debouncer(
    state: &mut BrowserState,
    debouncer: &mut Debouncer<String>,
    now: Instant,
) -> Option<FetchRequest> {
    let query = debouncer.poll(now)?.clone();
    tracing::debug!(query, "search query settled");
    state.run_search(&query)
}

/// Translates a key press into state changes and follow-up work.
fn handle_key(
    state: &mut BrowserState,
    debouncer: &mut Debouncer<String>,
    key: KeyEvent,
    now: Instant,
) -> KeyAction {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return KeyAction::Quit;
    }
    state.set_status_message(None);

    if let Screen::Detail(view) = state.screen() {
        return match key.code {
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Left => {
                state.go_back();
                debouncer.reset(String::from(state.search_query()));
                KeyAction::Continue(Vec::new())
            }
            KeyCode::Char('o') => {
                let url = match &view.status {
                    DetailStatus::Ready(item) => hero_image(item).url().map(String::from),
                    DetailStatus::Loading | DetailStatus::Failed(_) => None,
                };
                url.map_or_else(
                    || {
                        state.set_status_message(Some(String::from("No image available")));
                        KeyAction::Continue(Vec::new())
                    },
                    KeyAction::OpenUrl,
                )
            }
            _ => KeyAction::Continue(Vec::new()),
        };
    }

    let requests = match key.code {
        KeyCode::Esc => {
            if state.search_query().is_empty() {
                return KeyAction::Quit;
            }
            state.clear_search();
            debouncer.reset(String::new());
            Vec::new()
        }
        KeyCode::Tab | KeyCode::BackTab => {
            let requests = state.set_active_tab(state.active_tab().toggle());
            debouncer.reset(String::from(state.search_query()));
            requests
        }
        KeyCode::Up => {
            state.move_up();
            Vec::new()
        }
        KeyCode::Down => {
            state.move_down();
            Vec::new()
        }
        KeyCode::Enter => state.open_selected().into_iter().collect(),
        KeyCode::Backspace => {
            state.pop_query_char();
            debouncer.update(String::from(state.search_query()), now);
            Vec::new()
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            state.push_query_char(c);
            debouncer.update(String::from(state.search_query()), now);
            Vec::new()
        }
        _ => Vec::new(),
    };
    KeyAction::Continue(requests)
}

/// Opens `url` in the system browser, reporting failure in the footer.
fn open_url(state: &mut BrowserState, url: &str) {
    if let Err(e) = open::that_detached(url) {
        tracing::warn!(url, error = %e, "failed to open image");
        state.set_status_message(Some(format!("Failed to open image: {e}")));
    }
}

/// Performs `request` on a spawned task and sends the outcome to `tx`.
fn dispatch<C>(client: &Arc<C>, tx: &UnboundedSender<FetchOutcome>, request: FetchRequest)
where
    C: TmdbApi + Sync + 'static,
{
    let client = Arc::clone(client);
    let tx = tx.clone();
    tokio::spawn(async move {
        let outcome = perform(client.as_ref(), request).await;
        if tx.send(outcome).is_err() {
            tracing::debug!("browser closed before fetch completed");
        }
    });
}

/// Runs one request against the API.
async fn perform<C>(client: &C, request: FetchRequest) -> FetchOutcome
where
    C: TmdbApi + Sync,
{
    match request {
        FetchRequest::TopRated { kind, token } => FetchOutcome::TopRated {
            kind,
            token,
            result: client.top_rated(kind).await,
        },
        FetchRequest::Search { kind, query, token } => {
            let result = client.search(kind, &query).await;
            FetchOutcome::Search {
                query,
                token,
                result,
            }
        }
        FetchRequest::Details { kind, id, token } => FetchOutcome::Details {
            kind,
            id,
            token,
            result: client.details(kind, id).await,
        },
    }
}
