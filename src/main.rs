use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ethik_quiz::{
    App, Config, Error, GatewayHandle, GatewayResponse, HttpGateway, KeyValueStore, MemoryStore,
    SqliteStore, SystemClock, logger, spawn_gateway_worker, ui,
};
use futures::StreamExt;
use ratatui::{Terminal, backend::Backend, backend::CrosstermBackend};
use std::io;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Config::from_env()?;
    let _log_guard = logger::init(&config.log_file)?;
    info!(
        api_url = %config.api_url,
        db_path = %config.db_path.display(),
        "Starting ethik-quiz"
    );

    let store: Box<dyn KeyValueStore> = match SqliteStore::open(&config.db_path) {
        Ok(store) => Box::new(store),
        Err(e) => {
            warn!(error = %e, "Could not open settings database, using in-memory store");
            Box::new(MemoryStore::new())
        }
    };

    let gateway = Arc::new(HttpGateway::new(&config)?);
    let (handle, requests) = GatewayHandle::channel();
    let (response_tx, mut response_rx) = mpsc::unbounded_channel();
    let worker = spawn_gateway_worker(gateway, requests, response_tx);

    let mut app = App::new(store, handle, Arc::new(SystemClock), &config);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app, &mut response_rx).await;

    app.shutdown();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    drop(app);
    worker.abort();

    if let Err(e) = &result {
        error!(error = %e, "ethik-quiz exited with error");
    } else {
        info!("ethik-quiz exited");
    }
    result
}

async fn run<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    responses: &mut mpsc::UnboundedReceiver<GatewayResponse>,
) -> Result<(), Error> {
    let (tick_tx, mut tick_rx) = mpsc::unbounded_channel();
    let mut events = EventStream::new();

    loop {
        app.sync_ticker(&tick_tx);
        terminal.draw(|f| ui::draw(f, app))?;

        tokio::select! {
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    if app.handle_key(key) {
                        break;
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
            Some(response) = responses.recv() => app.handle_response(response),
            Some(_) = tick_rx.recv() => app.tick(),
        }
    }

    Ok(())
}
