use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventKind,
    HandlerResponse, Keybindings, TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

use pokedex::action::Action;
use pokedex::effect::Effect;
use pokedex::reducer::reducer;
use pokedex::state::{AppState, View};
use pokedex::ui::{DexComponentId, DexContext, DexUi};
use pokedex::{api, export, sprite};

#[derive(Parser, Debug)]
#[command(name = "pokedex")]
#[command(about = "Pokedex TUI with stat charts and PDF export")]
struct Args {
    /// Directory that receives exported PDFs
    #[arg(long, default_value = ".")]
    export_dir: String,

    /// View to open on launch
    #[arg(long, value_enum, default_value_t = StartView::Landing)]
    start: StartView,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum StartView {
    Landing,
    Catalog,
}

impl From<StartView> for View {
    fn from(start: StartView) -> Self {
        match start {
            StartView::Landing => View::Landing,
            StartView::Catalog => View::Catalog,
        }
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();
    let start = View::from(args.start);
    let export_dir = args.export_dir;
    let debug = DebugSession::new(args.debug);

    let state = debug
        .load_state_or_else_async(|| async move {
            Ok::<AppState, io::Error>(AppState::new(start, export_dir))
        })
        .await
        .map_err(debug_error)?;
    let replay_actions = debug.load_replay_items().map_err(debug_error)?;
    let (middleware, recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, replay_actions).await;

    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug.save_actions(recorder.as_ref()).map_err(debug_error)?;
    Ok(())
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(DexUi::new()));
    let mut bus: EventBus<AppState, Action, DexComponentId, DexContext> = EventBus::new();
    let keybindings: Keybindings<DexContext> = Keybindings::new();

    let ui_landing = Rc::clone(&ui);
    bus.register(DexComponentId::Landing, move |event, state| {
        ui_landing
            .borrow_mut()
            .handle_landing_event(&event.kind, state)
    });

    let ui_catalog = Rc::clone(&ui);
    bus.register(DexComponentId::Catalog, move |event, state| {
        ui_catalog
            .borrow_mut()
            .handle_catalog_event(&event.kind, state)
    });

    let ui_overlay = Rc::clone(&ui);
    bus.register(DexComponentId::Overlay, move |event, state| {
        ui_overlay
            .borrow_mut()
            .handle_overlay_event(&event.kind, state)
    });

    bus.register_global(|event, state| match event.kind {
        EventKind::Resize(width, height) => {
            HandlerResponse::action(Action::UiTerminalResize(width, height)).with_render()
        }
        EventKind::Key(key) => match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                HandlerResponse::action(Action::Quit)
            }
            KeyCode::Char('q') if typing_free(state) => HandlerResponse::action(Action::Quit),
            _ => HandlerResponse::ignored(),
        },
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::Init),
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }
                runtime
                    .subscriptions()
                    .interval("tick", Duration::from_millis(90), || Action::Tick);
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            handle_effect,
        )
        .await
}

/// `q` quits only where no text field is taking input.
fn typing_free(state: &AppState) -> bool {
    state.view == View::Catalog && !state.catalog.search.active
}

fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>) {
    match effect {
        Effect::LoadCatalog { url, delay_ms } => {
            ctx.tasks().spawn(TaskKey::new("catalog"), async move {
                match api::deferred(delay_ms, api::fetch_catalog(&url)).await {
                    Ok(entries) => Action::CatalogDidLoad(entries),
                    Err(error) => Action::CatalogDidError(error.to_string()),
                }
            });
        }
        Effect::LoadDetail { seq, url } => {
            ctx.tasks().spawn(TaskKey::new("detail"), async move {
                match api::fetch_detail(&url).await {
                    Ok(record) => Action::DetailDidLoad { seq, record },
                    Err(error) => Action::DetailDidError {
                        seq,
                        error: error.to_string(),
                    },
                }
            });
        }
        Effect::LoadSprite { name, url } => {
            let key = format!("sprite_{name}");
            ctx.tasks().spawn(TaskKey::new(key), async move {
                let bytes = match api::fetch_bytes(&url).await {
                    Ok(bytes) => bytes,
                    Err(error) => {
                        return Action::SpriteDidError {
                            name,
                            error: error.to_string(),
                        }
                    }
                };
                match sprite::decode_sprite(&bytes) {
                    Ok(sprite) => Action::SpriteDidLoad { name, sprite },
                    Err(error) => Action::SpriteDidError {
                        name,
                        error: error.to_string(),
                    },
                }
            });
        }
        Effect::CancelCatalogTasks => {
            ctx.tasks().cancel(&TaskKey::new("catalog"));
            ctx.tasks().cancel(&TaskKey::new("detail"));
            ctx.tasks().cancel(&TaskKey::new("export"));
        }
        Effect::ExportPdf(job) => {
            ctx.tasks().spawn(TaskKey::new("export"), async move {
                match tokio::task::spawn_blocking(move || export::export_pdf(&job)).await {
                    Ok(Ok(path)) => Action::ExportDidSave(path.display().to_string()),
                    Ok(Err(error)) => Action::ExportDidError(error.to_string()),
                    Err(error) => Action::ExportDidError(error.to_string()),
                }
            });
        }
    }
}
