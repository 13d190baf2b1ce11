//! pike entrypoint.
use anyhow::Result;
use clap::Parser;
use core_actions::{KeyTranslator, find_file, handle_input};
use core_config::{Config, ConfigContext};
use core_events::{Event, EventReceiver, InputEvent};
use core_model::EditorModel;
use core_render::RenderEngine;
use core_state::EditorState;
use core_terminal::{CrosstermBackend, FALLBACK_SIZE, TerminalBackend};
use core_text::Buffer;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::time::Duration;
use tracing::{error, info, trace, warn};
use tracing_appender::non_blocking::WorkerGuard;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "pike", version, about = "A small emacs-style text editor")]
struct Args {
    /// Files to visit. A file that does not exist opens as an empty buffer
    /// and is created on the first save.
    paths: Vec<PathBuf>,
    /// Configuration file path (overrides discovery of `pike.toml`).
    #[arg(long = "config")]
    config: Option<PathBuf>,
    /// Where the trace log goes. Truncated at startup.
    #[arg(long = "log-file", default_value = "pike.log")]
    log_file: PathBuf,
}

fn configure_logging(log_path: &Path) -> Option<WorkerGuard> {
    if log_path.exists() {
        let _ = std::fs::remove_file(log_path);
    }
    let dir = match log_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let file = log_path
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("pike.log"));
    let appender = tracing_appender::rolling::never(dir, file);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok()
        .map(|_| guard)
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            error!(target: "runtime.panic", %info, "panic");
            default_panic(info);
        }));
    });
}

/// Build the editor for a `cols` x `rows` terminal: the scratch buffer, then
/// every path on the command line. The first path ends up current.
fn bootstrap(args: &Args, (cols, rows): (u16, u16)) -> Result<(EditorModel, Config)> {
    let mut config = core_config::load_from(args.config.clone())?;
    let tab_width = config.apply_context(ConfigContext::new(cols, rows));

    let mut state = EditorState::new(Buffer::from_str(config.scratch_name(), "")?);
    state.resize(cols, rows);
    state.tab_width = usize::from(tab_width);
    state.fill_glyphs = config.fill_glyphs();

    let mut model = EditorModel::new(state);
    for path in args.paths.iter().rev() {
        find_file(&mut model, path);
    }
    info!(
        target: "runtime.startup",
        buffers = model.state().buffer_count(),
        cols,
        rows,
        tab_width,
        config_override = args.config.is_some(),
        "bootstrap_complete"
    );
    Ok((model, config))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShutdownReason {
    Quit,
    InputError,
    Signal,
    ChannelClosed,
}

impl ShutdownReason {
    fn as_str(&self) -> &'static str {
        match self {
            ShutdownReason::Quit => "quit",
            ShutdownReason::InputError => "input_error",
            ShutdownReason::Signal => "signal",
            ShutdownReason::ChannelClosed => "channel_closed",
        }
    }
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The event loop: one input event at a time, redraw when dirty.
struct EditorRuntime<W: Write> {
    model: EditorModel,
    config: Config,
    translator: KeyTranslator,
    engine: RenderEngine,
    rx: EventReceiver,
    out: W,
}

impl<W: Write> EditorRuntime<W> {
    fn new(model: EditorModel, config: Config, rx: EventReceiver, out: W) -> Self {
        Self {
            model,
            config,
            translator: KeyTranslator::default(),
            engine: RenderEngine::new(),
            rx,
            out,
        }
    }

    async fn run(&mut self) -> Result<ShutdownReason> {
        self.render()?;
        let loop_span = tracing::debug_span!(target: "runtime", "event_loop");
        let _enter = loop_span.enter();
        while let Some(event) = self.rx.recv().await {
            let input = match event {
                Event::Input(input) => input,
                Event::Shutdown => return Ok(ShutdownReason::Signal),
            };
            let input_failed = matches!(input, InputEvent::Error(_));
            if let InputEvent::Resize(cols, rows) = input {
                self.apply_resize(cols, rows);
            }
            let result = handle_input(&mut self.translator, &mut self.model, input);
            if result.quit {
                return Ok(if input_failed {
                    ShutdownReason::InputError
                } else {
                    ShutdownReason::Quit
                });
            }
            if result.dirty {
                self.render()?;
            }
        }
        Ok(ShutdownReason::ChannelClosed)
    }

    fn apply_resize(&mut self, cols: u16, rows: u16) {
        if let Some(tab_width) = self
            .config
            .recompute_with_context(ConfigContext::new(cols, rows))
        {
            self.model.state_mut().tab_width = usize::from(tab_width);
        }
        self.engine.invalidate_for_resize();
    }

    fn render(&mut self) -> Result<()> {
        self.engine.render(&mut self.model, &mut self.out)
    }
}

fn log_shutdown(reason: ShutdownReason, frames: u64) {
    info!(
        target: "runtime.shutdown",
        reason = reason.as_str(),
        frames,
        last_render_ns = core_render::timing::last_render_ns(),
        max_render_ns = core_render::timing::max_render_ns(),
        total_render_ns = core_render::timing::total_render_ns(),
        keypresses = core_events::KEYPRESS_TOTAL.load(std::sync::atomic::Ordering::Relaxed),
        "shutdown"
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = configure_logging(&args.log_file);
    install_panic_hook();
    info!(target: "runtime", "startup");

    let mut backend = CrosstermBackend::new();
    let size = backend.size().unwrap_or_else(|e| {
        warn!(target: "runtime", error = %e, "terminal_size_unavailable");
        FALLBACK_SIZE
    });
    let (model, config) = bootstrap(&args, size)?;

    backend.set_title("pike")?;
    let guard = backend.enter_guard()?;
    let (tx, rx) = core_events::event_channel();
    let (input_task, input_shutdown) = core_input::spawn_async_input(tx);

    let mut runtime = EditorRuntime::new(model, config, rx, std::io::stdout());
    let outcome = runtime.run().await;
    let reason = outcome.as_ref().copied().unwrap_or(ShutdownReason::ChannelClosed);
    log_shutdown(reason, runtime.engine.frames_rendered());

    input_shutdown.signal();
    match tokio::time::timeout(Duration::from_millis(200), input_task).await {
        Ok(Ok(())) => trace!(target: "runtime.shutdown", "input_task_joined"),
        Ok(Err(err)) => error!(target: "runtime.shutdown", ?err, "input_task_join_failed"),
        Err(_) => warn!(target: "runtime.shutdown", "input_task_timeout"),
    }
    drop(guard);
    outcome.map(|_| ())
}
