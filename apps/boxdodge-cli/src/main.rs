use anyhow::Context;
use boxdodge_input::{Action, InputSnapshot, KeyBindings};
use boxdodge_kernel::{ControlScheme, Session, SessionConfig, SessionState, UiSink};
use boxdodge_render::{DebugTextRenderer, RenderView, Renderer, SceneMirror};
use boxdodge_tools::SessionInspector;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "boxdodge-cli", about = "Headless runner for boxdodge sessions")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Run a session without a window, feeding scripted input
    Simulate {
        /// Number of frames to run
        #[arg(short, long, default_value = "600")]
        ticks: u64,
        /// Override the spawn seed
        #[arg(short, long)]
        seed: Option<u64>,
        /// Override the control scheme
        #[arg(long, value_enum)]
        scheme: Option<SchemeArg>,
        /// Actions held for the whole run (e.g. `--hold left --hold forward`)
        #[arg(long)]
        hold: Vec<Action>,
        /// Press jump once every N frames
        #[arg(long)]
        jump_every: Option<u64>,
        /// Dump the scene every N frames
        #[arg(long)]
        dump_every: Option<u64>,
        /// JSON session config
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Validate a JSON session config, or print the defaults
    CheckConfig {
        /// File to validate; defaults are printed when omitted
        path: Option<PathBuf>,
    },
    /// Show key bindings, either the defaults or from a JSON file
    Bindings {
        path: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SchemeArg {
    Screen,
    Heading,
}

impl From<SchemeArg> for ControlScheme {
    fn from(arg: SchemeArg) -> Self {
        match arg {
            SchemeArg::Screen => ControlScheme::ScreenRelative,
            SchemeArg::Heading => ControlScheme::HeadingRelative,
        }
    }
}

/// Prints menu signals the desktop shell would show.
struct ConsoleMenus {
    frame: u64,
}

impl UiSink for ConsoleMenus {
    fn on_game_over(&mut self) {
        println!("[frame {}] GAME OVER", self.frame);
    }
    fn on_pause(&mut self) {
        println!("[frame {}] paused", self.frame);
    }
    fn on_resume(&mut self) {
        println!("[frame {}] resumed", self.frame);
    }
    fn on_quit(&mut self) {
        println!("[frame {}] quit", self.frame);
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<SessionConfig> {
    match path {
        Some(p) => SessionConfig::load(p).with_context(|| format!("loading {}", p.display())),
        None => Ok(SessionConfig::default()),
    }
}

struct Script {
    hold: Vec<Action>,
    jump_every: Option<u64>,
}

impl Script {
    fn input_for(&self, frame: u64) -> InputSnapshot {
        let mut input = InputSnapshot::with(&self.hold);
        if let Some(n) = self.jump_every.filter(|n| *n > 0) {
            if frame % n == 0 {
                input.set(Action::Jump, true);
            }
        }
        input
    }
}

fn simulate(
    config: SessionConfig,
    ticks: u64,
    script: &Script,
    dump_every: Option<u64>,
) -> anyhow::Result<()> {
    let mut session = Session::new(config)?;
    let mut scene = SceneMirror::new();
    let renderer = DebugTextRenderer::new();
    let mut menus = ConsoleMenus { frame: 0 };

    let mut token = Some(session.start()?);
    while let Some(t) = token {
        if session.frame() >= ticks {
            break;
        }
        token = session.on_frame(t, &script.input_for(session.frame()));
        scene.update(&mut session);
        menus.frame = session.frame();
        session.dispatch_signals(&mut menus);

        if let Some(n) = dump_every.filter(|n| *n > 0) {
            if session.frame() % n == 0 {
                print!(
                    "{}",
                    renderer.render(&scene, &RenderView::from(session.camera()))
                );
            }
        }
    }

    println!("{}", SessionInspector::summary(&session));
    for (info, distance) in SessionInspector::nearest_obstacles(&session, 3) {
        println!("  {info} dist={distance:.2}");
    }
    if session.state() == SessionState::GameOver {
        println!("Survived {} frames", session.frame());
    }

    session.quit();
    scene.update(&mut session);
    session.dispatch_signals(&mut menus);
    tracing::debug!("scene empty after quit: {}", scene.is_empty());
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    match cli.command {
        Commands::Info => {
            println!("boxdodge-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("render: {}", boxdodge_render::crate_info());
            println!("tools: {}", boxdodge_tools::crate_info());
            let config = SessionConfig::default();
            println!(
                "defaults: scheme={:?} spawn={}/{}/{} seed={}",
                config.scheme,
                config.spawn.initial_interval,
                config.spawn.interval_step,
                config.spawn.interval_floor,
                config.seed
            );
        }
        Commands::Simulate {
            ticks,
            seed,
            scheme,
            hold,
            jump_every,
            dump_every,
            config,
        } => {
            let mut session_config = load_config(config.as_ref())?;
            if let Some(seed) = seed {
                session_config.seed = seed;
            }
            if let Some(scheme) = scheme {
                session_config.scheme = scheme.into();
            }
            println!(
                "Simulating {ticks} frames: seed={} scheme={:?} hold={:?}",
                session_config.seed, session_config.scheme, hold
            );
            simulate(session_config, ticks, &Script { hold, jump_every }, dump_every)?;
        }
        Commands::CheckConfig { path } => {
            let config = load_config(path.as_ref())?;
            if let Some(p) = &path {
                println!("{}: OK", p.display());
            }
            println!("{}", config.to_json_pretty()?);
        }
        Commands::Bindings { path } => {
            let bindings = match &path {
                Some(p) => {
                    let text = std::fs::read_to_string(p)
                        .with_context(|| format!("reading {}", p.display()))?;
                    serde_json::from_str::<KeyBindings>(&text)
                        .with_context(|| format!("parsing {}", p.display()))?
                }
                None => KeyBindings::default(),
            };
            for action in Action::ALL {
                println!(
                    "{:<13} {}",
                    action.to_string(),
                    bindings.codes_for(action).join(", ")
                );
            }
        }
    }

    Ok(())
}
