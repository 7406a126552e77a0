#![deny(unsafe_code)]
//! CLI binary for rendering hero-field frames offline.
//!
//! Subcommands:
//! - `render [ENGINES...]`: run a layered scene N frames, write a PNG
//! - `list`: print available engines and blend modes
//! - `schema <engine>`: print an engine's parameter schema

mod error;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use error::CliError;
use hero_field_core::{BlendMode, Engine, PointerPath, Scene};
use hero_field_engines::EngineKind;
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

/// Frames per lap of an `--orbit` pointer.
const ORBIT_PERIOD: f64 = 240.0;

#[derive(Parser)]
#[command(name = "hero-field", about = "Render the interactive hero background offline")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a stack of engines for N frames and write a PNG of the last one.
    Render(RenderArgs),
    /// List available engines and blend modes.
    List,
    /// Print the parameter schema of one engine.
    Schema {
        /// Engine name (e.g. "particles").
        engine: String,
    },
}

#[derive(clap::Args)]
struct RenderArgs {
    /// Engine names, bottom layer first.
    #[arg(default_values = ["light-rays", "particles"])]
    engines: Vec<String>,

    /// Canvas width in pixels.
    #[arg(short = 'W', long, default_value_t = 960)]
    width: usize,

    /// Canvas height in pixels.
    #[arg(short = 'H', long, default_value_t = 540)]
    height: usize,

    /// Number of frames to simulate.
    #[arg(short, long, default_value_t = 120)]
    frames: usize,

    /// PRNG seed for deterministic output.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Pointer position as "X,Y" in pixels (default: canvas center).
    #[arg(long)]
    pointer: Option<String>,

    /// Treat the pointer as hovering the title.
    #[arg(long)]
    hover: bool,

    /// Circle the pointer around its position with this radius.
    #[arg(long)]
    orbit: Option<f64>,

    /// Blend mode for layers above the bottom one.
    #[arg(long, default_value = "screen")]
    blend: String,

    /// Per-layer opacity, bottom first (e.g. "1,0.6"). Unlisted layers are opaque.
    #[arg(long, value_delimiter = ',')]
    opacity: Vec<f64>,

    /// Engine parameters as JSON, keyed by engine name.
    #[arg(long, default_value = "{}")]
    params: String,

    /// Load the whole scene from a JSON file; other scene flags are ignored.
    #[arg(long)]
    scene: Option<PathBuf>,

    /// Output file path.
    #[arg(short, long, default_value = "hero.png")]
    output: PathBuf,
}

fn parse_point(value: &str) -> Result<(f64, f64), CliError> {
    let bad = || CliError::Input(format!("invalid --pointer {value:?}: expected X,Y"));
    let (x, y) = value.split_once(',').ok_or_else(bad)?;
    let x: f64 = x.trim().parse().map_err(|_| bad())?;
    let y: f64 = y.trim().parse().map_err(|_| bad())?;
    if !(x.is_finite() && y.is_finite()) {
        return Err(bad());
    }
    Ok((x, y))
}

fn load_scene(path: &Path) -> Result<Scene, CliError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::Io(format!("{}: {e}", path.display())))?;
    serde_json::from_str(&text)
        .map_err(|e| CliError::Input(format!("invalid scene {}: {e}", path.display())))
}

/// Builds the scene described by the render flags.
fn build_scene(args: &RenderArgs) -> Result<Scene, CliError> {
    if let Some(path) = &args.scene {
        return load_scene(path);
    }
    let params: Value = serde_json::from_str(&args.params)
        .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
    if !params.is_object() {
        return Err(CliError::Input("--params must be a JSON object".into()));
    }
    let blend = BlendMode::from_name(&args.blend).ok_or_else(|| {
        CliError::Input(format!(
            "unknown blend mode {:?} (expected one of: {})",
            args.blend,
            BlendMode::ALL.map(BlendMode::name).join(", ")
        ))
    })?;
    let (x, y) = match &args.pointer {
        Some(p) => parse_point(p)?,
        None => (args.width as f64 / 2.0, args.height as f64 / 2.0),
    };
    let pointer = match args.orbit {
        Some(radius) => PointerPath::Orbit {
            cx: x,
            cy: y,
            radius,
            period: ORBIT_PERIOD,
            hovering: args.hover,
        },
        None => PointerPath::Fixed {
            x,
            y,
            hovering: args.hover,
        },
    };

    let names: Vec<&str> = args.engines.iter().map(String::as_str).collect();
    let mut scene = Scene::new(&names, args.width, args.height, args.seed);
    scene.frames = args.frames;
    scene.params = params;
    scene.pointer = pointer;
    scene.blend = blend;
    scene.opacity = args.opacity.clone();
    Ok(scene)
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let engines = EngineKind::list_engines();
            let blends: Vec<&str> = BlendMode::ALL.iter().map(|b| b.name()).collect();
            if cli.json {
                let info = json!({
                    "engines": engines,
                    "blend_modes": blends,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Engines:");
                for name in engines {
                    println!("  {name}");
                }
                println!("Blend modes:");
                println!("  {}", blends.join(", "));
            }
        }
        Command::Schema { engine } => {
            let eng = EngineKind::from_name(&engine, 1, 1, 0, &json!({}))?;
            println!("{}", serde_json::to_string_pretty(&eng.param_schema())?);
        }
        Command::Render(args) => {
            let scene = build_scene(&args)?;
            let frame = hero_field_engines::render_scene(&scene)?;
            hero_field_engines::snapshot::write_png(&frame, &args.output)?;
            tracing::info!(output = %args.output.display(), "frame written");

            if cli.json {
                let info = json!({
                    "engines": scene.engines,
                    "width": scene.width,
                    "height": scene.height,
                    "frames": scene.frames,
                    "seed": scene.seed,
                    "blend": scene.blend.name(),
                    "output": args.output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered {} ({}x{}, {} frames, seed {}) -> {}",
                    scene.engines.join("+"),
                    scene.width,
                    scene.height,
                    scene.frames,
                    scene.seed,
                    args.output.display()
                );
            }
        }
    }

    Ok(())
}

/// Logs to stderr, filtered by `RUST_LOG` (default `info`). Records from
/// the libraries' `log` calls are forwarded into the same subscriber.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        tracing::debug!(exit_code = e.exit_code(), "command failed");
        if json_mode {
            let j = json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
