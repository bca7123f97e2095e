#![deny(unsafe_code)]
//! CLI for the backdrop engine.
//!
//! Subcommands:
//! - `render <variant>`: run a backdrop headlessly for N frames, write a PNG
//! - `list`: print available variants and palettes
//! - `schema <variant>`: print a variant's tuning schema

mod error;

use std::path::{Path, PathBuf};
use std::process;

use backdrop_core::{Engine, Palette, Seed, Simulation, Srgb, VariantKind};
use clap::{ArgAction, Parser, Subcommand};
use error::CliError;
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "backdrop", about = "Animated backdrop engine CLI")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Log more (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a backdrop for N frames and write a PNG snapshot.
    Render(RenderArgs),
    /// List available variants and palettes.
    List,
    /// Print the tuning schema of a variant.
    Schema {
        /// Variant name (e.g. "waves").
        variant: String,
    },
}

#[derive(clap::Args)]
struct RenderArgs {
    /// Variant name (particles, flow, waves, gradient, pyramids).
    /// Optional when --from-seed is given.
    variant: Option<String>,

    /// Viewport width in CSS pixels.
    #[arg(short = 'W', long, default_value_t = 1280)]
    width: u32,

    /// Viewport height in CSS pixels.
    #[arg(short = 'H', long, default_value_t = 720)]
    height: u32,

    /// Number of animation frames to run.
    #[arg(short, long, default_value_t = 120)]
    frames: usize,

    /// PRNG seed for deterministic output.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Palette name; overrides any palette in --params.
    #[arg(short, long)]
    palette: Option<String>,

    /// Tuning parameters as a JSON object.
    #[arg(long, default_value = "{}")]
    params: String,

    /// Render the single static frame a reduced-motion user would see.
    #[arg(long)]
    reduced_motion: bool,

    /// Page color to flatten onto (e.g. "#0b1020"); transparent if omitted.
    #[arg(long)]
    background: Option<String>,

    /// Output file path.
    #[arg(short, long, default_value = "backdrop.png")]
    output: PathBuf,

    /// Read variant, size, params, seed and frames from a seed file.
    #[arg(long)]
    from_seed: Option<PathBuf>,

    /// Write the seed that reproduces this render.
    #[arg(long)]
    save_seed: Option<PathBuf>,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

/// Parses `--params`, which must be a JSON object.
fn parse_params(raw: &str) -> Result<Value, CliError> {
    let params: Value = serde_json::from_str(raw)
        .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
    if !params.is_object() {
        return Err(CliError::Input("--params must be a JSON object".into()));
    }
    Ok(params)
}

fn read_seed(path: &Path) -> Result<Seed, CliError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::Io(format!("reading {}: {e}", path.display())))?;
    Ok(serde_json::from_str(&text)?)
}

/// Resolves the command line into the seed to render.
fn build_seed(args: &RenderArgs) -> Result<Seed, CliError> {
    let mut seed = match (&args.from_seed, &args.variant) {
        (Some(path), _) => read_seed(path)?,
        (None, Some(variant)) => {
            let mut seed = Seed::new(variant, args.width as f64, args.height as f64, args.seed);
            seed.params = parse_params(&args.params)?;
            seed.frames = args.frames;
            seed
        }
        (None, None) => {
            return Err(CliError::Input(
                "a variant name or --from-seed is required".into(),
            ))
        }
    };

    if let Some(name) = &args.palette {
        Palette::from_name(name).map_err(|e| CliError::Input(e.to_string()))?;
        if let Some(obj) = seed.params.as_object_mut() {
            obj.insert("palette".into(), Value::from(name.as_str()));
        }
    }
    seed.validate()?;
    Ok(seed)
}

fn render(args: RenderArgs, json_out: bool) -> Result<(), CliError> {
    let seed = build_seed(&args)?;
    let background = args
        .background
        .as_deref()
        .map(Srgb::from_hex)
        .transpose()
        .map_err(|e| CliError::Input(e.to_string()))?;

    let driver = backdrop_headless::render_seed(&seed, args.reduced_motion)?;
    let raster = driver
        .surface()
        .ok_or_else(|| CliError::Io("no drawing surface was produced".into()))?;
    backdrop_headless::snapshot::write_png(raster, background, &args.output)?;

    if let Some(path) = &args.save_seed {
        std::fs::write(path, serde_json::to_string_pretty(&seed)?)
            .map_err(|e| CliError::Io(format!("writing {}: {e}", path.display())))?;
    }

    let frames = driver.frames_rendered();
    if json_out {
        let info = json!({
            "variant": seed.variant,
            "width": seed.width,
            "height": seed.height,
            "frames": frames,
            "seed": seed.seed,
            "reduced_motion": args.reduced_motion,
            "params": driver.engine().params(),
            "output": args.output.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        eprintln!(
            "rendered {} ({}x{}, {frames} frames, seed {}) -> {}",
            seed.variant,
            seed.width,
            seed.height,
            seed.seed,
            args.output.display()
        );
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let variants = VariantKind::list_names();
            let palettes = Palette::list_names();
            if cli.json {
                let info = json!({
                    "variants": variants,
                    "palettes": palettes,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Variants:");
                for name in variants {
                    println!("  {name}");
                }
                println!("Palettes:");
                println!("  {}", palettes.join(", "));
            }
        }
        Command::Schema { variant } => {
            let sim = Simulation::from_json(&variant, 0, &json!({}))?;
            println!("{}", serde_json::to_string_pretty(&sim.param_schema())?);
        }
        Command::Render(args) => render(args, cli.json)?,
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(argv: &[&str]) -> RenderArgs {
        let mut full = vec!["backdrop", "render"];
        full.extend_from_slice(argv);
        match Cli::parse_from(full).command {
            Command::Render(args) => args,
            _ => unreachable!(),
        }
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_build_a_valid_seed() {
        let seed = build_seed(&args(&["waves"])).unwrap();
        assert_eq!(seed.variant, "waves");
        assert_eq!((seed.width, seed.height), (1280.0, 720.0));
        assert_eq!(seed.frames, 120);
        assert_eq!(seed.seed, 42);
    }

    #[test]
    fn palette_flag_lands_in_params() {
        let seed = build_seed(&args(&["flow", "--palette", "ember", "--params", r#"{"count":50}"#]))
            .unwrap();
        assert_eq!(seed.params["palette"], "ember");
        assert_eq!(seed.params["count"], 50);
    }

    #[test]
    fn bad_inputs_map_to_exit_codes() {
        let code = |argv: &[&str]| build_seed(&args(argv)).unwrap_err().exit_code();
        assert_eq!(code(&["waves", "--palette", "neon"]), 12);
        assert_eq!(code(&["waves", "--params", "[1,2]"]), 12);
        assert_eq!(code(&["waves", "--params", "{oops"]), 12);
        assert_eq!(code(&["lasers"]), 10);
        assert_eq!(code(&["waves", "-W", "0"]), 10);
        assert_eq!(code(&["waves", "-W", "100000", "-H", "100000"]), 10);
        assert_eq!(code(&[]), 12);
    }

    #[test]
    fn seed_file_round_trips_through_render() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("a.png");
        let seed_path = dir.path().join("a.json");
        let argv = [
            "particles",
            "-W",
            "160",
            "-H",
            "120",
            "--frames",
            "4",
            "-o",
            png.to_str().unwrap(),
            "--save-seed",
            seed_path.to_str().unwrap(),
        ];
        render(args(&argv), false).unwrap();
        assert!(png.exists());

        let replay = build_seed(&args(&["--from-seed", seed_path.to_str().unwrap()])).unwrap();
        assert_eq!(replay, build_seed(&args(&argv)).unwrap());
    }

    #[test]
    fn missing_seed_file_is_io() {
        let err = build_seed(&args(&["--from-seed", "/no/such/seed.json"])).unwrap_err();
        assert_eq!(err.exit_code(), 11);
    }
}
