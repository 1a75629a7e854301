//! Superscope: run a preset against audio features and print the frames.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;

use superscope::engine::{CanvasSize, EngineConfig, Frame, ScopeEngine};
use superscope::environment::Environment;
use superscope::preset::samples;
use superscope::source::{FeatureSource, SyntheticSource, WavSource};

#[derive(Parser, Debug)]
#[command(name = "superscope", version, about = "Audio-reactive Superscope preset interpreter")]
struct Cli {
    /// Preset file (.avs or .txt)
    preset: Option<PathBuf>,

    /// Use a bundled preset instead of a file
    #[arg(long, conflicts_with = "preset")]
    builtin: Option<String>,

    /// List bundled presets and exit
    #[arg(long, default_value_t = false)]
    list_builtins: bool,

    /// Engine config YAML (defaults to ~/.superscope/engine.yaml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the RNG seed from the config
    #[arg(long)]
    seed: Option<u64>,

    /// Frames to render (ignored with --follow)
    #[arg(long, default_value_t = 8)]
    frames: u32,

    #[arg(long, default_value_t = 30.0)]
    fps: f64,

    #[arg(long, default_value_t = 640)]
    width: u32,

    #[arg(long, default_value_t = 480)]
    height: u32,

    /// Drive the preset from a WAV file instead of a synthetic pulse
    #[arg(long)]
    audio: Option<PathBuf>,

    /// Tempo of the synthetic pulse
    #[arg(long, default_value_t = 120.0)]
    bpm: f64,

    #[arg(long, value_enum, default_value_t = OutputFormat::Summary)]
    format: OutputFormat,

    /// Render in real time until Ctrl-C
    #[arg(long, default_value_t = false)]
    follow: bool,

    /// Print every bound preset variable to stderr after rendering
    #[arg(long, default_value_t = false)]
    dump_vars: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// One line per frame
    Summary,
    /// Every point, as a YAML document per frame
    Yaml,
}

#[derive(Serialize)]
struct FrameRecord<'a> {
    frame: u64,
    time: f64,
    #[serde(flatten)]
    frame_data: &'a Frame,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if cli.list_builtins {
        for name in samples::names() {
            println!("{name}");
        }
        return Ok(());
    }
    if !cli.fps.is_finite() || cli.fps <= 0.0 {
        bail!("--fps must be positive");
    }

    let mut config = match &cli.config {
        Some(path) => EngineConfig::load_from(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => EngineConfig::load().unwrap_or_default(),
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    let text = preset_text(&cli)?;
    let mut engine = ScopeEngine::new(config);
    engine.load_preset(&text);
    for (hook, diag) in engine.diagnostics() {
        eprintln!("{}: {diag}", hook.name());
    }

    let mut source: Box<dyn FeatureSource> = match &cli.audio {
        Some(path) => Box::new(
            WavSource::open(path).with_context(|| format!("reading audio {}", path.display()))?,
        ),
        None => Box::new(SyntheticSource::new(cli.bpm)),
    };

    let size = CanvasSize::new(cli.width as f64, cli.height as f64);

    if cli.follow {
        follow(&cli, &mut engine, source.as_mut(), size)?;
    } else {
        for index in 0..cli.frames as u64 {
            let time = index as f64 / cli.fps;
            let frame = engine.render_frame(&source.features_at(time), size);
            print_frame(cli.format, index, time, &frame)?;
        }
    }

    if cli.dump_vars {
        eprint!("{}", variables_report(engine.environment()));
    }
    Ok(())
}

/// One `name = value` line per bound variable, in first-use order.
fn variables_report(env: &Environment) -> String {
    env.iter()
        .map(|(name, value)| format!("{name} = {value}\n"))
        .collect()
}

fn preset_text(cli: &Cli) -> Result<String> {
    if let Some(name) = &cli.builtin {
        return match samples::find(name) {
            Some(text) => Ok(text.to_string()),
            None => bail!(
                "unknown builtin preset '{name}' (available: {})",
                samples::names().collect::<Vec<_>>().join(", ")
            ),
        };
    }
    match &cli.preset {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading preset {}", path.display())),
        None => Ok(String::new()),
    }
}

fn follow(
    cli: &Cli,
    engine: &mut ScopeEngine,
    source: &mut dyn FeatureSource,
    size: CanvasSize,
) -> Result<()> {
    let running = Arc::new(AtomicBool::new(true));
    let flag = Arc::clone(&running);
    ctrlc::set_handler(move || flag.store(false, Ordering::SeqCst))
        .context("installing Ctrl-C handler")?;

    let frame_period = Duration::from_secs_f64(1.0 / cli.fps);
    let end = source.duration();
    let started = Instant::now();
    let mut index = 0u64;

    while running.load(Ordering::SeqCst) {
        let tick = Instant::now();
        let time = started.elapsed().as_secs_f64();
        if end.is_some_and(|end| time > end) {
            break;
        }

        let frame = engine.render_frame(&source.features_at(time), size);
        print_frame(cli.format, index, time, &frame)?;
        index += 1;

        if let Some(rest) = frame_period.checked_sub(tick.elapsed()) {
            thread::sleep(rest);
        }
    }

    log::info!("rendered {index} frames");
    Ok(())
}

fn print_frame(format: OutputFormat, index: u64, time: f64, frame: &Frame) -> Result<()> {
    match format {
        OutputFormat::Summary => println!("{}", summary_line(index, time, frame)),
        OutputFormat::Yaml => {
            let record = FrameRecord {
                frame: index,
                time,
                frame_data: frame,
            };
            print!("---\n{}", serde_yaml::to_string(&record)?);
        }
    }
    Ok(())
}

fn summary_line(index: u64, time: f64, frame: &Frame) -> String {
    let (min_x, max_x, min_y, max_y) = frame.points.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY),
        |(x0, x1, y0, y1), p| (x0.min(p.x), x1.max(p.x), y0.min(p.y), y1.max(p.y)),
    );
    let color = match frame.stroke.color {
        Some(c) => format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b),
        None => "-".to_string(),
    };
    format!(
        "frame {index:>5} t={time:>7.3} points={:>4} beat={} width={:.1} color={color} \
         x=[{min_x:.1}, {max_x:.1}] y=[{min_y:.1}, {max_y:.1}]",
        frame.points.len(),
        if frame.beat { "yes" } else { "no " },
        frame.stroke.width,
    )
}
