use std::{
    fs::File,
    io::{BufReader, Write},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use deckmotion::{
    AdvanceOutcome, Applicability, Deck, ElementKind, EngineOpts, MemoryScene, MotionEngine, Pose,
    PresetRegistry,
};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(name = "deckmotion", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the built-in presets as JSON lines.
    Presets(PresetsArgs),
    /// Present a deck headlessly and trace node states.
    Play(PlayArgs),
    /// Preview one preset on one element and trace it until it reverts.
    Preview(PreviewArgs),
}

#[derive(Parser, Debug)]
struct PresetsArgs {
    /// Only presets applicable to this element kind (`text`, `rect`, ...).
    #[arg(long)]
    kind: Option<String>,
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Input deck JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Engine options JSON (camelCase keys; missing keys use defaults).
    #[arg(long)]
    opts: Option<PathBuf>,

    /// Stop the clock at this time.
    #[arg(long, default_value_t = 3000.0)]
    until_ms: f64,

    /// Emit a node snapshot at most this often.
    #[arg(long, default_value_t = 100.0)]
    trace_every_ms: f64,
}

#[derive(Parser, Debug)]
struct PlayArgs {
    #[command(flatten)]
    run: RunArgs,

    /// Slide to enter first.
    #[arg(long, default_value_t = 0)]
    slide: usize,

    /// Number of clicks to issue.
    #[arg(long, default_value_t = 0)]
    clicks: u32,

    /// Spacing between clicks; the first click lands one interval after entry.
    #[arg(long, default_value_t = 600.0)]
    click_every_ms: f64,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    #[command(flatten)]
    run: RunArgs,

    /// Element to preview.
    #[arg(long)]
    element: String,

    /// Preset id.
    #[arg(long)]
    preset: String,
}

/// One line of trace output.
#[derive(serde::Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
enum TraceLine<'a> {
    Slide {
        #[serde(rename = "tMs")]
        t_ms: f64,
        index: usize,
    },
    Click {
        #[serde(rename = "tMs")]
        t_ms: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        revealed: Option<&'a str>,
        navigated: bool,
    },
    Frame {
        #[serde(rename = "tMs")]
        t_ms: f64,
        nodes: Vec<NodeTrace<'a>>,
    },
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct NodeTrace<'a> {
    id: &'a str,
    #[serde(flatten)]
    pose: Pose,
    visible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct PresetLine<'a> {
    id: &'a str,
    label: &'a str,
    text_only: bool,
    default_duration_secs: f64,
}

fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Presets(args) => cmd_presets(args),
        Command::Play(args) => cmd_play(args),
        Command::Preview(args) => cmd_preview(args),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> anyhow::Result<T> {
    let f = File::open(path).with_context(|| format!("open {what} '{}'", path.display()))?;
    serde_json::from_reader(BufReader::new(f)).with_context(|| format!("parse {what} JSON"))
}

fn load_engine(run: &RunArgs) -> anyhow::Result<MotionEngine<MemoryScene>> {
    let deck: Deck = read_json(&run.in_path, "deck")?;
    let opts: EngineOpts = match &run.opts {
        Some(path) => read_json(path, "engine options")?,
        None => EngineOpts::default(),
    };
    if let Err(err) = deck.validate(&PresetRegistry::builtin()) {
        tracing::warn!(%err, "deck failed validation; playing it anyway");
    }
    let scene = MemoryScene::from_deck(&deck);
    Ok(MotionEngine::new(deck, scene, opts)?)
}

fn emit(out: &mut dyn Write, line: &TraceLine<'_>) -> anyhow::Result<()> {
    serde_json::to_writer(&mut *out, line)?;
    writeln!(out)?;
    Ok(())
}

/// Node states of the active slide, or of `focus` when no slide is being presented.
fn snapshot<'a>(
    engine: &'a MotionEngine<MemoryScene>,
    focus: Option<usize>,
    t_ms: f64,
) -> TraceLine<'a> {
    let nodes = engine
        .current_slide()
        .or(focus)
        .and_then(|i| engine.deck().slides.get(i))
        .map(|slide| {
            slide
                .elements
                .iter()
                .filter_map(|e| {
                    let node = engine.scene().state(&e.id)?;
                    Some(NodeTrace {
                        id: &e.id,
                        pose: node.pose,
                        visible: node.visible,
                        text: node.text,
                    })
                })
                .collect()
        })
        .unwrap_or_default();
    TraceLine::Frame { t_ms, nodes }
}

fn cmd_presets(args: PresetsArgs) -> anyhow::Result<()> {
    let registry = PresetRegistry::builtin();
    let kind = args
        .kind
        .as_deref()
        .map(str::parse::<ElementKind>)
        .transpose()?;

    let mut out = std::io::stdout().lock();
    for preset in registry.iter() {
        if kind.is_some_and(|k| !preset.is_applicable_to(k)) {
            continue;
        }
        let line = PresetLine {
            id: preset.id,
            label: preset.label,
            text_only: preset.applicability == Applicability::TextOnly,
            default_duration_secs: preset.default_duration_secs,
        };
        serde_json::to_writer(&mut out, &line)?;
        writeln!(out)?;
    }
    Ok(())
}

type FrameHook<'h> =
    dyn FnMut(&mut MotionEngine<MemoryScene>, f64, &mut dyn Write) -> anyhow::Result<()> + 'h;

/// Tick at the engine's frame interval until `until_ms`, calling `on_frame` before each tick
/// and tracing after it.
fn drive(
    engine: &mut MotionEngine<MemoryScene>,
    run: &RunArgs,
    focus: Option<usize>,
    out: &mut dyn Write,
    on_frame: &mut FrameHook<'_>,
) -> anyhow::Result<()> {
    let frame_ms = engine.opts().frame_interval_ms;
    let mut next_trace = 0.0;
    let mut t = engine.scheduler().now_ms();
    loop {
        on_frame(engine, t, out)?;
        engine.tick(t);
        if t >= next_trace || t >= run.until_ms {
            emit(out, &snapshot(engine, focus, t))?;
            next_trace = t + run.trace_every_ms.max(frame_ms);
        }
        if t >= run.until_ms {
            break;
        }
        t = (t + frame_ms).min(run.until_ms);
    }
    Ok(())
}

fn cmd_play(args: PlayArgs) -> anyhow::Result<()> {
    let mut engine = load_engine(&args.run)?;
    let mut out = std::io::stdout().lock();

    engine.on_slide_entered(args.slide)?;
    emit(
        &mut out,
        &TraceLine::Slide {
            t_ms: 0.0,
            index: args.slide,
        },
    )?;

    let mut clicks_left = args.clicks;
    let mut next_click = args.click_every_ms;
    drive(&mut engine, &args.run, None, &mut out, &mut |engine, t, out| {
        if clicks_left == 0 || t < next_click {
            return Ok(());
        }
        clicks_left -= 1;
        next_click += args.click_every_ms;

        let before = engine.current_slide();
        let revealed = match engine.handle_click() {
            AdvanceOutcome::Revealed(id) => Some(id),
            AdvanceOutcome::NavigateNext => None,
        };
        let after = engine.current_slide();
        emit(
            out,
            &TraceLine::Click {
                t_ms: t,
                revealed: revealed.as_deref(),
                navigated: before != after,
            },
        )?;
        match after {
            Some(index) if before != after => emit(out, &TraceLine::Slide { t_ms: t, index }),
            _ => Ok(()),
        }
    })?;

    engine.close();
    Ok(())
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    let mut engine = load_engine(&args.run)?;
    let slide = engine
        .deck()
        .slide_of(&args.element)
        .with_context(|| format!("element '{}' is not in the deck", args.element))?;
    let mut out = std::io::stdout().lock();

    engine
        .preview_animation(&args.element, &args.preset)
        .with_context(|| format!("preview '{}' on '{}'", args.preset, args.element))?;
    drive(&mut engine, &args.run, Some(slide), &mut out, &mut |_, _, _| Ok(()))?;

    engine.close();
    Ok(())
}
