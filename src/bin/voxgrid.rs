use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use voxgrid::SceneGraph as _;

#[derive(Parser, Debug)]
#[command(name = "voxgrid", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build every configured grid and report dimensions and cell counts.
    Inspect(InspectArgs),
    /// Run transitions headlessly on the in-memory scene and report timings.
    Simulate(SimulateArgs),
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Input scene configuration JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    /// Input scene configuration JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Grid ids to select, in order (repeatable).
    #[arg(long = "select")]
    selections: Vec<String>,

    /// Simulation frame rate.
    #[arg(long, default_value_t = 60)]
    fps: u32,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Inspect(args) => cmd_inspect(args),
        Command::Simulate(args) => cmd_simulate(args),
    }
}

fn read_scene_json(path: &Path) -> anyhow::Result<voxgrid::SceneConfig> {
    let f = File::open(path).with_context(|| format!("open scene config '{}'", path.display()))?;
    let r = BufReader::new(f);
    let config: voxgrid::SceneConfig =
        serde_json::from_reader(r).with_context(|| "parse scene config JSON")?;
    config.validate()?;
    Ok(config)
}

fn build_report(
    config: &voxgrid::SceneConfig,
    in_path: &Path,
) -> voxgrid::BuildReport {
    let assets_root = in_path.parent().unwrap_or_else(|| Path::new("."));
    let source = voxgrid::FsAssetSource::new(assets_root);
    voxgrid::build_grids(&config.masks, &config.grid, &source)
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let config = read_scene_json(&args.in_path)?;
    let report = build_report(&config, &args.in_path);

    for grid in &report.grids {
        eprintln!(
            "{}: {}x{} lattice, {} cells, video '{}'",
            grid.id,
            grid.dims.width,
            grid.dims.height,
            grid.cells.len(),
            grid.video.source
        );
    }
    for failure in &report.failures {
        eprintln!("{}: build failed: {}", failure.id, failure.error);
    }
    eprintln!(
        "ready: {} ({}/{} grids built)",
        report.is_ready(),
        report.grids.len(),
        report.configured()
    );

    if !report.is_ready() {
        anyhow::bail!("not every configured grid built");
    }
    Ok(())
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    let config = read_scene_json(&args.in_path)?;
    let report = build_report(&config, &args.in_path);
    if !report.is_ready() {
        anyhow::bail!("not every configured grid built; refusing to simulate");
    }

    let mut scene = voxgrid::MemoryScene::new();
    let grids: Vec<voxgrid::Grid> = report
        .grids
        .into_iter()
        .map(|proto| proto.instantiate(&mut scene))
        .collect();

    let initial = config.masks[0].id.clone();
    let mut controller = voxgrid::TransitionController::new(
        grids,
        &initial,
        config.transition.clone(),
        &mut scene,
    )?;
    let mut scheduler = voxgrid::FrameScheduler::new();

    let dt = 1.0 / f64::from(args.fps.max(1));
    for target in &args.selections {
        match controller.select(target, &mut scheduler) {
            Ok(voxgrid::SelectOutcome::AlreadyCurrent) => {
                eprintln!("{target}: already current");
            }
            Ok(voxgrid::SelectOutcome::Started) => {
                let mut frames = 0u64;
                while controller.is_animating() || !scheduler.is_idle() {
                    scheduler.advance(&mut scene, dt);
                    controller.tick(&scheduler);
                    frames += 1;
                    if frames > 1_000_000 {
                        anyhow::bail!("simulation did not settle (bug)");
                    }
                }
                eprintln!(
                    "{target}: settled after {frames} frames, background {}",
                    scene.background()
                );
            }
            Err(e) => eprintln!("{target}: rejected: {e}"),
        }
    }

    eprintln!(
        "final grid: {} (clock {:.3}s)",
        controller.current(),
        scheduler.clock()
    );
    Ok(())
}
