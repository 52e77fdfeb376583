use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tricolor::{
    CastOutcome, Compositor, Config, CounterStore, DesktopPlatform, DocumentDirStore,
    ExportFormat, ExportService, Feedback, FileStorage, FsAssetSource, RasterSurface, Scene,
    TricolorError, VoteService,
};

#[derive(Parser, Debug)]
#[command(name = "tricolor", version)]
struct Cli {
    /// JSON config file; `TRICOLOR_*` environment variables override it.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the tribute gallery with current vote counts.
    Fighters(FightersArgs),
    /// Cast one vote.
    Vote(VoteArgs),
    /// Merge stranded local votes and print the totals.
    Tally,
    /// List the card background templates.
    Templates,
    /// Render a card scene to an image file.
    Render(RenderArgs),
    /// Render a card and share it through the desktop fallback chain.
    Share(ShareArgs),
}

#[derive(Parser, Debug)]
struct FightersArgs {
    /// Print JSON instead of a table.
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Parser, Debug)]
struct VoteArgs {
    /// Gallery id to vote for.
    #[arg(long)]
    fighter: String,

    /// Treat the remote store as unreachable.
    #[arg(long, default_value_t = false)]
    offline: bool,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Card scene JSON.
    #[arg(long)]
    scene: PathBuf,

    /// Output path; `.jpg`/`.jpeg` selects JPEG, anything else PNG.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct ShareArgs {
    /// Card scene JSON.
    #[arg(long)]
    scene: PathBuf,

    /// Directory downloads are written to.
    #[arg(long = "out-dir", default_value = ".")]
    out_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = Config::load(cli.config.as_deref())?;
    match cli.cmd {
        Command::Fighters(args) => cmd_fighters(&cfg, args),
        Command::Vote(args) => cmd_vote(&cfg, args),
        Command::Tally => cmd_tally(&cfg),
        Command::Templates => cmd_templates(),
        Command::Render(args) => cmd_render(&cfg, args),
        Command::Share(args) => cmd_share(&cfg, args),
    }
}

fn vote_service(
    cfg: &Config,
    offline: bool,
) -> anyhow::Result<VoteService<DocumentDirStore, FileStorage>> {
    let remote = DocumentDirStore::open(cfg.remote_dir())?;
    remote.set_online(!offline);
    let storage = FileStorage::open(cfg.local_dir())?;
    Ok(VoteService::new(remote, storage, cfg.vote_policy))
}

fn cmd_fighters(cfg: &Config, args: FightersArgs) -> anyhow::Result<()> {
    let svc = vote_service(cfg, false)?;
    svc.start()?;
    let counts = svc.displayed_counts();

    if args.json {
        let rows: Vec<_> = tricolor::fighters()
            .iter()
            .map(|f| {
                serde_json::json!({
                    "id": f.id,
                    "name": f.name,
                    "description": f.description,
                    "votes": counts.get(f.id).copied().unwrap_or(0),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    for f in tricolor::fighters() {
        let votes = counts.get(f.id).copied().unwrap_or(0);
        println!("{:<22} {:>6}  {} ({})", f.id, votes, f.name, f.description);
    }
    Ok(())
}

fn cmd_vote(cfg: &Config, args: VoteArgs) -> anyhow::Result<()> {
    let svc = vote_service(cfg, args.offline)?;
    svc.start()?;

    let outcome = match svc.cast(&args.fighter) {
        Ok(o) => o,
        Err(e @ TricolorError::Validation(_)) => return Err(e.into()),
        Err(e) => {
            let fb = Feedback::failure();
            eprintln!("{}: {}", fb.title, fb.description);
            return Err(e.into());
        }
    };
    if let Some(fb) = outcome.feedback() {
        println!("{}: {}", fb.title, fb.description);
    }
    if let CastOutcome::Committed(tier) = outcome {
        println!(
            "{} now has {} votes ({})",
            args.fighter,
            svc.displayed_count(&args.fighter),
            serde_json::to_value(tier)?.as_str().unwrap_or("unknown")
        );
    }
    Ok(())
}

fn cmd_tally(cfg: &Config) -> anyhow::Result<()> {
    let svc = vote_service(cfg, false)?;
    let report = svc.start()?;
    if !report.merged.is_empty() {
        println!("merged {} local votes", report.merged_votes());
    }
    for (id, reason) in &report.failed {
        eprintln!("kept local votes for {id}: {reason}");
    }

    let counts = svc.remote().snapshot()?;
    let mut rows: Vec<_> = counts.into_iter().collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    for (id, n) in rows {
        println!("{id:<22} {n:>6}");
    }
    Ok(())
}

fn cmd_templates() -> anyhow::Result<()> {
    for t in tricolor::templates() {
        println!("{:<12} {}", t.id, t.name);
    }
    Ok(())
}

fn render_scene(cfg: &Config, scene_path: &Path) -> anyhow::Result<RasterSurface> {
    let text = std::fs::read_to_string(scene_path)
        .with_context(|| format!("read scene '{}'", scene_path.display()))?;
    let scene = Scene::from_json_str(&text)?;

    let assets = FsAssetSource::new(&cfg.assets_root).with_max_bytes(cfg.max_upload_bytes);
    let mut comp = Compositor::new(assets, cfg.canvas, cfg.celebration_year);
    let font_dirs = tricolor::system_font_dirs();
    match tricolor::discover_font(cfg.font_path.as_deref(), &font_dirs) {
        Some(path) => comp.load_font_file(&path)?,
        None => tracing::warn!("no usable font found; card text will be skipped"),
    }
    if let Some(family) = scene.font_family.as_deref() {
        match tricolor::discover_family(family, &font_dirs) {
            Some(path) => {
                if let Err(e) = comp.add_font_file(&path) {
                    tracing::warn!(family, error = %e, "font family not usable; using default");
                }
            }
            None => tracing::warn!(family, "font family not installed; using default"),
        }
    }

    let report = comp.render(&scene)?;
    if !report.rendered {
        anyhow::bail!("scene has no background; choose a template or an image first");
    }
    for (kind, reason) in report.skipped() {
        eprintln!("skipped {kind:?} layer: {reason}");
    }
    Ok(comp.surface().clone())
}

fn cmd_render(cfg: &Config, args: RenderArgs) -> anyhow::Result<()> {
    let surface = render_scene(cfg, &args.scene)?;
    let format = match args.out.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg") => {
            ExportFormat::Jpeg
        }
        _ => ExportFormat::Png,
    };
    let bytes = tricolor::encode_surface(&surface, format)?;

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, bytes)
        .with_context(|| format!("write card '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_share(cfg: &Config, args: ShareArgs) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&args.scene)
        .with_context(|| format!("read scene '{}'", args.scene.display()))?;
    let name = Scene::from_json_str(&text)?.display_name().to_string();
    let surface = render_scene(cfg, &args.scene)?;

    let mut svc = ExportService::new(DesktopPlatform::new(&args.out_dir), cfg.celebration_year);
    if let Some(caption) = &cfg.share_caption {
        svc = svc.with_caption(caption);
    }
    let outcome = svc.share(&surface, &name)?;
    println!("{}", outcome.message());
    for link in svc.platform().opened_links() {
        println!("{link}");
    }
    Ok(())
}
