use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "mobweave", version)]
struct Cli {
    /// Log debug output from every build stage.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a composition container from timeline metadata.
    Build(BuildArgs),
    /// Build in memory and print the resulting structure without writing anything.
    Plan(PlanArgs),
}

#[derive(Args, Debug)]
struct BuildFlags {
    /// Input metadata JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Directory relative media paths resolve against (defaults to the working directory).
    #[arg(long)]
    media_root: Option<PathBuf>,

    /// Build options JSON; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Right-pad every track with filler up to the declared timeline length.
    #[arg(long)]
    pad_to_timeline: bool,

    /// Fail on tracks of unknown type instead of skipping them.
    #[arg(long)]
    abort_on_unknown_track: bool,

    /// Mark essence as embedded instead of linking external files.
    #[arg(long)]
    embedded: bool,

    /// Compile tracks in parallel.
    #[arg(long)]
    parallel: bool,
}

#[derive(Args, Debug)]
struct BuildArgs {
    #[command(flatten)]
    flags: BuildFlags,

    /// Output container path.
    #[arg(long)]
    out: PathBuf,

    /// Edit an existing container in place, replacing its composition.
    #[arg(long)]
    update: bool,
}

#[derive(Args, Debug)]
struct PlanArgs {
    #[command(flatten)]
    flags: BuildFlags,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Build(args) => cmd_build(args),
        Command::Plan(args) => cmd_plan(args),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "mobweave=debug" } else { "mobweave=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_options(flags: &BuildFlags) -> anyhow::Result<mobweave::BuildOptions> {
    let mut opts = match &flags.config {
        Some(path) => mobweave::BuildOptions::from_path(path)?,
        None => mobweave::BuildOptions::default(),
    };
    opts.pad_to_timeline |= flags.pad_to_timeline;
    opts.parallel_tracks |= flags.parallel;
    if flags.abort_on_unknown_track {
        opts.unknown_track_policy = mobweave::UnknownTrackPolicy::Abort;
    }
    if flags.embedded {
        opts.linkage = mobweave::LinkageMode::Embedded;
    }
    Ok(opts)
}

fn checker(media_root: Option<&Path>) -> mobweave::FsExistenceChecker {
    match media_root {
        Some(root) => mobweave::FsExistenceChecker::with_root(root),
        None => mobweave::FsExistenceChecker::new(),
    }
}

fn print_report(report: &mobweave::BuildReport) {
    print!("{}", report.graph);
    for skipped in &report.skipped_tracks {
        println!(
            "skipped track {} ('{}'): {}",
            skipped.track_id, skipped.name, skipped.reason
        );
    }
}

fn cmd_build(args: BuildArgs) -> anyhow::Result<()> {
    let doc = mobweave::MetadataDocument::from_path(&args.flags.in_path)?;
    let opts = load_options(&args.flags)?;
    let checker = checker(args.flags.media_root.as_deref());

    let mut container = if args.update {
        mobweave::JsonContainer::open_or_create(&args.out)?
    } else {
        mobweave::JsonContainer::create(&args.out)
    };

    let report = mobweave::build_and_commit(&doc, &mut container, &checker, &opts)
        .with_context(|| format!("build '{}'", args.flags.in_path.display()))?;

    print_report(&report);
    if let Some(bytes) = report.bytes {
        println!("wrote {} ({bytes} bytes)", args.out.display());
    }
    Ok(())
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let doc = mobweave::MetadataDocument::from_path(&args.flags.in_path)?;
    let opts = load_options(&args.flags)?;
    let checker = checker(args.flags.media_root.as_deref());

    let mut store = mobweave::MemoryStore::new();
    let report = mobweave::build_graph(&doc, &mut store, &checker, &opts)
        .with_context(|| format!("plan '{}'", args.flags.in_path.display()))?;

    print_report(&report);
    println!(
        "{} mobs, {} store calls, nothing written",
        store.mobs().len(),
        store.call_count()
    );
    Ok(())
}
