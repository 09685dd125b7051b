// crates/permwalk-cli/src/main.rs

#![forbid(unsafe_code)]
#![deny(
    rust_2018_idioms,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo
)]

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use permwalk_core::{random_walks, verify_walks, Validation, WalkConfig};
use permwalk_defs::{
    format::GraphDef,
    io::{read_def_auto, read_walks_auto, write_def_auto, write_walks_auto},
    presets::{self, Family},
};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "permwalk",
    about = "Random walks over permutation generators",
    long_about = "Random walks over permutation generators.\n\nBuild generator-set definitions, run walk batches on a fixed worker pool, and verify batch files.",
    version = env!("CARGO_PKG_VERSION"),
    disable_help_subcommand = true
)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Write the definition of a preset generator family (CBOR/JSON).
    Preset {
        /// Generator family
        #[arg(value_enum, long)]
        family: FamilyOpt,

        /// Number of points the permutations act on
        #[arg(long, value_parser = clap::value_parser!(u32).range(2..))]
        n: u32,

        /// Output path for the definition (CBOR/JSON)
        #[arg(long, default_value = "gens.json")]
        out: PathBuf,
    },

    /// Run one batch of walks and write it.
    /// If --out ends with `.jsonl`, writes one walk per line.
    Walk {
        #[command(flatten)]
        source: DefSource,

        /// TOML file with batch parameters; flags below override it
        #[arg(long)]
        config: Option<PathBuf>,

        /// Number of walks
        #[arg(long)]
        num_walks: Option<i64>,

        /// States per walk, central state included
        #[arg(long)]
        walks_len: Option<i64>,

        /// Worker threads (0 = run on the calling thread)
        #[arg(long)]
        threads: Option<usize>,

        /// Seed for reproducible choices
        #[arg(long)]
        seed: Option<u64>,

        /// Skip the permutation check on generator rows
        #[arg(long)]
        trusted: bool,

        /// Walk over inverse generators instead
        #[arg(long)]
        inverse: bool,

        /// Output path for the batch (CBOR/JSON/JSONL)
        #[arg(long, default_value = "walks.cbor")]
        out: PathBuf,
    },

    /// Check that a batch file is consistent with a definition
    Inspect {
        /// Input batch (CBOR/JSON)
        #[arg(long)]
        walks: PathBuf,

        /// Definition the batch was produced from (CBOR/JSON)
        #[arg(long)]
        def: PathBuf,
    },
}

#[derive(Args, Debug)]
struct DefSource {
    /// Definition file (CBOR/JSON)
    #[arg(long, conflicts_with_all = ["family", "n"], required_unless_present = "family")]
    def: Option<PathBuf>,

    /// Preset family (use with --n)
    #[arg(value_enum, long, requires = "n")]
    family: Option<FamilyOpt>,

    /// Points for --family
    #[arg(long, requires = "family", value_parser = clap::value_parser!(u32).range(2..))]
    n: Option<u32>,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum FamilyOpt {
    Lrx,
    Transpositions,
    Coxeter,
    CyclicCoxeter,
    ThreeCycles,
}

impl From<FamilyOpt> for Family {
    fn from(f: FamilyOpt) -> Self {
        match f {
            FamilyOpt::Lrx => Self::Lrx,
            FamilyOpt::Transpositions => Self::Transpositions,
            FamilyOpt::Coxeter => Self::Coxeter,
            FamilyOpt::CyclicCoxeter => Self::CyclicCoxeter,
            FamilyOpt::ThreeCycles => Self::ThreeCycles,
        }
    }
}

/// Flag values that override the loaded config.
struct Overrides {
    num_walks: Option<i64>,
    walks_len: Option<i64>,
    threads: Option<usize>,
    seed: Option<u64>,
    trusted: bool,
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Preset { family, n, out } => preset(family.into(), n, &out),

        Cmd::Walk {
            source,
            config,
            num_walks,
            walks_len,
            threads,
            seed,
            trusted,
            inverse,
            out,
        } => walk(
            &source,
            config.as_deref(),
            Overrides { num_walks, walks_len, threads, seed, trusted },
            inverse,
            &out,
        ),

        Cmd::Inspect { walks, def } => inspect(&walks, &def),
    }
}

/// Initialize tracing with an env-driven filter (default INFO).
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = fmt::layer().with_target(false).with_level(true).compact();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

/// Ensure the parent directory for a file exists.
fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating parent directory {}", dir.display()))?;
        }
    }
    Ok(())
}

fn preset(family: Family, n: u32, out: &Path) -> Result<()> {
    info!(family = family.as_str(), n, "building preset");
    let def = presets::build(family, n as usize)?;
    ensure_parent_dir(out)?;
    write_def_auto(out, &def).with_context(|| format!("writing definition to {}", out.display()))?;
    println!(
        "Preset {}: {} generators on {} points → {}",
        def.name,
        def.num_gens(),
        def.state_size(),
        out.display()
    );
    Ok(())
}

fn load_def(source: &DefSource) -> Result<GraphDef> {
    match (&source.def, source.family, source.n) {
        (Some(path), _, _) => {
            read_def_auto(path).with_context(|| format!("reading definition {}", path.display()))
        }
        (None, Some(family), Some(n)) => presets::build(family.into(), n as usize),
        _ => bail!("pass either --def or --family with --n"),
    }
}

fn load_config(path: Option<&Path>, o: Overrides) -> Result<WalkConfig> {
    let mut cfg = match path {
        Some(p) => {
            let text = std::fs::read_to_string(p)
                .with_context(|| format!("reading config {}", p.display()))?;
            toml::from_str(&text).with_context(|| format!("parsing config {}", p.display()))?
        }
        None => WalkConfig::default(),
    };
    if let Some(v) = o.num_walks {
        cfg.num_walks = v;
    }
    if let Some(v) = o.walks_len {
        cfg.walks_len = v;
    }
    if let Some(v) = o.threads {
        cfg.threads = v;
    }
    if o.seed.is_some() {
        cfg.seed = o.seed;
    }
    if o.trusted {
        cfg.validation = Validation::Trusted;
    }
    Ok(cfg)
}

fn walk(
    source: &DefSource,
    config: Option<&Path>,
    overrides: Overrides,
    inverse: bool,
    out: &Path,
) -> Result<()> {
    let mut def = load_def(source)?;
    if inverse {
        def = def.inverted()?;
    }
    let cfg = load_config(config, overrides)?;
    if cfg.validation == Validation::Trusted {
        warn!("generator rows are not checked; a malformed row aborts the batch");
    }
    let gens = def
        .table(cfg.validation)
        .with_context(|| format!("building generator table for `{}`", def.name))?;

    info!(
        def = %def.name,
        num_walks = cfg.num_walks,
        walks_len = cfg.walks_len,
        threads = cfg.threads,
        seed = ?cfg.seed,
        "running batch"
    );
    let t0 = Instant::now();
    let walks = random_walks(&gens, &def.central_state, &cfg).context("running walk batch")?;
    let elapsed = t0.elapsed();

    ensure_parent_dir(out)?;
    write_walks_auto(out, &walks).with_context(|| format!("writing batch to {}", out.display()))?;

    let [n, l, s] = walks.shape();
    println!(
        "Walked {}: {n} walks × {l} states × {s} components in {:.3} ms → {}",
        def.name,
        elapsed.as_secs_f64() * 1e3,
        out.display()
    );
    Ok(())
}

fn inspect(walks_path: &Path, def_path: &Path) -> Result<()> {
    info!(walks = %walks_path.display(), def = %def_path.display(), "inspecting batch");
    let def = read_def_auto(def_path)
        .with_context(|| format!("reading definition {}", def_path.display()))?;
    let walks = read_walks_auto(walks_path)
        .with_context(|| format!("reading batch {}", walks_path.display()))?;
    let gens = def.table(Validation::Permutation)?;

    verify_walks(&walks, &gens, &def.central_state).with_context(|| {
        format!("{} is not a batch of {}", walks_path.display(), def.name)
    })?;

    let [n, l, s] = walks.shape();
    println!("✔ {n} walks × {l} states × {s} components consistent with {}", def.name);
    Ok(())
}
