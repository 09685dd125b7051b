//! permwalk-bench-harness
//!
//! Run one walk batch per thread count from a TOML profile, check that every
//! thread count produced the same bytes, and append CSV rows into
//! `benchmarks/reports/bench-<unix>.csv`.
//!
//! Usage examples:
//!   cargo run --release -p permwalk-bench-harness -- --profile configs/profiles/small.toml
//!   cargo run --release -p permwalk-bench-harness -- --profile configs/profiles/large.toml

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{ensure, Context, Result};
use serde::Deserialize;

use permwalk_core::{verify_walks_with_choices, ChoiceTable, Validation, WalkExecutor, Walks};
use permwalk_defs::presets::{build, Family};

#[derive(Debug, Deserialize)]
struct Profile {
    /// Preset family name (`lrx`, `coxeter`, ...)
    family: String,
    /// Points the generators act on
    n: usize,
    /// Walks per batch
    num_walks: usize,
    /// States per walk
    walks_len: usize,
    /// Thread counts to sweep
    threads: Vec<usize>,
    /// Repetitions per thread count
    repeats: u32,
    /// Seed for the shared choice table
    #[serde(default)]
    seed: u64,
}

fn parse_flag(name: &str, default: &str) -> String {
    let mut it = std::env::args().skip(1);
    while let Some(k) = it.next() {
        if k == format!("--{name}") {
            return it.next().unwrap_or_else(|| default.to_string());
        }
    }
    default.to_string()
}

fn dur_us(d: Duration) -> u128 {
    d.as_micros()
}

fn main() -> Result<()> {
    let profile_path = PathBuf::from(parse_flag("profile", "configs/profiles/small.toml"));
    let profile_src = fs::read_to_string(&profile_path)
        .with_context(|| format!("read profile {}", profile_path.display()))?;
    let profile: Profile = toml::from_str(&profile_src).context("parse profile toml")?;
    let family: Family = profile.family.parse()?;
    println!(
        "Profile: family={}, n={}, num_walks={}, walks_len={}, threads={:?}, repeats={}",
        family.as_str(),
        profile.n,
        profile.num_walks,
        profile.walks_len,
        profile.threads,
        profile.repeats
    );

    let def = build(family, profile.n)?;
    let gens = def.table(Validation::Permutation)?;
    // One table for every run so outputs are comparable across thread counts.
    let choices =
        ChoiceTable::from_seed(profile.num_walks, profile.walks_len, gens.num_gens(), profile.seed)?;

    fs::create_dir_all("benchmarks/reports").context("create benchmarks/reports")?;
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("system clock before UNIX epoch")?
        .as_secs();
    let csv_path = PathBuf::from(format!("benchmarks/reports/bench-{ts}.csv"));
    let mut csv = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&csv_path)
        .with_context(|| format!("open {}", csv_path.display()))?;
    writeln!(csv, "timestamp,family,n,num_walks,walks_len,threads,repeat,stage,us,extra")?;

    let mut reference: Option<Walks> = None;
    for &threads in &profile.threads {
        let exec = WalkExecutor::new(threads);
        for rep in 0..profile.repeats {
            let t0 = Instant::now();
            let walks = exec.execute(&gens, &def.central_state, &choices)?;
            let t_fill = t0.elapsed();
            let states = walks.states_flat().len();
            writeln!(
                csv,
                "{ts},{},{},{},{},{threads},{rep},fill,{},states={states}",
                family.as_str(),
                profile.n,
                profile.num_walks,
                profile.walks_len,
                dur_us(t_fill)
            )?;

            match &reference {
                Some(r) => ensure!(
                    *r == walks,
                    "threads={threads} produced a different batch than threads={}",
                    profile.threads[0]
                ),
                None => {
                    let t0 = Instant::now();
                    verify_walks_with_choices(&walks, &gens, &def.central_state, &choices)?;
                    writeln!(
                        csv,
                        "{ts},{},{},{},{},{threads},{rep},verify,{},",
                        family.as_str(),
                        profile.n,
                        profile.num_walks,
                        profile.walks_len,
                        dur_us(t0.elapsed())
                    )?;
                    reference = Some(walks);
                }
            }
        }
    }

    println!("Wrote report → {}", csv_path.display());
    Ok(())
}
