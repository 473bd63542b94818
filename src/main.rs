mod error;
mod maps;
mod utils;

use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::debug;

use error::MapsError;
use maps::{diff_snapshots, parse_snapshot, MapDiff, Region, TailPolicy, MAX_REGIONS};
use utils::{get_pid_by_name, read_maps, read_maps_frozen};

#[derive(Parser, Debug)]
#[command(name = "mapdrift")]
#[command(about = "Linux process memory-map drift inspector")]
#[command(version)]
struct Args {
    /// Target process id; omit to inspect this process itself
    #[arg(short = 'p', long)]
    pid: Option<u32>,

    /// Resolve the target by scanning /proc for a matching command line
    #[arg(short = 'n', long, conflicts_with = "pid")]
    name: Option<String>,

    /// Print one snapshot of the target's regions and exit
    #[arg(long)]
    show: bool,

    /// Milliseconds to wait between the two snapshots
    #[arg(long, default_value_t = 500)]
    delay: u64,

    /// Stop the target around each capture so the layout cannot move mid-read
    #[arg(long)]
    freeze: bool,

    /// Leak N 4 KiB allocations between snapshots to provoke heap drift
    /// (self-inspection only)
    #[arg(long)]
    churn: Option<usize>,

    /// Report regions past the end of the shorter snapshot as new
    #[arg(long)]
    tail: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let pid = match (args.pid, &args.name) {
        (Some(pid), _) => Some(pid),
        (None, Some(name)) => Some(get_pid_by_name(name)?),
        (None, None) => None,
    };

    if args.freeze && pid.is_none() {
        bail!("--freeze needs an external target (--pid or --name)");
    }
    if args.churn.is_some() && pid.is_some() {
        bail!("--churn only applies when inspecting this process itself");
    }

    match pid {
        Some(pid) => println!("[+] Target PID: {}", pid),
        None => println!("[+] Target: self"),
    }

    if args.show {
        show_snapshot(pid, args.freeze)
    } else {
        diff_run(pid, &args)
    }
}

fn capture(pid: Option<u32>, freeze: bool) -> Result<String, MapsError> {
    match pid {
        Some(pid) if freeze => read_maps_frozen(pid),
        _ => read_maps(pid),
    }
}

fn show_snapshot(pid: Option<u32>, freeze: bool) -> Result<()> {
    let text = capture(pid, freeze).context("failed to capture snapshot")?;
    let mut regions: Vec<Region> = Vec::with_capacity(MAX_REGIONS);
    let count = parse_snapshot(&text, &mut regions).context("failed to parse snapshot")?;

    println!("[+] {} regions mapped", count);
    for region in &regions {
        println!("{}", region);
    }
    Ok(())
}

fn diff_run(pid: Option<u32>, args: &Args) -> Result<()> {
    // both raw texts are acquired before any parsing so that parse-time
    // work cannot land in the window between the two captures
    let text_a = capture(pid, args.freeze).context("failed to capture first snapshot")?;

    let _held = args.churn.map(churn_heap);
    if args.delay > 0 {
        debug!("waiting {}ms between snapshots", args.delay);
        std::thread::sleep(Duration::from_millis(args.delay));
    }

    let text_b = capture(pid, args.freeze).context("failed to capture second snapshot")?;

    let mut a: Vec<Region> = Vec::with_capacity(MAX_REGIONS);
    let mut b: Vec<Region> = Vec::with_capacity(MAX_REGIONS);
    parse_snapshot(&text_a, &mut a).context("failed to parse first snapshot")?;
    parse_snapshot(&text_b, &mut b).context("failed to parse second snapshot")?;
    debug!("snapshot sizes: {} -> {} regions", a.len(), b.len());

    let tail = if args.tail {
        TailPolicy::ReportNew
    } else {
        TailPolicy::Ignore
    };
    let mut diffs: Vec<MapDiff> = Vec::with_capacity(a.len() + b.len());
    diff_snapshots(&a, &b, tail, &mut diffs);

    println!("[+] {} diffs found", diffs.len());
    for diff in &diffs {
        println!("{}", diff);
    }
    Ok(())
}

/// Leaks heap pressure between the two captures, mirroring what a busy
/// allocator does to the map. The chunks stay alive until the second
/// snapshot has been read.
fn churn_heap(chunks: usize) -> Vec<Box<[u8; 4096]>> {
    let mut held = Vec::with_capacity(chunks);
    for _ in 0..chunks {
        held.push(Box::new([0u8; 4096]));
    }
    debug!("churned {} heap chunks", chunks);
    held
}
