//! arena — text-mode run of the tandem paired-carry simulation.
//!
//! Two teams of robots search a grid for gold.  A unit only moves when two
//! teammates agree to lift it together and walk it home in lockstep, using
//! nothing but delayed messages to coordinate.
//!
//! ```text
//! cargo run -p arena                     # default 20×20 arena
//! cargo run -p arena -- arena.json       # any ArenaConfig fields as JSON
//! RUST_LOG=tandem_sim=debug cargo run -p arena
//! ```

mod render;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tandem_core::{ArenaConfig, Team, Tick};
use tandem_output::{CsvWriter, OutputWriter, SimOutputObserver};
use tandem_robot::Robot;
use tandem_sim::{SimBuilder, SimObserver, TickReport};
use tandem_world::World;

// ── Constants ─────────────────────────────────────────────────────────────────

const OUTPUT_DIR:   &str = "output/arena";
/// Print the grid every this many ticks.
const RENDER_EVERY: u64  = 50;

// ── Observer wrapper ──────────────────────────────────────────────────────────

/// Forwards to the CSV observer, draws the arena now and then and keeps a
/// few totals for the closing summary.
struct ArenaObserver<W: OutputWriter> {
    inner:         SimOutputObserver<W>,
    snapshot_rows: usize,
    summary_rows:  usize,
    faults:        usize,
    /// Ticks whose end-of-tick checks found a violation.
    broken_ticks:  usize,
    pickups:       usize,
    delivered:     usize,
}

impl<W: OutputWriter> ArenaObserver<W> {
    fn new(inner: SimOutputObserver<W>) -> Self {
        Self { inner, snapshot_rows: 0, summary_rows: 0, faults: 0, broken_ticks: 0, pickups: 0, delivered: 0 }
    }
}

impl<W: OutputWriter> SimObserver for ArenaObserver<W> {
    fn on_tick_end(&mut self, report: &TickReport, world: &World) {
        self.summary_rows += 1;
        self.faults += report.faults.len();
        if report.has_invariant_violation() {
            self.broken_ticks += 1;
        }
        self.pickups += report.pickups;
        self.delivered += report.delivered;
        if report.delivered > 0 {
            println!(
                "{}: delivered  |  red {:.1}  blue {:.1}",
                report.tick,
                world.score(Team::Red),
                world.score(Team::Blue)
            );
        }
        self.inner.on_tick_end(report, world);
    }

    fn on_snapshot(&mut self, tick: Tick, world: &World, robots: &[Robot]) {
        self.snapshot_rows += robots.len();
        if tick.0.is_multiple_of(RENDER_EVERY) {
            println!("── {tick} ──");
            print!("{}", render::render(world, robots));
            println!();
        }
        self.inner.on_snapshot(tick, world, robots);
    }

    fn on_sim_end(&mut self, final_tick: Tick, world: &World) {
        self.inner.on_sim_end(final_tick, world);
    }
}

// ── Configuration ─────────────────────────────────────────────────────────────

fn load_config(path: Option<&Path>) -> Result<ArenaConfig> {
    let Some(path) = path else {
        return Ok(ArenaConfig::default());
    };
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let config = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(config)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(true)
        .init();

    let arg = std::env::args().nth(1);
    let config = load_config(arg.as_deref().map(Path::new))?;

    println!("=== arena — tandem paired-carry simulation ===");
    println!(
        "Grid: {}×{}  |  Robots: {} per team  |  Gold: {}  |  Ticks: {}  |  Seed: {}",
        config.grid.width,
        config.grid.height,
        config.robots_per_team,
        config.gold_units,
        config.total_ticks,
        config.seed
    );
    if config.sync_delay_ticks < config.reliable_sync_delay() {
        println!(
            "note: sync_delay_ticks {} is below {}; joint actions will keep timing out",
            config.sync_delay_ticks,
            config.reliable_sync_delay()
        );
    }
    println!();

    // 1. Build the arena.
    let mut sim = SimBuilder::new(config).build()?;
    info!(robots = sim.robots().len(), gold = sim.initial_gold(), "arena ready");
    println!(
        "Bases: red {}  blue {}",
        sim.world().deposit_of(Team::Red),
        sim.world().deposit_of(Team::Blue)
    );

    // 2. Set up output.
    let writer = CsvWriter::new(Path::new(OUTPUT_DIR))?;
    let mut obs = ArenaObserver::new(SimOutputObserver::new(writer));

    // 3. Run.
    let t0 = Instant::now();
    sim.run_to_end(&mut obs)?;
    let elapsed = t0.elapsed();

    if let Some(e) = obs.inner.take_error() {
        eprintln!("output error: {e}");
    }

    // 4. Summary.
    print!("{}", render::render(sim.world(), sim.robots()));
    println!();
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("  pickups            : {}", obs.pickups);
    println!("  units delivered    : {}", obs.delivered);
    println!("  units in transit   : {}", sim.gold_in_transit());
    println!("  protocol faults    : {}", obs.faults);
    println!("  ticks with breaches: {}", obs.broken_ticks);
    println!("  robot_snapshots.csv: {} rows", obs.snapshot_rows);
    println!("  tick_summaries.csv : {} rows", obs.summary_rows);
    println!();

    // 5. Final robot table.
    println!("{:<8} {:<6} {:<10} {:<7} {:<9} {:<8}", "Robot", "Team", "Position", "Facing", "Carrying", "Partner");
    println!("{}", "-".repeat(52));
    for r in sim.robots() {
        println!(
            "{:<8} {:<6} {:<10} {:<7} {:<9} {:<8}",
            r.id().0,
            r.team().label(),
            r.pos().to_string(),
            r.facing().letter(),
            if r.carrying() { "yes" } else { "no" },
            r.partner().map_or_else(|| "-".to_string(), |p| p.0.to_string()),
        );
    }

    Ok(())
}
