//! The `Sim` struct and its tick loop.

use tandem_comms::{Outgoing, PostOffice};
use tandem_core::{AgentId, ArenaConfig, SimClock, Team, Tick};
use tandem_robot::{AgentRngs, Effects, Robot, RobotView, TickContext};
use tandem_world::World;
use tracing::{debug, info};

use crate::{SimObserver, SimResult, TickReport};

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The simulation runner.
///
/// `Sim` owns every piece of state and drives the five-phase tick:
///
/// 1. **Deliver**: count pending messages down; promote, annihilate, purge.
/// 2. **Sense**: every robot refreshes its tile memory.
/// 3. **Plan**: every robot advances a protocol and commits a decision.
/// 4. **Read**: every robot consumes the messages relevant to its state.
/// 5. **Execute**: decisions are applied to the world one robot at a time.
///
/// Every phase visits robots in creation (id) order.  Messages produced in
/// a phase are posted at the end of that phase, in the same order.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim {
    pub config: ArenaConfig,
    pub clock:  SimClock,

    pub(crate) world:        World,
    pub(crate) robots:       Vec<Robot>,
    pub(crate) rngs:         AgentRngs,
    pub(crate) post:         PostOffice,
    /// Gold on the tiles when the arena was built.
    pub(crate) initial_gold: u64,
}

impl Sim {
    // ── Read-only accessors ───────────────────────────────────────────────

    #[inline]
    pub fn now(&self) -> Tick {
        self.clock.current_tick
    }

    #[inline]
    pub fn world(&self) -> &World {
        &self.world
    }

    #[inline]
    pub fn robots(&self) -> &[Robot] {
        &self.robots
    }

    #[inline]
    pub fn robot(&self, id: AgentId) -> Option<&Robot> {
        self.robots.get(id.index())
    }

    #[inline]
    pub fn post(&self) -> &PostOffice {
        &self.post
    }

    pub fn initial_gold(&self) -> u64 {
        self.initial_gold
    }

    /// Units currently held by carrying pairs.
    pub fn gold_in_transit(&self) -> u64 {
        self.robots.iter().filter(|r| r.carrying()).count() as u64 / 2
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Run `n` ticks from the current position, calling observer hooks at
    /// every tick boundary.
    pub fn run<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.observed_step(observer)?;
        }
        observer.on_sim_end(self.now(), &self.world);
        Ok(())
    }

    /// Run until `config.total_ticks` have elapsed.
    pub fn run_to_end<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let remaining = self.config.total_ticks.saturating_sub(self.now().0);
        self.run(remaining, observer)
    }

    fn observed_step<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let now = self.now();
        observer.on_tick_start(now);
        let report = self.step()?;
        observer.on_tick_end(&report, &self.world);
        let interval = self.config.output_interval_ticks;
        if interval > 0 && now.0.is_multiple_of(interval) {
            observer.on_snapshot(now, &self.world, &self.robots);
        }
        Ok(())
    }

    /// Advance exactly one full five-phase tick.
    pub fn step(&mut self) -> SimResult<TickReport> {
        let now = self.now();
        let mut report = TickReport::new(now);
        let stats_before = self.post.stats();

        // ── Phase 1: deliver ──────────────────────────────────────────────
        report.delivery = self.post.deliver(now);

        // ── Phase 2: sense ────────────────────────────────────────────────
        let views = self.views();
        {
            let ctx = TickContext::new(now, &self.config, &self.world, &views);
            for robot in &mut self.robots {
                robot.sense(&ctx);
            }
        }

        // ── Phase 3: plan ─────────────────────────────────────────────────
        let mut effects = Vec::with_capacity(self.robots.len());
        {
            let ctx = TickContext::new(now, &self.config, &self.world, &views);
            for robot in &mut self.robots {
                let id = robot.id();
                let Some(inbox) = self.post.inbox(id) else { continue };
                let fx = robot.plan(&ctx, inbox, self.rngs.get_mut(id));
                effects.push((id, fx));
            }
        }
        self.settle(now, effects, &mut report);

        // ── Phase 4: read ─────────────────────────────────────────────────
        let mut effects = Vec::with_capacity(self.robots.len());
        {
            let ctx = TickContext::new(now, &self.config, &self.world, &views);
            for robot in &mut self.robots {
                let id = robot.id();
                let Some(inbox) = self.post.inbox_mut(id) else { continue };
                effects.push((id, robot.read(&ctx, inbox)));
            }
        }
        self.settle(now, effects, &mut report);

        // ── Phase 5: execute ──────────────────────────────────────────────
        for i in 0..self.robots.len() {
            let effects = self.execute(i, &mut report)?;
            self.settle(now, effects, &mut report);
        }

        let effects = self.check_invariants(&mut report);
        self.settle(now, effects, &mut report);

        let stats_after = self.post.stats();
        report.sent = (stats_after.sent - stats_before.sent) as usize;
        report.suppressed = (stats_after.suppressed - stats_before.suppressed) as usize;

        if report.delivered > 0 {
            info!(
                tick = %now,
                red = self.world.score(Team::Red),
                blue = self.world.score(Team::Blue),
                "score"
            );
        }
        debug!(
            tick = %now,
            faults = report.faults.len(),
            sent = report.sent,
            promoted = report.delivery.promoted,
            in_flight = self.post.in_flight(),
            "tick complete"
        );

        self.clock.advance();
        Ok(report)
    }

    // ── Internals ─────────────────────────────────────────────────────────

    /// What each robot looks like from the outside right now.
    pub(crate) fn views(&self) -> Vec<RobotView> {
        self.robots.iter().map(Robot::view).collect()
    }

    /// Post every outgoing message and record every fault, in order.
    pub(crate) fn settle(&mut self, now: Tick, effects: Vec<(AgentId, Effects)>, report: &mut TickReport) {
        for (sender, fx) in effects {
            for out in fx.outgoing {
                self.send(now, sender, out);
            }
            report.faults.extend(fx.faults);
        }
    }

    fn send(&mut self, now: Tick, sender: AgentId, out: Outgoing) {
        if sender.index() >= self.rngs.len() {
            return;
        }
        let rng = self.rngs.get_mut(sender);
        self.post.dispatch(now, sender, out, rng);
    }
}
