//! Navigation state machine.
//!
//! Drives the agent along its planned path, checks the next path cell
//! against the composite occupancy every tick, and replans from the current
//! cell when the route is invalidated.
//!
//! Planning goes through epoch-stamped [`PlanTicket`]s. In
//! [`PlanningMode::Inline`] a ticket is planned and applied on the spot; in
//! [`PlanningMode::Deferred`] it waits for the caller to take it, plan
//! against an owned snapshot and hand the result back. `start`, `stop` and
//! `reset` bump the epoch, so results that arrive after them are dropped.

use tracing::{debug, info, warn};

use crate::config::AgentConfig;
use crate::core::{Cell, WorldPoint};
use crate::error::NavFault;
use crate::events::{EventKind, EventSink};
use crate::grid::CompositeOccupancy;
use crate::planning::{AStarPlanner, Path};

use super::state::{
    AgentState, CommandOutcome, ControllerStats, Phase, PlanPurpose, PlanTicket, PlanningMode,
};

/// What the controller sees and writes during one call.
pub struct NavContext<'a> {
    /// Walls ∪ dynamic obstacles ∪ detected cells, as of this tick
    pub view: CompositeOccupancy<'a>,
    pub events: &'a mut EventSink,
    /// Simulation time (seconds) stamped on emitted events
    pub time: f64,
}

/// Agent navigation controller.
#[derive(Clone, Debug)]
pub struct NavigationController {
    config: AgentConfig,
    cell_size: f32,
    start: Cell,
    goal: Cell,
    planner: AStarPlanner,
    mode: PlanningMode,
    state: AgentState,
    epoch: u64,
    /// Ticket awaiting a result
    pending: Option<PlanTicket>,
    /// Whether the pending ticket was handed out by `take_plan_request`
    dispatched: bool,
    last_ticket: Option<PlanTicket>,
    /// Remaining settle time at the goal before the return leg is planned
    settle_remaining: Option<f32>,
    last_fault: Option<NavFault>,
    stats: ControllerStats,
}

impl NavigationController {
    /// Idle controller with the agent on the start cell.
    pub fn new(config: AgentConfig, cell_size: f32, start: Cell, goal: Cell) -> Self {
        Self {
            config,
            cell_size,
            start,
            goal,
            planner: AStarPlanner::default(),
            mode: PlanningMode::Inline,
            state: AgentState::at(start, cell_size),
            epoch: 0,
            pending: None,
            dispatched: false,
            last_ticket: None,
            settle_remaining: None,
            last_fault: None,
            stats: ControllerStats::default(),
        }
    }

    /// Builder: set the planning mode
    pub fn with_mode(mut self, mode: PlanningMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn set_mode(&mut self, mode: PlanningMode) {
        self.mode = mode;
    }

    pub fn mode(&self) -> PlanningMode {
        self.mode
    }

    pub fn state(&self) -> &AgentState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn is_paused(&self) -> bool {
        self.state.paused
    }

    pub fn start_cell(&self) -> Cell {
        self.start
    }

    pub fn goal_cell(&self) -> Cell {
        self.goal
    }

    /// Planner used for inline plans; deferred callers may clone it.
    pub fn planner(&self) -> &AStarPlanner {
        &self.planner
    }

    pub fn stats(&self) -> ControllerStats {
        self.stats
    }

    /// Most recent fault, cleared by `start` and `reset`
    pub fn last_fault(&self) -> Option<NavFault> {
        self.last_fault
    }

    /// Most recently issued ticket, including trivial ones
    pub fn last_ticket(&self) -> Option<PlanTicket> {
        self.last_ticket
    }

    /// Ticket awaiting a result
    pub fn pending_ticket(&self) -> Option<PlanTicket> {
        self.pending
    }

    /// Where the current leg ends: goal when outbound, start when returning.
    pub fn destination(&self) -> Option<Cell> {
        match self.state.phase {
            Phase::Outbound => Some(self.goal),
            Phase::Returning => Some(self.start),
            _ => None,
        }
    }

    /// Nothing left to do until the next command.
    pub fn is_settled(&self) -> bool {
        self.pending.is_none() && self.settle_remaining.is_none() && !self.state.phase.is_moving()
    }

    /// Begin a round trip.
    ///
    /// Accepted only from Idle or Arrived. While navigating the command is
    /// a no-op; after an abort a reset is required.
    pub fn start(&mut self, ctx: &mut NavContext<'_>) -> CommandOutcome {
        if self.state.phase.is_moving() {
            return self.reject(ctx, "already navigating");
        }
        if self.state.phase == Phase::Aborted {
            return self.reject(ctx, "navigation aborted, reset required");
        }
        if self.pending.is_some() {
            return self.reject(ctx, "plan already requested");
        }

        self.bump_epoch();
        self.state.paused = false;
        self.last_fault = None;
        let from = self.state.cell;
        info!("[Nav] start: {} -> {}", from, self.goal);

        if from == self.goal {
            self.state.path = vec![from];
            self.state.index = 1;
            self.emit(ctx, EventKind::ArrivedGoal, format!("Already at goal {}", self.goal));
            if self.goal == self.start {
                self.state.phase = Phase::Arrived;
                self.emit(ctx, EventKind::ArrivedStart, "Start and goal coincide".to_string());
            } else {
                self.state.phase = Phase::Outbound;
                self.request_plan(from, self.start, PlanPurpose::Return, ctx);
            }
            return CommandOutcome::Applied;
        }

        self.request_plan(from, self.goal, PlanPurpose::Initial, ctx);
        match self.last_fault {
            Some(fault) if self.pending.is_none() => CommandOutcome::Rejected(fault),
            _ => CommandOutcome::Applied,
        }
    }

    /// Freeze motion and settle timers.
    pub fn pause(&mut self, ctx: &mut NavContext<'_>) -> CommandOutcome {
        if self.state.paused {
            return self.reject(ctx, "already paused");
        }
        self.state.paused = true;
        self.emit(ctx, EventKind::Notice, "Paused".to_string());
        CommandOutcome::Applied
    }

    pub fn resume(&mut self, ctx: &mut NavContext<'_>) -> CommandOutcome {
        if !self.state.paused {
            return self.reject(ctx, "not paused");
        }
        self.state.paused = false;
        self.emit(ctx, EventKind::Notice, "Resumed".to_string());
        CommandOutcome::Applied
    }

    pub fn toggle_pause(&mut self, ctx: &mut NavContext<'_>) -> CommandOutcome {
        if self.state.paused {
            self.resume(ctx)
        } else {
            self.pause(ctx)
        }
    }

    /// Force Idle, dropping the path and any pending plan.
    pub fn stop(&mut self, ctx: &mut NavContext<'_>) -> CommandOutcome {
        let was_active = self.state.phase.is_moving() || self.pending.is_some();
        self.bump_epoch();
        self.state.path.clear();
        self.state.index = 0;
        self.state.paused = false;
        self.state.phase = Phase::Idle;

        if was_active {
            info!("[Nav] stopped at {}", self.state.cell);
            self.emit(ctx, EventKind::Aborted, "Navigation stopped".to_string());
        } else {
            self.emit(ctx, EventKind::Notice, "Stopped".to_string());
        }
        CommandOutcome::Applied
    }

    /// Agent back to the start centre, everything cleared, Idle.
    pub fn reset(&mut self) {
        self.bump_epoch();
        self.state = AgentState::at(self.start, self.cell_size);
        self.last_fault = None;
        debug!("[Nav] reset to {}", self.start);
    }

    /// Advance motion by `dt` seconds of simulation time.
    pub fn advance(&mut self, dt: f32, ctx: &mut NavContext<'_>) {
        if self.state.paused || self.pending.is_some() {
            return;
        }

        if let Some(remaining) = self.settle_remaining.as_mut() {
            *remaining -= dt;
            if *remaining > 0.0 {
                return;
            }
            self.settle_remaining = None;
            self.request_plan(self.state.cell, self.start, PlanPurpose::Return, ctx);
            return;
        }

        if !self.state.phase.is_moving() {
            return;
        }
        let Some(target) = self.state.target() else {
            return;
        };

        if target != self.state.cell && ctx.view.is_occupied(target) {
            self.obstacle_ahead(target, ctx);
            return;
        }

        let centre = WorldPoint::cell_center(target, self.cell_size);
        self.state.position = self
            .state
            .position
            .step_toward(&centre, self.config.speed * dt);
        if self.state.position.distance(&centre) > self.config.arrival_tolerance {
            return;
        }

        self.state.position = centre;
        self.state.cell = target;
        self.state.index += 1;
        match self.state.target() {
            None => self.finish_leg(ctx),
            Some(next) if ctx.view.is_occupied(next) => self.obstacle_ahead(next, ctx),
            Some(_) => {}
        }
    }

    /// Hand out the pending ticket for off-lock planning (deferred mode).
    ///
    /// Each ticket is handed out once.
    pub fn take_plan_request(&mut self) -> Option<PlanTicket> {
        if self.dispatched {
            return None;
        }
        let ticket = self.pending?;
        self.dispatched = true;
        Some(ticket)
    }

    /// Apply a plan computed for `ticket`.
    ///
    /// Returns false (and changes nothing) if the ticket is stale.
    pub fn resolve_plan(&mut self, ticket: PlanTicket, path: Path, ctx: &mut NavContext<'_>) -> bool {
        if self.pending != Some(ticket) || ticket.epoch != self.epoch {
            self.stats.stale_results += 1;
            debug!(
                "[Nav] discarding stale {:?} plan (epoch {} != {})",
                ticket.purpose, ticket.epoch, self.epoch
            );
            return false;
        }
        self.pending = None;
        self.dispatched = false;
        self.apply_plan(ticket, path, ctx);
        true
    }

    fn request_plan(&mut self, from: Cell, to: Cell, purpose: PlanPurpose, ctx: &mut NavContext<'_>) {
        let ticket = PlanTicket {
            epoch: self.epoch,
            from,
            to,
            purpose,
        };
        self.last_ticket = Some(ticket);

        if from == to {
            self.apply_plan(ticket, vec![from], ctx);
            return;
        }

        self.stats.planner_calls += 1;
        match self.mode {
            PlanningMode::Inline => {
                let result = self.planner.find_path(from, to, &ctx.view);
                debug!(
                    "[Nav] {:?} plan {} -> {}: {} cells, {} expanded",
                    purpose,
                    from,
                    to,
                    result.path.len(),
                    result.nodes_expanded
                );
                self.apply_plan(ticket, result.path, ctx);
            }
            PlanningMode::Deferred => {
                debug!("[Nav] deferred {:?} plan {} -> {}", purpose, from, to);
                self.pending = Some(ticket);
                self.dispatched = false;
            }
        }
    }

    fn apply_plan(&mut self, ticket: PlanTicket, path: Path, ctx: &mut NavContext<'_>) {
        let (from, to) = (ticket.from, ticket.to);
        match (ticket.purpose, path.is_empty()) {
            (PlanPurpose::Initial, true) => {
                self.fail(NavFault::NoPathFound { from, to }, Phase::Idle);
                self.emit(ctx, EventKind::NoPath, format!("No path from {} to {}", from, to));
            }
            (PlanPurpose::Initial, false) => {
                let steps = path.len() - 1;
                self.follow(path, Phase::Outbound);
                self.emit(ctx, EventKind::FoundPath, format!("Path found: {} steps", steps));
            }
            (PlanPurpose::Replan, true) => {
                self.fail(NavFault::NoAlternativePath { from, to }, Phase::Aborted);
                self.emit(
                    ctx,
                    EventKind::NoAlternativePath,
                    format!("No alternative path from {} to {}", from, to),
                );
            }
            (PlanPurpose::Replan, false) => {
                let steps = path.len() - 1;
                let phase = self.state.phase;
                self.follow(path, phase);
                self.stats.replans += 1;
                self.emit(ctx, EventKind::Replanned, format!("Rerouted: {} steps to {}", steps, to));
            }
            (PlanPurpose::Return, true) => {
                self.fail(NavFault::NoPathFound { from, to }, Phase::Aborted);
                self.emit(ctx, EventKind::NoPath, format!("No return path from {} to {}", from, to));
            }
            (PlanPurpose::Return, false) => {
                self.follow(path, Phase::Returning);
                self.emit(ctx, EventKind::Notice, "Return path computed".to_string());
            }
        }
    }

    fn obstacle_ahead(&mut self, blocked: Cell, ctx: &mut NavContext<'_>) {
        let Some(dest) = self.destination() else {
            return;
        };
        self.emit(ctx, EventKind::ObstacleDetected, format!("Obstacle at {}", blocked));
        self.request_plan(self.state.cell, dest, PlanPurpose::Replan, ctx);
    }

    fn finish_leg(&mut self, ctx: &mut NavContext<'_>) {
        match self.state.phase {
            Phase::Outbound => {
                self.settle_remaining = Some(self.config.settle_delay_secs);
                self.emit(ctx, EventKind::ArrivedGoal, format!("Reached goal {}", self.goal));
            }
            Phase::Returning => {
                self.state.phase = Phase::Arrived;
                info!("[Nav] round trip complete");
                self.emit(ctx, EventKind::ArrivedStart, format!("Back at start {}", self.start));
            }
            _ => {}
        }
    }

    fn follow(&mut self, path: Path, phase: Phase) {
        if self.state.phase != phase {
            info!("[Nav] {:?} -> {:?}", self.state.phase, phase);
        }
        self.state.path = path;
        self.state.index = 0;
        self.state.phase = phase;
    }

    fn fail(&mut self, fault: NavFault, phase: Phase) {
        warn!("[Nav] {}", fault);
        self.last_fault = Some(fault);
        self.state.path.clear();
        self.state.index = 0;
        self.state.phase = phase;
    }

    fn reject(&mut self, ctx: &mut NavContext<'_>, reason: &'static str) -> CommandOutcome {
        let fault = NavFault::InvalidCommand(reason);
        self.last_fault = Some(fault);
        self.emit(ctx, EventKind::Notice, format!("Ignored: {}", reason));
        CommandOutcome::Rejected(fault)
    }

    fn bump_epoch(&mut self) {
        self.epoch += 1;
        self.pending = None;
        self.dispatched = false;
        self.settle_remaining = None;
    }

    fn emit(&self, ctx: &mut NavContext<'_>, kind: EventKind, message: String) {
        ctx.events.push(ctx.time, kind, Some(message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{OccupancyGrid, OccupancyView};
    use std::collections::BTreeSet;

    const CELL: f32 = 36.0;
    const DT: f32 = 1.0 / 60.0;

    struct World {
        grid: OccupancyGrid,
        dynamic: BTreeSet<Cell>,
        detected: BTreeSet<Cell>,
        events: EventSink,
        time: f64,
    }

    impl World {
        fn new(grid: OccupancyGrid) -> Self {
            Self {
                grid,
                dynamic: BTreeSet::new(),
                detected: BTreeSet::new(),
                events: EventSink::new(256),
                time: 0.0,
            }
        }

        fn ctx(&mut self) -> NavContext<'_> {
            NavContext {
                view: CompositeOccupancy::new(&self.grid, &self.dynamic, &self.detected),
                events: &mut self.events,
                time: self.time,
            }
        }

        fn kinds(&self) -> Vec<EventKind> {
            self.events.iter().map(|e| e.kind).collect()
        }

        fn tick(&mut self, nav: &mut NavigationController) {
            self.time += DT as f64;
            nav.advance(DT, &mut self.ctx());
        }

        fn run(&mut self, nav: &mut NavigationController, max_ticks: usize) {
            for _ in 0..max_ticks {
                self.tick(nav);
                if nav.is_settled() {
                    break;
                }
            }
        }
    }

    fn controller(start: Cell, goal: Cell) -> NavigationController {
        NavigationController::new(AgentConfig::default(), CELL, start, goal)
    }

    #[test]
    fn test_round_trip_on_empty_grid() {
        let mut world = World::new(OccupancyGrid::new(5, 5).unwrap());
        let mut nav = controller(Cell::new(0, 0), Cell::new(4, 4));

        assert!(nav.start(&mut world.ctx()).is_applied());
        assert_eq!(nav.phase(), Phase::Outbound);
        assert_eq!(nav.state().path.len(), 9);

        let mut phases = vec![Phase::Idle, nav.phase()];
        for _ in 0..5000 {
            world.tick(&mut nav);
            if phases.last() != Some(&nav.phase()) {
                phases.push(nav.phase());
            }
            if nav.is_settled() {
                break;
            }
        }

        assert_eq!(
            phases,
            vec![Phase::Idle, Phase::Outbound, Phase::Returning, Phase::Arrived]
        );
        assert_eq!(nav.state().cell, Cell::new(0, 0));
        assert_eq!(nav.stats().replans, 0);
        assert_eq!(nav.stats().planner_calls, 2);
        assert_eq!(world.events.count(EventKind::ArrivedGoal), 1);
        assert_eq!(world.events.count(EventKind::ArrivedStart), 1);
    }

    #[test]
    fn test_start_twice_plans_once() {
        let mut world = World::new(OccupancyGrid::new(5, 5).unwrap());
        let mut nav = controller(Cell::new(0, 0), Cell::new(4, 4));

        assert!(nav.start(&mut world.ctx()).is_applied());
        let second = nav.start(&mut world.ctx());
        assert_eq!(
            second,
            CommandOutcome::Rejected(NavFault::InvalidCommand("already navigating"))
        );
        assert_eq!(nav.stats().planner_calls, 1);
        assert_eq!(world.events.count(EventKind::FoundPath), 1);
    }

    #[test]
    fn test_no_path_stays_idle() {
        let grid = OccupancyGrid::from_ascii(&["..#..", "..#..", "..#.."]).unwrap();
        let mut world = World::new(grid);
        let mut nav = controller(Cell::new(0, 0), Cell::new(2, 4));

        let outcome = nav.start(&mut world.ctx());
        assert_eq!(
            outcome,
            CommandOutcome::Rejected(NavFault::NoPathFound {
                from: Cell::new(0, 0),
                to: Cell::new(2, 4)
            })
        );
        assert_eq!(nav.phase(), Phase::Idle);
        assert_eq!(world.kinds(), vec![EventKind::NoPath]);
    }

    #[test]
    fn test_blocked_target_replans_before_moving() {
        let mut world = World::new(OccupancyGrid::new(5, 5).unwrap());
        let mut nav = controller(Cell::new(2, 0), Cell::new(2, 4));
        assert!(nav.start(&mut world.ctx()).is_applied());

        // Reach the first real target, then block the following cell.
        while nav.state().index < 2 {
            world.tick(&mut nav);
        }
        let blocked = nav.state().target().unwrap();
        let before = nav.state().position;
        world.dynamic.insert(blocked);
        world.tick(&mut nav);

        let kinds = world.kinds();
        assert_eq!(
            &kinds[kinds.len() - 2..],
            &[EventKind::ObstacleDetected, EventKind::Replanned]
        );
        assert_eq!(nav.state().position, before);
        assert_eq!(nav.state().path[0], nav.state().cell);
        assert!(!nav.state().path.contains(&blocked));
        assert_eq!(*nav.state().path.last().unwrap(), Cell::new(2, 4));
        assert_eq!(nav.stats().replans, 1);
    }

    #[test]
    fn test_replan_failure_aborts_once() {
        let mut world = World::new(OccupancyGrid::new(3, 3).unwrap());
        let mut nav = controller(Cell::new(0, 0), Cell::new(2, 2));
        assert!(nav.start(&mut world.ctx()).is_applied());

        // Wall the goal in with obstacles.
        world.dynamic.extend([Cell::new(1, 2), Cell::new(2, 1)]);
        for _ in 0..600 {
            world.tick(&mut nav);
        }

        assert_eq!(nav.phase(), Phase::Aborted);
        assert_eq!(world.events.count(EventKind::NoAlternativePath), 1);
        assert!(matches!(
            nav.last_fault(),
            Some(NavFault::NoAlternativePath { .. })
        ));
        assert!(!nav.start(&mut world.ctx()).is_applied());
    }

    #[test]
    fn test_replan_targets_start_when_returning() {
        let mut world = World::new(OccupancyGrid::new(4, 4).unwrap());
        let mut nav = controller(Cell::new(0, 0), Cell::new(0, 3));
        assert!(nav.start(&mut world.ctx()).is_applied());
        while nav.phase() != Phase::Returning {
            world.tick(&mut nav);
        }
        while nav.state().index < 2 {
            world.tick(&mut nav);
        }
        let blocked = nav.state().target().unwrap();
        world.dynamic.insert(blocked);
        world.tick(&mut nav);

        let ticket = nav.last_ticket().unwrap();
        assert_eq!(ticket.purpose, PlanPurpose::Replan);
        assert_eq!(ticket.to, Cell::new(0, 0));
        assert_eq!(nav.phase(), Phase::Returning);
    }

    #[test]
    fn test_pause_freezes_motion() {
        let mut world = World::new(OccupancyGrid::new(5, 5).unwrap());
        let mut nav = controller(Cell::new(0, 0), Cell::new(0, 4));
        assert!(nav.start(&mut world.ctx()).is_applied());
        for _ in 0..30 {
            world.tick(&mut nav);
        }
        assert!(nav.pause(&mut world.ctx()).is_applied());
        let frozen = nav.state().clone();
        for _ in 0..100 {
            world.tick(&mut nav);
        }
        assert_eq!(nav.state().position, frozen.position);
        assert_eq!(nav.state().index, frozen.index);

        assert!(!nav.pause(&mut world.ctx()).is_applied());
        assert!(nav.toggle_pause(&mut world.ctx()).is_applied());
        world.tick(&mut nav);
        assert_ne!(nav.state().position, frozen.position);
    }

    #[test]
    fn test_settle_delay_before_return() {
        let mut world = World::new(OccupancyGrid::new(1, 3).unwrap());
        let mut nav = controller(Cell::new(0, 0), Cell::new(0, 2));
        assert!(nav.start(&mut world.ctx()).is_applied());
        while world.events.count(EventKind::ArrivedGoal) == 0 {
            world.tick(&mut nav);
        }
        let arrived_at = world.time;
        assert_eq!(nav.state().index, nav.state().path.len());
        while nav.phase() == Phase::Outbound {
            world.tick(&mut nav);
        }
        let waited = world.time - arrived_at;
        assert!(waited >= 0.6 - 1e-3, "waited {waited}");
        assert!(waited < 0.7, "waited {waited}");
    }

    #[test]
    fn test_start_at_goal_skips_outbound_plan() {
        let mut world = World::new(OccupancyGrid::new(3, 3).unwrap());
        let mut nav = controller(Cell::new(1, 1), Cell::new(1, 1));
        assert!(nav.start(&mut world.ctx()).is_applied());
        assert_eq!(nav.stats().planner_calls, 0);
        assert_eq!(nav.phase(), Phase::Arrived);
        assert_eq!(
            world.kinds(),
            vec![EventKind::ArrivedGoal, EventKind::ArrivedStart]
        );
    }

    #[test]
    fn test_stop_discards_pending_plan() {
        let mut world = World::new(OccupancyGrid::new(5, 5).unwrap());
        let mut nav =
            controller(Cell::new(0, 0), Cell::new(4, 4)).with_mode(PlanningMode::Deferred);

        assert!(nav.start(&mut world.ctx()).is_applied());
        let ticket = nav.take_plan_request().unwrap();
        assert!(nav.take_plan_request().is_none());
        let snapshot = world.ctx().view.snapshot();
        let path = nav.planner().find_path(ticket.from, ticket.to, &snapshot).path;

        assert!(nav.stop(&mut world.ctx()).is_applied());
        assert!(!nav.resolve_plan(ticket, path, &mut world.ctx()));
        assert_eq!(nav.phase(), Phase::Idle);
        assert!(nav.state().path.is_empty());
        assert_eq!(nav.stats().stale_results, 1);
        assert_eq!(world.events.count(EventKind::FoundPath), 0);
    }

    #[test]
    fn test_deferred_plan_resolves() {
        let mut world = World::new(OccupancyGrid::new(5, 5).unwrap());
        let mut nav =
            controller(Cell::new(0, 0), Cell::new(4, 4)).with_mode(PlanningMode::Deferred);

        assert!(nav.start(&mut world.ctx()).is_applied());
        assert_eq!(nav.phase(), Phase::Idle);
        // Waiting for a plan: start again is a no-op
        assert!(!nav.start(&mut world.ctx()).is_applied());

        let ticket = nav.take_plan_request().unwrap();
        let snapshot = world.ctx().view.snapshot();
        assert!(!snapshot.is_blocked(ticket.from));
        let path = nav.planner().find_path(ticket.from, ticket.to, &snapshot).path;
        assert!(nav.resolve_plan(ticket, path, &mut world.ctx()));
        assert_eq!(nav.phase(), Phase::Outbound);
        assert_eq!(nav.stats().planner_calls, 1);
    }

    #[test]
    fn test_reset_returns_to_start() {
        let mut world = World::new(OccupancyGrid::new(5, 5).unwrap());
        let mut nav = controller(Cell::new(0, 0), Cell::new(4, 4));
        assert!(nav.start(&mut world.ctx()).is_applied());
        for _ in 0..80 {
            world.tick(&mut nav);
        }
        assert_ne!(nav.state().cell, Cell::new(0, 0));
        nav.reset();
        assert_eq!(nav.phase(), Phase::Idle);
        assert_eq!(*nav.state(), AgentState::at(Cell::new(0, 0), CELL));
        world.run(&mut nav, 10);
        assert_eq!(nav.state().cell, Cell::new(0, 0));
    }
}
