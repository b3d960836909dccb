//! Navigation state types.

use serde::Serialize;

use crate::core::{Cell, WorldPoint};
use crate::error::NavFault;
use crate::planning::Path;

/// Navigation phase.
///
/// ```text
/// Idle ──start──► Outbound ──goal──► Returning ──start cell──► Arrived
///                    │                   │
///                    └──── replan fails ─┴──► Aborted (reset required)
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Phase {
    #[default]
    Idle,
    /// Driving start → goal
    Outbound,
    /// Driving goal → start
    Returning,
    /// Round trip complete
    Arrived,
    /// Replanning failed
    Aborted,
}

impl Phase {
    /// Outbound or Returning
    pub fn is_moving(&self) -> bool {
        matches!(self, Phase::Outbound | Phase::Returning)
    }

    /// Phases from which `start` is accepted
    pub fn can_start(&self) -> bool {
        matches!(self, Phase::Idle | Phase::Arrived)
    }
}

/// Agent kinematic and plan state.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AgentState {
    /// Continuous position (grid-pixel units)
    pub position: WorldPoint,
    /// Last cell the agent arrived at
    pub cell: Cell,
    /// Current path; `path[0]` is the cell the plan started from
    pub path: Path,
    /// Index of the next target in `path`; `== path.len()` at the final cell
    pub index: usize,
    pub phase: Phase,
    pub paused: bool,
}

impl AgentState {
    /// Agent standing on the centre of `cell`, idle.
    pub fn at(cell: Cell, cell_size: f32) -> Self {
        Self {
            position: WorldPoint::cell_center(cell, cell_size),
            cell,
            path: Vec::new(),
            index: 0,
            phase: Phase::Idle,
            paused: false,
        }
    }

    /// Next path cell to drive to, if any
    pub fn target(&self) -> Option<Cell> {
        self.path.get(self.index).copied()
    }

    /// Path cells not yet reached
    pub fn remaining(&self) -> &[Cell] {
        self.path.get(self.index..).unwrap_or(&[])
    }
}

/// Why a plan was requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum PlanPurpose {
    /// Outbound leg requested by `start`
    Initial,
    /// Route invalidated mid-leg
    Replan,
    /// Return leg after the goal settle delay
    Return,
}

/// Epoch-stamped planning request.
///
/// Results are applied only while the controller epoch still matches;
/// `start`, `stop` and `reset` bump the epoch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct PlanTicket {
    pub epoch: u64,
    pub from: Cell,
    pub to: Cell,
    pub purpose: PlanPurpose,
}

/// How plan requests are fulfilled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PlanningMode {
    /// Plan immediately against the live occupancy view
    #[default]
    Inline,
    /// Leave the ticket for the caller to plan elsewhere and resolve later
    Deferred,
}

/// Result of a control command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub enum CommandOutcome {
    Applied,
    Rejected(NavFault),
}

impl CommandOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, CommandOutcome::Applied)
    }
}

/// Planner usage counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ControllerStats {
    /// Tickets issued to the planner (trivial paths excluded)
    pub planner_calls: usize,
    /// Successful mid-leg replans
    pub replans: usize,
    /// Plan results discarded as stale
    pub stale_results: usize,
}
