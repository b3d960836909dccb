//! Navigation controller: phase machine, motion and replanning.

mod controller;
mod state;

pub use controller::{NavContext, NavigationController};
pub use state::{
    AgentState, CommandOutcome, ControllerStats, Phase, PlanPurpose, PlanTicket, PlanningMode,
};
