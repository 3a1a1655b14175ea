//! Application services - Use case implementations

pub mod map_links;
mod map_workflow;

pub use map_workflow::{
    FittedRoute, Generation, GenerationCounter, MapWorkflow, Outcome, PlaceDetail, RoutePhase,
    RouteState, SearchPhase, SessionSnapshot, WorkflowConfig,
};
