// src/context/mod.rs — External project context: transport, cache, relevance

pub mod client;
pub mod integrator;
pub mod types;

pub use client::{ContextSource, DisabledContextSource, HttpContextSource};
pub use integrator::ContextIntegrator;
pub use types::{ContextAnalysis, ContextSummary, ContextUpdate, Priority, ProjectContext};
