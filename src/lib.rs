// src/lib.rs — Library root for persona-dispatch

pub mod api;
pub mod cli;
pub mod context;
pub mod core;
pub mod infra;
pub mod persona;
pub mod util;
