//! The practice dialogue state machine.

mod advance;
mod service;

pub use advance::Advance;
pub use service::ScenarioService;
