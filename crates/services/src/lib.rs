#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod ingest;
pub mod scenario;
pub mod session_store;
pub mod turn;

pub use parrot_core::Clock;

pub use app_services::AppServices;
pub use error::{AppServicesError, FailureKind, IngestError, ScenarioError};
pub use ingest::{FeedItem, IngestReport, IngestService};
pub use scenario::{Advance, ScenarioService};
pub use session_store::SessionData;
pub use turn::{Intent, TurnHandler, TurnOutcome};
