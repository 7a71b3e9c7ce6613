//! Devnet wallet walkthrough: load an identity from the environment, read
//! its balance two ways, inspect the account, and optionally send SOL.

pub mod config;
pub mod error;
pub mod orchestrator;

pub use config::{AppConfig, TransferPlan, TransferRequest};
pub use error::ConfigError;
pub use orchestrator::{Orchestrator, RunReport};
