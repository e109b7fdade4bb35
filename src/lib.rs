pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{http::ReqwestTransport, pacer::TokioPacer};
#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, DriverConfig};

pub use crate::core::dashboard::{
    build_dashboard, render_dashboard, write_dashboard, DashboardSpec, PanelDef,
};
pub use crate::core::driver::{submit, DriverState, LoadDriver};
pub use crate::core::generator::generate_request;
pub use domain::model::{CallOutcome, HttpReply, RunSummary, TransactionRequest};
pub use utils::error::{LoadError, Result};
