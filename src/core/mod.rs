pub mod dashboard;
pub mod driver;
pub mod generator;

pub use crate::domain::model::{CallOutcome, HttpReply, RunSummary, TransactionRequest};
pub use crate::domain::ports::{Pacer, Storage, Transport};
pub use crate::utils::error::Result;
