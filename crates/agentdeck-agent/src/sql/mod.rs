//! Natural-language questions answered from a SQLite database.
//!
//! [`SqlAgent::invoke`] runs three stages in order, each filling one field
//! of [`SqlState`]:
//!
//! 1. [`SqlStage::WriteQuery`]: the model writes a query via structured output.
//! 2. [`SqlStage::ExecuteQuery`]: the query passes the read-only
//!    [`guard`] and is run; the rows (or the driver error) become text.
//! 3. [`SqlStage::GenerateAnswer`]: the model phrases the answer.

pub mod database;
pub mod guard;
pub mod pipeline;
pub mod prompt;

pub use database::{QueryRunner, SqlDatabase};
pub use pipeline::{QueryOutput, SqlAgent, SqlStage, SqlState};
