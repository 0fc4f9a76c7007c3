//! The agents behind the agentdeck endpoints.
//!
//! Each agent is a short, fixed sequence of async steps:
//!
//! * [`react::ReactAgent`]: one model call over the thread's history, kept in
//!   a [`memory::MemoryStore`] keyed by thread id.
//! * [`sql::SqlAgent`]: write query → execute query → generate answer over a
//!   read-only SQLite database.

pub mod error;
pub mod memory;
pub mod react;
pub mod sql;
pub mod thread;

#[cfg(test)]
pub(crate) mod testing;

pub use error::AgentError;
pub use memory::MemoryStore;
pub use react::ReactAgent;
pub use sql::{QueryRunner, SqlAgent, SqlDatabase, SqlStage, SqlState};
pub use thread::new_thread_id;
