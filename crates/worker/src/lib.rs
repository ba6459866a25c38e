//! Background lint worker.
//!
//! A [`WorkerHost`] owns the loaded [`EngineSet`](quill_lint::EngineSet) and
//! answers [`WorkerCommand`]s with [`WorkerEvent`]s. [`WorkerHandle`] spawns a
//! host as a tokio task and is the only way the editor talks to it.

mod class;
mod error;
mod handle;
mod host;
mod loader;
mod protocol;
mod spawn;

pub use class::TaskClass;
pub use error::WorkerError;
pub use handle::WorkerHandle;
pub use host::{HostPhase, WorkerHost};
pub use loader::{ConfiguredLoader, EngineLoader};
pub use protocol::{LintRequest, LintResponse, WorkerCommand, WorkerEvent};
pub use spawn::{spawn, spawn_blocking};
