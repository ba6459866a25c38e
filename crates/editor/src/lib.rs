//! Interactive side of the lint pipeline.
//!
//! A [`Document`] is the editing surface. [`LintSession`] decides when to ask
//! the worker for a lint, drops answers computed against old text, filters
//! what is left and paints it as [`Decoration`]s. [`SessionDriver`] runs a
//! session against a live [`quill_worker::WorkerHandle`].
//!
//! All offsets coming from the worker are chars into the plain text; the
//! [`mapper`] turns them into document positions.

pub mod coordinator;
pub mod decoration;
mod document;
pub mod driver;
mod error;
pub mod filter;
pub mod mapper;
pub mod session;
mod surface;

pub use coordinator::{Coordinator, CoordinatorConfig, CoordinatorPhase, Reaction};
pub use decoration::{Decoration, DecorationSet, Rgba, category_color, render};
pub use document::{Block, BlockKind, Document, Marks, TextRun};
pub use driver::{EditOp, SessionClient, SessionDriver, SessionInput, SessionSnapshot};
pub use error::{EditError, SessionClosed};
pub use filter::{IgnoreList, IgnoredSpan, filter_issues};
pub use mapper::{Bias, map_offset};
pub use session::{LintSession, SessionConfig, SessionStatus};
pub use surface::{Change, Leaf, LintSurface, TextLeaf};
