//! Review-stage override model for wheel imports.
//!
//! The mapping service proposes rings, activity groups and a column
//! mapping; this crate holds the operator's edits on top of that
//! suggestion and derives the name-routing tables the structure builder
//! consumes. It also owns the per-import session state machine.

pub mod columns;
pub mod error;
pub mod overrides;
pub mod remap;
pub mod session;

pub use columns::{ColumnOverrides, ColumnRole};
pub use error::{MapError, SessionError};
pub use overrides::{EntityKind, EntityOverride, OverrideSlot, SlotOrigin};
pub use remap::RemapTable;
pub use session::{ImportSession, ImportStage, ReviewState};
