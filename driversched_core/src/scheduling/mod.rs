//! The staffing model, and the schedule read back from its solution
pub mod interpret;
pub mod model;
pub mod schedule;

pub use interpret::{interpret, InterpretError, Interpretation, Violation};
pub use model::{ModelError, SlotVariables, StaffingModel};
pub use schedule::{Schedule, ScheduleSummary, SlotAssignment};
