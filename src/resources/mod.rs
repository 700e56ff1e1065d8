mod config;
mod feedback;
mod store;

pub use config::GridConfig;
pub use feedback::{GridFeedback, GridFeedbackPort};
pub use store::{CellRecord, CellStore, Realization};
