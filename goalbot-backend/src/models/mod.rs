pub mod objective;

pub use objective::{GoalsCollection, Objective, ObjectiveStatus, ProgressUpdate};
