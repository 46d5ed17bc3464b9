pub mod dashboard;
pub mod help;
pub mod predict;
pub mod stats;
