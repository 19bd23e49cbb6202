pub mod config;
pub mod naming;
pub mod trajectory_csv;
