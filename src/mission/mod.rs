pub mod runner;
pub mod store;
