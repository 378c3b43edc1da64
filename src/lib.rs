pub mod cli;
pub mod config;
pub mod notify;
pub mod refresh;
pub mod remote;
pub mod report;
pub mod snapshot;
pub mod store;
