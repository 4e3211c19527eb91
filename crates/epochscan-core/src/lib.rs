pub mod config;
pub mod logging;

pub mod bench;
pub mod control;
pub mod error;
pub mod fetch;
pub mod matcher;
pub mod range;
pub mod retry;
pub mod scheduler;
pub mod store;

pub use error::ScanError;
