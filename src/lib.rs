pub mod census;
pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod logging;
pub mod model;
pub mod search;
pub mod util;
