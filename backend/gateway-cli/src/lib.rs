pub mod cli;
pub mod configs;
pub mod error;
pub mod logger;
