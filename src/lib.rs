pub mod browser;
pub mod config;
pub mod export;
pub mod fetch;
pub mod runner;
pub mod table;
