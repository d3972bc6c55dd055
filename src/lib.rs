pub mod ai;
pub mod auth;
pub mod config;
pub mod orchestrator;
pub mod parser;
pub mod storage;
pub mod store;
pub mod types;
