pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod github;
pub mod models;
pub mod orchestrator;
pub mod prompt;
pub mod server;
pub mod session;
pub mod tools;
pub mod ui;
