//! Terminal frontend for the guessing game.
//!
//! This crate provides `clap` commands that run against a
//! [`runtime::GameClient`] and print styled text. It implements the
//! `client_frontend_core::Frontend` trait.
//!
//! # Architecture
//!
//! CliFrontend is a pure UI layer that:
//! - Receives a GameClient for communication
//! - Does NOT own the background workers
//! - Subscribes to status events and prints them as they arrive

mod app;
mod command;
mod config;
pub mod logging;
pub mod presentation;

pub use app::CliFrontend;
pub use command::{Cli, Command};
pub use config::{CliConfig, UiConfig};

// Re-export for convenience (used in main.rs)
pub use client_frontend_core::FrontendConfig;
