//! Hosting: the TCP acceptor, the session supervisor, and a scripted
//! client for exercising both.
mod casino;
mod client;
mod config;
mod server;

pub use casino::*;
pub use client::*;
pub use config::*;
pub use server::*;
