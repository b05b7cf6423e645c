//! Command-line surface of `supportdeskctl`
//!
//! [`commands`] holds the clap definitions, [`handlers`] runs them against
//! the loader, cache and document library.

mod commands;
mod handlers;

pub use commands::*;
pub use handlers::*;
