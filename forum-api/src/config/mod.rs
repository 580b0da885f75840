//! Configuration for the forum API.
//!
//! Everything is read from environment variables (a `.env` file is loaded at
//! startup). [`Settings`] holds the parsed values; [`Dependencies`] turns them
//! into the store, verifier and service the server runs with.

mod cors;
mod dependencies;
mod settings;

pub use cors::create_cors_layer;
pub use dependencies::Dependencies;
pub use settings::{LogFormat, Settings, StoreBackend};
