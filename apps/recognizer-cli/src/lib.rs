//! Shared bootstrap for the recognizer binaries: settings, logging, the
//! listen-port stub and shutdown handling.

pub mod bootstrap;

pub use bootstrap::{init_tracing, load_settings, seed_vocabulary, serve_until, shutdown_signal, BackendArgs};
