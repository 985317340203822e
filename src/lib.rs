// Library surface for the binary and the integration tests.
pub mod app_dirs;
pub mod config;
pub mod display;
pub mod error;
pub mod escape;
pub mod runtime;
pub mod session;
pub mod source;
pub mod stats;
pub mod util;
pub mod verse;
