//! Runtime integration.

pub mod shutdown;

pub use shutdown::install_shutdown_handler;
