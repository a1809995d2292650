//! Configuration models for the bouncer.

pub mod bouncer;

pub use bouncer::BouncerConfig;
