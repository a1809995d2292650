//! Builders to construct bouncer components from configuration.

pub mod bouncer_builder;

pub use bouncer_builder::BouncerBuilder;
