// Application layer: CLI command dispatch on top of core and config.

pub mod commands;
