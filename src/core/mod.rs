// src/core/mod.rs

pub mod action;
pub mod args;
pub mod builder;
pub mod config_loader;
pub mod engine;
pub mod errors;
pub mod group;
pub mod help;
pub mod parser;
