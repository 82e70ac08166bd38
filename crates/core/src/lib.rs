#![deny(rust_2018_idioms)]

pub mod commands;
pub mod config;
pub mod cooldown;
pub mod host;
pub mod loadout;
pub mod localization;
pub mod player;
pub mod plugin;
pub mod sync;
pub mod timers;
