pub mod animation;
pub mod app;
pub mod camera;
pub mod cli;
pub mod config;
pub mod controller;
pub mod events;
pub mod input;
pub mod rig;
pub mod stage;
pub mod time;
pub mod zone;

pub use app::{run, run_headless, App};
