//! Sketchroom client shells
//!
//! A headless terminal client for native targets and a `WebClient` for the
//! browser, both thin layers over `sketchroom-core`.

pub mod params;

#[cfg(not(target_arch = "wasm32"))]
pub mod console;

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::{WebClient, run_wasm};
