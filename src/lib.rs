//! 2D stable-fluids solver on a closed box, with a viewer and frame export
//! layered on top.
//!
//! The core ([`state`], [`solver`]) is a pure function of its inputs and
//! never fails. Everything around it (config, rendering, export) reports
//! errors through [`error::Error`].

pub mod config;
pub mod error;
pub mod export;
pub mod iterm2;
pub mod renderer;
pub mod scene;
pub mod session;
pub mod solver;
pub mod state;
