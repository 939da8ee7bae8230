//! formkit-tui - declarative forms for terminal UIs
//!
//! Field components bound to a shared form state through an ambient
//! context, schema validation with `validator`, and an example screen.

pub mod app;
pub mod config;
pub mod form;
pub mod platform;
pub mod screens;
pub mod ui;
