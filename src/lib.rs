//! Pokedex TUI
//!
//! A landing view gated on typing "Ready!", a catalog list fetched from
//! PokeAPI, and a detail overlay with sprite, sortable stat table, bar chart
//! and PDF export.

pub mod action;
pub mod api;
pub mod components;
pub mod effect;
pub mod export;
pub mod raster;
pub mod reducer;
pub mod sprite;
pub mod state;
pub mod theme;
pub mod ui;
