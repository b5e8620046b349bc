//! Relationship-network explorer: builds a graph of people, organizations and
//! events, lays it out with a force simulation and lets the user pan, zoom,
//! drag, search and inspect it.

pub mod app;
pub mod config;
pub mod entities;
pub mod graph;
pub mod interaction;
pub mod physics;
pub mod render;
pub mod util;
pub mod viewport;
