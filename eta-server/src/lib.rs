//! Shuttle ETA server.
//!
//! A web service that answers: "when will my shuttle reach the next
//! stops?" Live GPS positions are matched against fixed campus routes and
//! travel times come from an OSRM routing engine, with a straight-line
//! estimate whenever the engine cannot answer.

pub mod cache;
pub mod config;
pub mod domain;
pub mod eta;
pub mod fleet;
pub mod geo;
pub mod osrm;
pub mod registry;
pub mod routing;
pub mod web;
