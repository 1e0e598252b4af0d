//! Terminal client for the food nutrition calculation API.
//!
//! Looks up a food, calculates nutrition for a weight in grams, shows the ingredient
//! breakdown when the backend has one, and keeps the last ten calculations on disk.

pub mod api;
pub mod app;
pub mod calculator;
pub mod cli;
pub mod client;
pub mod error;
pub mod history;
pub mod interactive;
pub mod logging;
pub mod messages;
pub mod query;
pub mod render;
pub mod storage;
pub mod types;

#[cfg(test)]
mod testing;

pub mod metadata {
    include!(concat!(env!("OUT_DIR"), "/pkg_info.rs"));
}
