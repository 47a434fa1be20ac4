//! Translation job orchestration core

pub mod config;
pub mod discovery;
pub mod engine;
pub mod errors;
pub mod handler;
pub mod models;
pub mod providers;
pub mod runner;
pub mod storage;
