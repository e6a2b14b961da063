//! Sampling engine for Linux `/proc` plus the terminal monitor built on it.
//!
//! [`system`] holds the engine: counter parsing, CPU utilization windows and
//! per-process metadata, all reading through a [`system::ProcContext`]. The
//! remaining modules are the interactive driver.

pub mod action;
pub mod app;
pub mod config;
pub mod event;
pub mod format;
pub mod logging;
pub mod system;
pub mod ui;
