//! Backend runtime entry point and public API surface.
//!
//! This crate owns the backend lifecycle, routes bridge messages to services,
//! and manages the notification log, the farm catalog and the per-crop plant
//! health analyzers shared by asynchronous tasks.

mod app;
pub mod catalog;
mod config;
mod runtime;
mod services;
mod state;
pub mod store;

pub(crate) use crate::app::AppContext;
pub use crate::runtime::run;
