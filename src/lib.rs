//! Rust client and view layer for the finanzas income/expense tracker.
//!
//! This crate fetches transactions from a finanzas server, groups them by
//! day and month, renders the result into a display-ready
//! [`view::ViewModel`], and submits create, delete and CSV-import
//! operations back to the server.

pub mod aggregate;
pub mod chart;
#[cfg(any(feature = "async", feature = "blocking"))]
pub mod client;
pub mod error;
pub mod format;
pub mod models;
#[cfg(any(feature = "async", feature = "blocking"))]
pub mod tracker;
pub mod view;
