//! Session state for the rainfall dashboard.
//!
//! This crate provides:
//! - `state`: the single owned `DashboardState` record and its pure
//!   event transitions
//! - `notice`: the transient notifications those transitions raise
//! - `demo`: the fixed sample dataset shown while the API is
//!   unreachable

pub mod demo;
pub mod notice;
pub mod state;
