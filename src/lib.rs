//! eCommerce Behavior - clickstream dashboard
//!
//! Loads an e-commerce event CSV, removes duplicate and incomplete rows, and
//! aggregates event-type counts and top brands for purchases and views.

pub mod charts;
pub mod config;
pub mod data;
pub mod gui;
pub mod logging;
