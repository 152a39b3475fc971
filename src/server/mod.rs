//! Server application core modules.
//!
//! Configuration, persistence, the referral engine, the services built on it and the
//! HTTP and cron surfaces that trigger them.

pub mod config;
pub mod controller;
pub mod data;
pub mod error;
pub mod model;
pub mod referral;
pub mod router;
pub mod scheduler;
pub mod service;
pub mod startup;
