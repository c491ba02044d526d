//! Referral Invitations - invitation lifecycle management
//!
//! This crate implements the lifecycle of referral invitations: tokens a
//! referring team or user sends to a prospective user, which end up
//! successful, cancelled or expired.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
