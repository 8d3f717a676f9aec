//! # Role Module
//!
//! One run function per participant role.
//!
//! The role is chosen once from configuration and never changes for the
//! process lifetime; each run function wires together exactly the state
//! machines that role needs and nothing else.

pub mod controller;
pub mod kite;
pub mod receiver;
