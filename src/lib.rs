// src/lib.rs

//! SapienzaAdvisor course detail library
//!
//! Fetches everything a course page needs from the backend services, decides which
//! actions the current user may take, and assembles the renderable view-state.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod utils;
