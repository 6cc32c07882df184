//! # pumpkinpi-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a **JSON API** over the control services
//!   (`/api/leds`, `/api/features`, `/api/sounds`, `/api/photos`)
//! - Push every state change to live observers as **Server-Sent Events**
//!   (`/api/events/stream`)
//! - Serve captured photo files under `/photos`
//! - Map service results into HTTP responses (`404`, `400`, `500`)
//!
//! ## Dependency rule
//! Depends on `pumpkinpi-app` (for port traits and services) and
//! `pumpkinpi-domain` (for domain types used in request/response mapping).
//! Never leaks axum types into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;

#[cfg(test)]
mod test_support;
