//! # pumpkinpi-domain
//!
//! Pure domain model for the pumpkinpi motion-triggered controller.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **LEDs** (binary outputs mirrored to a GPIO pin)
//! - Define **Features** (the motion-sensor toggle and webcam brightness mode)
//! - Define **Sounds** (read-only catalog entries played on demand)
//! - Define **Photos** (derived from the photos directory, never stored)
//! - Define **State events** (`led-update`, `feature-update`, `photo-update`)
//! - Contain all input validation (status normalisation, brightness parsing)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod catalog;
pub mod event;
pub mod feature;
pub mod led;
pub mod photo;
pub mod sound;
