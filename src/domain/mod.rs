//! Domain layer containing business entities and logic.
//!
//! Defines the entities, the caller identity model and the repository
//! interfaces, independent of storage and HTTP concerns.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`identity`] - Who is acting on a request (user or guest session)
//! - [`expiration`] - Shared link expiry predicate
//! - [`repositories`] - Data access trait definitions
//! - [`click_event`] - Click tracking event model
//! - [`click_worker`] - Asynchronous click processing worker
//!
//! # Click Processing Flow
//!
//! 1. A redirect resolves a live link
//! 2. [`click_event::ClickEvent`] is offered to a bounded channel without waiting
//! 3. [`click_worker::run_click_worker`] persists events with retry logic
//! 4. Click data is written via [`repositories::ClickRepository`]

pub mod click_event;
pub mod click_worker;
pub mod entities;
pub mod expiration;
pub mod identity;
pub mod repositories;
