//! Core domain entities representing the business data model.
//!
//! # Entity Types
//!
//! - [`Link`] - A shortened URL mapping and its [`Owner`]
//! - [`Click`] - A recorded redirect
//! - [`User`] - A registered account
//! - [`GuestSession`] - An anonymous, time-limited identity
//!
//! # Design Pattern
//!
//! Entities that are created by the service come with a separate input
//! struct (`NewLink`, `NewClick`, `NewUser`) carrying only the fields the
//! caller controls.

pub mod click;
pub mod guest_session;
pub mod link;
pub mod user;

pub use click::{Click, NewClick};
pub use guest_session::GuestSession;
pub use link::{Link, NewLink, Owner};
pub use user::{NewUser, User};
