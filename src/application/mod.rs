//! Application layer services implementing business logic.
//!
//! Services coordinate repository calls, validation and business rules, and
//! give HTTP handlers and the admin CLI a narrow API.
//!
//! # Available Services
//!
//! - [`services::IdentityService`] - Bearer/guest-session identity resolution
//! - [`services::LinkService`] - Short link creation, history and deletion
//! - [`services::RedirectService`] - Cache-aside redirect resolution
//! - [`services::UserService`] - Registration, login and token refresh
//! - [`services::TokenService`] - JWT issuance and verification
//! - [`services::MaintenanceService`] - Expired data sweep

pub mod services;
