//! Business logic services for the application layer.

pub mod identity_service;
pub mod link_service;
pub mod maintenance_service;
pub mod redirect_service;
pub mod token_service;
pub mod user_service;

pub use identity_service::IdentityService;
pub use link_service::LinkService;
pub use maintenance_service::{MaintenanceService, SweepReport};
pub use redirect_service::{ClickContext, RedirectService};
pub use token_service::{TokenPair, TokenService};
pub use user_service::UserService;
