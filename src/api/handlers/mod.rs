//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod health;
pub mod links;
pub mod ping;
pub mod redirect;
pub mod shorten;
pub mod users;

pub use health::health_handler;
pub use links::{delete_link_handler, history_handler};
pub use ping::ping_handler;
pub use redirect::redirect_handler;
pub use shorten::shorten_handler;
pub use users::{get_user_handler, login_handler, refresh_handler, register_handler};
