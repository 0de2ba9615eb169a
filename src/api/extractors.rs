//! Custom request extractors.

use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{header, request::Parts},
};
use std::convert::Infallible;
use std::net::SocketAddr;

use crate::application::services::ClickContext;
use crate::state::AppState;
use crate::utils::client_ip::extract_client_ip;

/// Client IP and user agent of the current request.
///
/// The peer address comes from [`ConnectInfo`] when the server was started
/// with connect info; forwarding headers are honoured only when the service
/// is configured as running behind a proxy. Never rejects.
#[derive(Debug, Clone)]
pub struct RequestOrigin(pub ClickContext);

impl FromRequestParts<AppState> for RequestOrigin {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);

        let user_agent = parts
            .headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Ok(Self(ClickContext {
            ip: extract_client_ip(&parts.headers, peer, state.behind_proxy),
            user_agent,
        }))
    }
}
