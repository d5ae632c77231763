use std::convert::Infallible;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::HeaderMap;
use axum::http::request::Parts;

/// Address the rate limiter keys a request on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClientIp(pub IpAddr);

/// Resolve the client address.
///
/// Priority:
/// 1. X-Forwarded-For header (first entry, for requests through proxies)
/// 2. X-Real-IP header (for Nginx)
/// 3. Socket address (direct connection)
///
/// Unparseable headers fall through to the next source. Without any source the
/// unspecified address is returned, so such requests share one budget.
pub fn resolve_client_ip(headers: &HeaderMap, socket: Option<SocketAddr>) -> IpAddr {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .and_then(|first| first.trim().parse::<IpAddr>().ok());

    let real_ip = || {
        headers.get("x-real-ip").and_then(|value| value.to_str().ok()).and_then(|value| value.trim().parse().ok())
    };

    forwarded
        .or_else(real_ip)
        .or_else(|| socket.map(|addr| addr.ip()))
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

impl<S: Send + Sync> FromRequestParts<S> for ClientIp {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let socket = parts.extensions.get::<ConnectInfo<SocketAddr>>().map(|ConnectInfo(addr)| *addr);
        Ok(ClientIp(resolve_client_ip(&parts.headers, socket)))
    }
}
