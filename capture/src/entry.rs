//! Captured traffic entries.

use std::net::SocketAddr;

use codec::{HttpRequest, HttpResponse};

/// One captured message, immutable once logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawMessageEntry {
    /// A datagram exactly as it crossed the wire.
    Datagram {
        from: SocketAddr,
        to: SocketAddr,
        bytes: Vec<u8>,
    },
    /// An outgoing capability request.
    HttpRequest { request: HttpRequest, request_id: u64 },
    /// The response to the request with the same `request_id`.
    HttpResponse {
        response: HttpResponse,
        request_id: u64,
    },
}

impl RawMessageEntry {
    /// Correlation id of an HTTP entry.
    #[must_use]
    pub const fn request_id(&self) -> Option<u64> {
        match self {
            Self::Datagram { .. } => None,
            Self::HttpRequest { request_id, .. } | Self::HttpResponse { request_id, .. } => {
                Some(*request_id)
            }
        }
    }

    #[must_use]
    pub const fn is_datagram(&self) -> bool {
        matches!(self, Self::Datagram { .. })
    }

    /// Short label of the entry variant.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Datagram { .. } => "datagram",
            Self::HttpRequest { .. } => "http-request",
            Self::HttpResponse { .. } => "http-response",
        }
    }
}
