//! Naming, direction and rendering of captured entries.

use std::net::SocketAddr;

use codec::{
    base_capability_url, decode_message, render_hex_dump, render_http_request,
    render_http_response, render_message, CapabilityResolver, CodecLimits, Direction,
    RenderOptions,
};
use template::TemplateRegistry;
use tracing::debug;

use crate::entry::RawMessageEntry;
use crate::filter::FilterSpec;

/// Name given to datagrams that do not decode.
pub const INVALID_NAME: &str = "Invalid";

/// Name given to responses whose request URL is unknown.
pub const RESPONSE_NAME: &str = "HttpResponse";

/// Views captured entries through a template registry and capability table.
pub struct EntryInspector<'a> {
    registry: &'a dyn TemplateRegistry,
    capabilities: &'a dyn CapabilityResolver,
    local: Option<SocketAddr>,
    limits: CodecLimits,
}

impl<'a> EntryInspector<'a> {
    #[must_use]
    pub fn new(registry: &'a dyn TemplateRegistry, capabilities: &'a dyn CapabilityResolver) -> Self {
        Self {
            registry,
            capabilities,
            local: None,
            limits: CodecLimits::default(),
        }
    }

    /// Sets the local client endpoint used to tell outgoing datagrams apart.
    #[must_use]
    pub fn with_local(mut self, local: SocketAddr) -> Self {
        self.local = Some(local);
        self
    }

    #[must_use]
    pub fn with_limits(mut self, limits: CodecLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Names an entry carries for filtering and display.
    ///
    /// One capability URL may map to several names.
    #[must_use]
    pub fn names(&self, entry: &RawMessageEntry) -> Vec<String> {
        match entry {
            RawMessageEntry::Datagram { bytes, .. } => {
                let name = decode_message(self.registry, bytes, &self.limits)
                    .map_or_else(|_| INVALID_NAME.to_string(), |message| message.name);
                vec![name]
            }
            RawMessageEntry::HttpRequest { request, .. } => self.url_names(&request.url),
            RawMessageEntry::HttpResponse { response, .. } => match &response.url {
                Some(url) => self.url_names(url),
                None => vec![RESPONSE_NAME.to_string()],
            },
        }
    }

    /// Which way the entry travelled relative to the local client.
    #[must_use]
    pub fn direction(&self, entry: &RawMessageEntry) -> Direction {
        match entry {
            RawMessageEntry::Datagram { from, .. } => {
                let outgoing = match self.local {
                    Some(local) => *from == local,
                    None => from.ip().is_loopback(),
                };
                if outgoing {
                    Direction::Outgoing
                } else {
                    Direction::Incoming
                }
            }
            RawMessageEntry::HttpRequest { .. } => Direction::Outgoing,
            RawMessageEntry::HttpResponse { .. } => Direction::Incoming,
        }
    }

    /// Renders an entry as message text.
    ///
    /// Datagrams that fail to decode render as a hex dump; the entry is
    /// never dropped.
    #[must_use]
    pub fn render(&self, entry: &RawMessageEntry, options: &RenderOptions) -> String {
        match entry {
            RawMessageEntry::Datagram { bytes, from, .. } => {
                let direction = self.direction(entry);
                match decode_message(self.registry, bytes, &self.limits) {
                    Ok(message) => render_message(&message, direction, options),
                    Err(err) => {
                        debug!(%err, %from, len = bytes.len(), "rendering undecodable datagram as hex");
                        render_hex_dump(direction, bytes)
                    }
                }
            }
            RawMessageEntry::HttpRequest { request, .. } => render_http_request(request, options),
            RawMessageEntry::HttpResponse { response, .. } => {
                render_http_response(response, options)
            }
        }
    }

    /// Keeps the entries a filter accepts, in order.
    pub fn filter<'e, E>(&self, spec: &FilterSpec, entries: &'e [E]) -> Vec<&'e E>
    where
        E: AsRef<RawMessageEntry>,
    {
        spec.apply(entries, |entry| self.names(entry.as_ref()))
    }

    fn url_names(&self, url: &str) -> Vec<String> {
        let names = self.capabilities.names_for_url(base_capability_url(url));
        if names.is_empty() {
            vec![url.to_string()]
        } else {
            names
        }
    }
}

impl std::fmt::Debug for EntryInspector<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntryInspector")
            .field("local", &self.local)
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}
