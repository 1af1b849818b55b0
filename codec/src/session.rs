//! Session state consumed by symbolic field tokens.

use uuid::Uuid;

/// Live session values that symbolic tokens such as `$SessionId` expand to.
///
/// Every accessor returns `None` when the value is unknown; the codec turns
/// that into a field error instead of guessing.
pub trait SessionContext {
    /// Current session id.
    fn session_id(&self) -> Option<Uuid>;

    /// Id of the logged-in agent.
    fn agent_id(&self) -> Option<Uuid>;

    /// Circuit code of the current region connection.
    fn connection_code(&self) -> Option<u32>;

    /// Handle of the current region.
    fn region_handle(&self) -> Option<u64>;

    /// Agent position in region coordinates.
    fn position(&self) -> Option<[f32; 3]>;

    /// A newly generated random id.
    fn fresh_id(&self) -> Uuid {
        Uuid::new_v4()
    }
}

/// A context with no session: every session token fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSession;

impl SessionContext for NoSession {
    fn session_id(&self) -> Option<Uuid> {
        None
    }

    fn agent_id(&self) -> Option<Uuid> {
        None
    }

    fn connection_code(&self) -> Option<u32> {
        None
    }

    fn region_handle(&self) -> Option<u64> {
        None
    }

    fn position(&self) -> Option<[f32; 3]> {
        None
    }
}

/// A fixed snapshot of session values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticSession {
    pub session_id: Option<Uuid>,
    pub agent_id: Option<Uuid>,
    pub connection_code: Option<u32>,
    pub region_handle: Option<u64>,
    pub position: Option<[f32; 3]>,
}

impl SessionContext for StaticSession {
    fn session_id(&self) -> Option<Uuid> {
        self.session_id
    }

    fn agent_id(&self) -> Option<Uuid> {
        self.agent_id
    }

    fn connection_code(&self) -> Option<u32> {
        self.connection_code
    }

    fn region_handle(&self) -> Option<u64> {
        self.region_handle
    }

    fn position(&self) -> Option<[f32; 3]> {
        self.position
    }
}
