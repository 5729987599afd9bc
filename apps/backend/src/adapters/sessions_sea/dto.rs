use crate::entities::sessions::SessionStatus;

/// Insert payload for a new session row.
#[derive(Debug, Clone)]
pub struct SessionCreate {
    pub session_id: String,
    pub template: String,
    /// Serialized state document.
    pub state: String,
    pub status: SessionStatus,
}

/// Compare-and-set payload for an accepted state transition. The update only
/// lands when the row's tick still equals `expected_tick`; the tick is then
/// incremented by one in the same statement.
#[derive(Debug, Clone)]
pub struct SessionAdvance {
    pub session_id: String,
    pub expected_tick: i64,
    /// Serialized successor state document.
    pub state: String,
    pub status: SessionStatus,
}
