/// Insert payload for one action-log entry.
#[derive(Debug, Clone)]
pub struct ActionAppend {
    pub action_id: String,
    pub session_id: String,
    pub agent_id: String,
    pub role: String,
    pub action: String,
    /// The session tick at the time of acceptance (pre-increment).
    pub tick: i64,
}
