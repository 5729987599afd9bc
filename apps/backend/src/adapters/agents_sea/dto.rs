/// Insert payload for a freshly registered, unclaimed agent.
#[derive(Debug, Clone)]
pub struct AgentCreate {
    pub agent_id: String,
    pub claim_secret: String,
}

/// Compare-and-set payload for the one-shot claim.
#[derive(Debug, Clone)]
pub struct AgentClaim {
    pub agent_id: String,
    pub claim_secret: String,
    pub bearer_secret: String,
}
