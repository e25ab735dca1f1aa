//! Wire types of the Locust web API

use serde::{Deserialize, Serialize};

/// Reply to `/swarm` and `/stop`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SwarmReply {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

/// The subset of `/stats/requests` we read
#[derive(Debug, Clone, Deserialize)]
pub struct StatsReply {
    pub state: String,
    #[serde(default)]
    pub user_count: u32,
}

/// What the load generator reports about its swarm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SwarmStatus {
    pub active: bool,
    pub current_users: u32,
}

impl SwarmStatus {
    pub fn idle() -> Self {
        Self {
            active: false,
            current_users: 0,
        }
    }
}

impl From<StatsReply> for SwarmStatus {
    fn from(reply: StatsReply) -> Self {
        let active = matches!(reply.state.as_str(), "spawning" | "running");
        Self {
            active,
            current_users: reply.user_count,
        }
    }
}
