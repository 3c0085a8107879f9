use serde::{Deserialize, Serialize};

/// Milliseconds since the Unix epoch.
pub type Millis = i64;

pub const MAX_SCORE: u8 = 5;

pub fn now_millis() -> Millis {
    chrono::Utc::now().timestamp_millis()
}

/// Long-term review progress of a single card, as stored in the ledger.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewState {
    #[serde(default)]
    pub score: u8,
    #[serde(default)]
    pub last_reviewed: Option<Millis>,
    #[serde(default)]
    pub next_review: Millis,
}

impl ReviewState {
    pub fn is_due(&self, now: Millis) -> bool {
        self.next_review <= now
    }
}
