/// A subscription tier
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Plan {
    #[sqlx(rename = "planid")]
    pub plan_id: i32,
    pub name: String,
    pub resolution: String,
    /// Upper bound for a subscriber's session count
    #[sqlx(rename = "maxsessions")]
    pub max_parallel_sessions: i32,
    #[sqlx(rename = "fee")]
    pub monthly_fee: i32,
}

impl Plan {
    /// Whether a customer holding `session_count` sessions may open another one
    pub fn has_free_session(&self, session_count: i32) -> bool {
        session_count < self.max_parallel_sessions
    }

    /// Plan changes may keep or raise the session capacity, never lower it
    pub fn can_replace(&self, current: &Plan) -> bool {
        self.max_parallel_sessions >= current.max_parallel_sessions
    }
}
