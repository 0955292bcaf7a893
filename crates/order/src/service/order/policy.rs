use std::{fmt, str::FromStr, time::Duration};

/// How an in-place quantity change on an existing order line touches stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemDeltaPolicy {
    /// Take the extra units atomically when the quantity grows, return them when it shrinks.
    #[default]
    Reconcile,
    /// Rewrite quantity and price only; stock is left alone.
    Unchecked,
}

impl fmt::Display for ItemDeltaPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemDeltaPolicy::Reconcile => f.write_str("reconcile"),
            ItemDeltaPolicy::Unchecked => f.write_str("unchecked"),
        }
    }
}

impl FromStr for ItemDeltaPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reconcile" => Ok(ItemDeltaPolicy::Reconcile),
            "unchecked" => Ok(ItemDeltaPolicy::Unchecked),
            other => Err(format!(
                "unknown item delta policy '{other}' (expected 'reconcile' or 'unchecked')"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OrderCommandConfig {
    pub delta_policy: ItemDeltaPolicy,
    /// Budget for undoing completed steps after a failure.
    pub compensation_timeout: Duration,
    /// How long a lifecycle intent stays with its owner before recovery may claim it.
    pub intent_lease: Duration,
}

impl OrderCommandConfig {
    /// Lease for an intent recorded by a live call that has `remaining` time left.
    /// It outlasts both the call and the unwinding that may follow it.
    pub fn lease_for(&self, remaining: Option<Duration>) -> Duration {
        let live = remaining
            .map(|left| left + self.compensation_timeout)
            .unwrap_or_default();
        self.intent_lease.max(live)
    }
}

impl Default for OrderCommandConfig {
    fn default() -> Self {
        Self {
            delta_policy: ItemDeltaPolicy::default(),
            compensation_timeout: Duration::from_secs(10),
            intent_lease: Duration::from_secs(120),
        }
    }
}
