//! # Desk Schedule
//!
//! How quickly the in-memory desk moves placed orders through their lifecycle, and how
//! they settle. Defaults follow the storefront's payment simulation: processing starts
//! shortly after placement and payment takes five seconds.
//!
//! | Variable                    | Default | Meaning                              |
//! |-----------------------------|---------|--------------------------------------|
//! | `STORE_PROCESSING_DELAY_MS` | `1000`  | `PENDING` to `PROCESSING`            |
//! | `STORE_SETTLEMENT_DELAY_MS` | `5000`  | `PROCESSING` to `COMPLETED`/`EXPIRED` |

use crate::error::OrderError;
use crate::model::{OrderId, OrderStatus};
use status_sync::SyncError;
use std::time::Duration;

pub const PROCESSING_DELAY_ENV: &str = "STORE_PROCESSING_DELAY_MS";
pub const SETTLEMENT_DELAY_ENV: &str = "STORE_SETTLEMENT_DELAY_MS";

const DEFAULT_PROCESSING_DELAY_MS: u64 = 1000;
const DEFAULT_SETTLEMENT_DELAY_MS: u64 = 5000;

/// Decides how a processed order ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SettlementPolicy {
    /// Every payment succeeds.
    Complete,
    /// Every payment fails and the order expires.
    Expire,
    /// Odd order ids complete, even ones expire. Deterministic stand-in for a coin flip.
    #[default]
    Alternate,
}

impl SettlementPolicy {
    pub fn outcome(&self, id: OrderId) -> OrderStatus {
        match self {
            SettlementPolicy::Complete => OrderStatus::Completed,
            SettlementPolicy::Expire => OrderStatus::Expired,
            SettlementPolicy::Alternate if id.0 % 2 == 1 => OrderStatus::Completed,
            SettlementPolicy::Alternate => OrderStatus::Expired,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeskSchedule {
    pub processing_delay: Duration,
    pub settlement_delay: Duration,
    pub policy: SettlementPolicy,
}

impl Default for DeskSchedule {
    fn default() -> Self {
        Self {
            processing_delay: Duration::from_millis(DEFAULT_PROCESSING_DELAY_MS),
            settlement_delay: Duration::from_millis(DEFAULT_SETTLEMENT_DELAY_MS),
            policy: SettlementPolicy::default(),
        }
    }
}

impl DeskSchedule {
    pub fn with_policy(mut self, policy: SettlementPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Defaults overridden by the `STORE_*` variables that are set.
    pub fn from_env() -> Result<Self, OrderError> {
        let defaults = Self::default();
        Ok(Self {
            processing_delay: read_delay(PROCESSING_DELAY_ENV)?
                .unwrap_or(defaults.processing_delay),
            settlement_delay: read_delay(SETTLEMENT_DELAY_ENV)?
                .unwrap_or(defaults.settlement_delay),
            policy: defaults.policy,
        })
    }
}

fn read_delay(var: &str) -> Result<Option<Duration>, OrderError> {
    parse_delay(var, std::env::var(var).ok().as_deref())
}

fn parse_delay(var: &str, raw: Option<&str>) -> Result<Option<Duration>, OrderError> {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Ok(None);
    };
    raw.parse::<u64>()
        .map(|ms| Some(Duration::from_millis(ms)))
        .map_err(|e| SyncError::InvalidConfig(format!("{var}={raw:?} is not a number: {e}")).into())
}
