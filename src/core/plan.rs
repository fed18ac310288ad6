//! Monthly usage quotas for the free and premium plans.
//!
//! The entitlement itself comes from the payment provider; this module only
//! receives the resulting `premium` flag.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Documents a free account may create per month.
pub const FREE_DOCS_PER_MONTH: u32 = 3;

/// AI text generations per month on the free plan.
pub const FREE_AI_PER_MONTH: u32 = 5;

/// AI text generations per month on the premium plan.
pub const PREMIUM_AI_PER_MONTH: u32 = 300;

/// Usage counters for the current billing period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageCounters {
    /// Period the counters belong to, "YYYY-MM".
    pub period: String,
    /// Documents created this period.
    pub docs_used: u32,
    /// AI generations counted against the free quota.
    pub ai_free_used: u32,
    /// AI generations counted against the premium quota.
    pub ai_premium_used: u32,
}

/// Billing period key for a date, e.g. "2025-03".
pub fn period_of(date: NaiveDate) -> String {
    format!("{}-{:02}", date.year(), date.month())
}

impl UsageCounters {
    /// Fresh counters for the period containing `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            period: period_of(today),
            docs_used: 0,
            ai_free_used: 0,
            ai_premium_used: 0,
        }
    }

    /// Reset all counters if `today` is in a different period.
    /// Returns true if a reset happened.
    pub fn ensure_period(&mut self, today: NaiveDate) -> bool {
        let current = period_of(today);
        if self.period == current {
            return false;
        }
        debug!(old = %self.period, new = %current, "new usage period, resetting counters");
        *self = Self::new(today);
        true
    }

    pub fn can_create_doc(&mut self, premium: bool, today: NaiveDate) -> bool {
        self.ensure_period(today);
        premium || self.docs_used < FREE_DOCS_PER_MONTH
    }

    pub fn record_doc(&mut self, today: NaiveDate) {
        self.ensure_period(today);
        self.docs_used += 1;
    }

    /// Documents left this period; `None` means unlimited.
    pub fn remaining_docs(&mut self, premium: bool, today: NaiveDate) -> Option<u32> {
        self.ensure_period(today);
        if premium {
            None
        } else {
            Some(FREE_DOCS_PER_MONTH.saturating_sub(self.docs_used))
        }
    }

    pub fn can_use_ai(&mut self, premium: bool, today: NaiveDate) -> bool {
        self.ensure_period(today);
        if premium {
            self.ai_premium_used < PREMIUM_AI_PER_MONTH
        } else {
            self.ai_free_used < FREE_AI_PER_MONTH
        }
    }

    /// Count one AI generation. Both counters advance so that a user who
    /// upgrades mid-month keeps their usage history.
    pub fn record_ai(&mut self, today: NaiveDate) {
        self.ensure_period(today);
        self.ai_free_used += 1;
        self.ai_premium_used += 1;
    }

    pub fn remaining_ai(&mut self, premium: bool, today: NaiveDate) -> u32 {
        self.ensure_period(today);
        if premium {
            PREMIUM_AI_PER_MONTH.saturating_sub(self.ai_premium_used)
        } else {
            FREE_AI_PER_MONTH.saturating_sub(self.ai_free_used)
        }
    }
}
