//! Membership plans sold through the payments provider.
//!
//! A plan mirrors one recurring Stripe price. Plans are never deleted so
//! historical subscriptions keep a valid foreign key; they are retired by
//! setting `is_active = false`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::validate::{optional_text, required_text};
use crate::domain::foundation::{PlanId, Timestamp, ValidationError};

/// Billing cadence of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingInterval {
    Month,
    Year,
}

impl BillingInterval {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingInterval::Month => "month",
            BillingInterval::Year => "year",
        }
    }
}

impl fmt::Display for BillingInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BillingInterval {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "month" => Ok(BillingInterval::Month),
            "year" => Ok(BillingInterval::Year),
            other => Err(ValidationError::invalid_format(
                "billing_interval",
                format!("expected month or year, got '{}'", other),
            )),
        }
    }
}

/// Editable plan fields submitted by an admin.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlanInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price_cents: i64,
    pub currency: String,
    pub billing_interval: BillingInterval,
    pub stripe_price_id: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipPlan {
    pub id: PlanId,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub currency: String,
    pub billing_interval: BillingInterval,
    pub stripe_price_id: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl MembershipPlan {
    pub fn create(input: PlanInput) -> Result<Self, ValidationError> {
        let now = Timestamp::now();
        let mut plan = Self {
            id: PlanId::new(),
            name: String::new(),
            description: None,
            price_cents: 0,
            currency: String::new(),
            billing_interval: input.billing_interval,
            stripe_price_id: String::new(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        plan.update(input)?;
        plan.updated_at = now;
        Ok(plan)
    }

    pub fn update(&mut self, input: PlanInput) -> Result<(), ValidationError> {
        let name = required_text("name", &input.name, 120)?;
        let description = optional_text("description", input.description.as_deref(), 2000)?;
        if input.price_cents <= 0 {
            return Err(ValidationError::out_of_range(
                "price_cents",
                1,
                i64::MAX,
                input.price_cents,
            ));
        }
        let currency = normalize_currency(&input.currency)?;
        let stripe_price_id = input.stripe_price_id.trim();
        if !stripe_price_id.starts_with("price_") || stripe_price_id.len() <= "price_".len() {
            return Err(ValidationError::invalid_format(
                "stripe_price_id",
                "must start with price_",
            ));
        }

        self.name = name;
        self.description = description;
        self.price_cents = input.price_cents;
        self.currency = currency;
        self.billing_interval = input.billing_interval;
        self.stripe_price_id = stripe_price_id.to_string();
        self.is_active = input.is_active;
        self.updated_at = Timestamp::now();
        Ok(())
    }
}

fn normalize_currency(currency: &str) -> Result<String, ValidationError> {
    let currency = currency.trim();
    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ValidationError::invalid_format(
            "currency",
            "expected a 3-letter ISO code",
        ));
    }
    Ok(currency.to_ascii_lowercase())
}
