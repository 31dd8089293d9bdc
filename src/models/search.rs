use crate::error::{PlannerError, Result};
use crate::models::money::Money;
use serde::{Deserialize, Serialize};

/// The inputs the calling layer extracts from a user's trip request.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TripRequest {
    pub location: String,
    pub personality_code: String,
    pub theme: String,
    #[serde(default)]
    pub inclusion_hints: Vec<String>,
    /// Place names harvested from web mentions
    #[serde(default)]
    pub mention_names: Vec<String>,
    pub n_days: u32,
    pub budget_ceiling: Money,
}

impl TripRequest {
    pub fn new(location: &str, personality_code: &str, theme: &str, n_days: u32, budget_ceiling: Money) -> Self {
        Self {
            location: location.to_string(),
            personality_code: personality_code.to_string(),
            theme: theme.to_string(),
            inclusion_hints: Vec::new(),
            mention_names: Vec::new(),
            n_days,
            budget_ceiling,
        }
    }

    pub fn with_inclusion_hints(mut self, hints: Vec<String>) -> Self {
        self.inclusion_hints = hints;
        self
    }

    pub fn with_mention_names(mut self, names: Vec<String>) -> Self {
        self.mention_names = names;
        self
    }

    /// Contract checks that must pass before any network call is made
    pub fn validate(&self) -> Result<()> {
        validate_location(&self.location)?;
        validate_n_days(self.n_days)?;
        validate_budget(self.budget_ceiling)
    }
}

pub fn validate_location(location: &str) -> Result<()> {
    if location.trim().is_empty() {
        return Err(PlannerError::InvalidRequest("location must not be empty".into()));
    }
    Ok(())
}

pub fn validate_n_days(n_days: u32) -> Result<()> {
    if n_days == 0 {
        return Err(PlannerError::InvalidRequest("n_days must be at least 1".into()));
    }
    Ok(())
}

pub fn validate_budget(budget_ceiling: Money) -> Result<()> {
    if budget_ceiling.is_negative() {
        return Err(PlannerError::InvalidRequest(format!(
            "budget ceiling must not be negative, got {}",
            budget_ceiling
        )));
    }
    Ok(())
}
