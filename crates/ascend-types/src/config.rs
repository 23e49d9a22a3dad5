//! Contract configuration.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{constants, AuctionError, OrgId, Result};

/// Tunables of an auction deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuctionConfig {
    /// Price increase applied by `CreateNewRound`.
    pub increment: Decimal,
    /// Role value that grants administrator reads of sealed terms.
    pub admin_role: String,
    /// Name of the client attribute holding the role.
    pub role_attribute: String,
    /// Prefix of an organization's private partition name.
    pub collection_prefix: String,
}

impl Default for AuctionConfig {
    fn default() -> Self {
        Self {
            increment: Decimal::new(constants::DEFAULT_INCREMENT, 0),
            admin_role: constants::DEFAULT_ADMIN_ROLE.to_string(),
            role_attribute: constants::DEFAULT_ROLE_ATTRIBUTE.to_string(),
            collection_prefix: constants::DEFAULT_COLLECTION_PREFIX.to_string(),
        }
    }
}

impl AuctionConfig {
    /// Parse a JSON document; omitted fields take their defaults.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)
            .map_err(|err| AuctionError::Configuration(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.increment <= Decimal::ZERO {
            return Err(AuctionError::Configuration(format!(
                "increment must be positive, got {}",
                self.increment
            )));
        }
        if self.admin_role.is_empty() || self.role_attribute.is_empty() {
            return Err(AuctionError::Configuration(
                "admin role and role attribute must be non-empty".to_string(),
            ));
        }
        if self.collection_prefix.is_empty() {
            return Err(AuctionError::Configuration(
                "collection prefix must be non-empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Private partition owned by `org`.
    #[must_use]
    pub fn collection_for(&self, org: &OrgId) -> String {
        format!("{}{}", self.collection_prefix, org)
    }
}
