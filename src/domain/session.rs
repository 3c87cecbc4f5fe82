// Merchant session domain model
use chrono::{DateTime, Utc};
use core::fmt;
use serde::{Deserialize, Serialize};

const SHOPIFY_SUFFIX: &str = ".myshopify.com";

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ShopDomainError {
    #[error("shop name cannot be empty")]
    Empty,
    #[error("shop name must be at most {max} characters")]
    TooLong { max: usize },
    #[error("shop name contains invalid character '{0}'")]
    InvalidCharacter(char),
}

/// A Shopify shop domain such as `my-shop.myshopify.com`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShopDomain(String);

impl ShopDomain {
    pub const MAX_LENGTH: usize = 255;

    /// Parse a shop domain. Input is trimmed and lower-cased; a bare shop
    /// handle gets the `.myshopify.com` suffix.
    pub fn parse(raw: &str) -> Result<Self, ShopDomainError> {
        let trimmed = raw.trim().to_ascii_lowercase();
        if trimmed.is_empty() {
            return Err(ShopDomainError::Empty);
        }
        if let Some(bad) = trimmed
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '.'))
        {
            return Err(ShopDomainError::InvalidCharacter(bad));
        }

        let domain = if trimmed.contains('.') {
            trimmed
        } else {
            format!("{trimmed}{SHOPIFY_SUFFIX}")
        };
        if domain.len() > Self::MAX_LENGTH {
            return Err(ShopDomainError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        Ok(Self(domain))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human-readable name: `my-shop.myshopify.com` becomes `my shop`.
    pub fn display_name(&self) -> String {
        self.0
            .trim_end_matches(SHOPIFY_SUFFIX)
            .replace('-', " ")
    }
}

impl fmt::Display for ShopDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub shop: ShopDomain,
    pub started_at: DateTime<Utc>,
}

impl Session {
    pub fn new(shop: ShopDomain) -> Self {
        Self {
            shop,
            started_at: Utc::now(),
        }
    }
}
