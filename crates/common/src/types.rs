//! Identifier types shared across crates

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

/// Tenant identifier used in every tenant-scoped cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From)]
#[display("{_0}")]
#[serde(transparent)]
pub struct TenantId(pub String);

impl TenantId {
    /// Id of the built-in platform tenant.
    pub const DEFAULT: &'static str = "000000";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn default_tenant() -> Self {
        Self(Self::DEFAULT.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TenantId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// User identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From)]
#[display("{_0}")]
#[serde(transparent)]
pub struct UserId(pub i64);

impl UserId {
    /// The platform super administrator.
    pub const SUPER_ADMIN: UserId = UserId(1);

    pub fn is_super_admin(&self) -> bool {
        *self == Self::SUPER_ADMIN
    }
}
