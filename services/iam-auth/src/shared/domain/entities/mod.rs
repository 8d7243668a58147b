//! Records read from the owning components

mod client;
mod organization;
mod tenant;
mod user;

pub use client::*;
pub use organization::*;
pub use tenant::*;
pub use user::*;

use serde::{Deserialize, Serialize};

/// Status flag shared by tenants, clients and users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    #[default]
    Normal,
    Disabled,
}

impl RecordStatus {
    pub fn is_normal(&self) -> bool {
        matches!(self, Self::Normal)
    }
}
