use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSummary {
    pub role_id: i64,
    pub role_key: String,
    pub role_name: String,
    pub data_scope: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostSummary {
    pub post_id: i64,
    pub post_code: String,
    pub post_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeptRecord {
    pub dept_id: i64,
    pub dept_name: String,
    pub dept_category: Option<String>,
}
