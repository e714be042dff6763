//! Portfolio work entity model and DTOs.

use std::fmt;
use std::str::FromStr;

use haosenyi_core::error::CoreError;
use haosenyi_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Kind of client project, mirrored by the `work_type` PostgreSQL enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "work_type", rename_all = "UPPERCASE")]
pub enum WorkType {
    Website,
    Ecommerce,
    App,
    Other,
}

impl WorkType {
    pub const ALL: [WorkType; 4] = [
        WorkType::Website,
        WorkType::Ecommerce,
        WorkType::App,
        WorkType::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WorkType::Website => "WEBSITE",
            WorkType::Ecommerce => "ECOMMERCE",
            WorkType::App => "APP",
            WorkType::Other => "OTHER",
        }
    }
}

impl fmt::Display for WorkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|work_type| work_type.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation("type must be one of WEBSITE, ECOMMERCE, APP or OTHER".into())
            })
    }
}

/// A work row from the `works` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Work {
    pub id: DbId,
    pub title: String,
    pub company: String,
    #[serde(rename = "type")]
    pub work_type: WorkType,
    pub link_url: Option<String>,
    pub image_url: Option<String>,
    pub is_featured: bool,
    pub display_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a work.
#[derive(Debug, Clone)]
pub struct CreateWork {
    pub title: String,
    pub company: String,
    pub work_type: WorkType,
    pub link_url: Option<String>,
    pub image_url: Option<String>,
    pub is_featured: bool,
    pub display_order: i32,
}

/// DTO for updating a work. Only `Some` fields are applied.
#[derive(Debug, Clone, Default)]
pub struct UpdateWork {
    pub title: Option<String>,
    pub company: Option<String>,
    pub work_type: Option<WorkType>,
    /// `Some(None)` clears the link, `None` leaves it untouched.
    pub link_url: Option<Option<String>>,
    pub image_url: Option<String>,
    pub is_featured: Option<bool>,
    pub display_order: Option<i32>,
}

/// Filters accepted by the work list query.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkFilter {
    pub work_type: Option<WorkType>,
    pub featured_only: bool,
}
