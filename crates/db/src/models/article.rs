//! Article entity model and DTOs.

use std::fmt;
use std::str::FromStr;

use haosenyi_core::error::CoreError;
use haosenyi_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Publication state, mirrored by the `article_status` PostgreSQL enum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "article_status", rename_all = "UPPERCASE")]
pub enum ArticleStatus {
    #[default]
    Draft,
    Published,
}

impl ArticleStatus {
    pub const ALL: [ArticleStatus; 2] = [ArticleStatus::Draft, ArticleStatus::Published];

    pub fn as_str(self) -> &'static str {
        match self {
            ArticleStatus::Draft => "DRAFT",
            ArticleStatus::Published => "PUBLISHED",
        }
    }
}

impl fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArticleStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| CoreError::Validation("status must be DRAFT or PUBLISHED".into()))
    }
}

/// An article row from the `articles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub cover_image: Option<String>,
    pub status: ArticleStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting an article. The slug is derived by the caller.
#[derive(Debug, Clone)]
pub struct CreateArticle {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub cover_image: Option<String>,
    pub status: ArticleStatus,
}

/// DTO for updating an article. Only `Some` fields are applied.
#[derive(Debug, Clone, Default)]
pub struct UpdateArticle {
    pub title: Option<String>,
    /// Must be set whenever `title` is set.
    pub slug: Option<String>,
    pub content: Option<String>,
    pub cover_image: Option<String>,
    pub status: Option<ArticleStatus>,
}

/// Filters accepted by the article list query.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArticleFilter {
    pub status: Option<ArticleStatus>,
}
