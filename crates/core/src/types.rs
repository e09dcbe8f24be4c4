//! Entities exchanged with the Black Hole API
//!
//! Field names follow the server's JSON. Timestamps are the server's naive
//! UTC ISO-8601 strings. Optional fields default so older or trimmed
//! payloads still deserialize.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

pub type UserId = i64;

/// Read an explicit `null` the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A registered reader, as returned by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_admin: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_moderator: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_verified: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_banned: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub bio: String,
    #[serde(default, rename = "profile_image", alias = "avatar")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

impl User {
    /// Moderation rights; admins are implicitly moderators
    pub fn can_moderate(&self) -> bool {
        self.is_moderator || self.is_admin
    }
}

/// Publication status of a series
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MangaStatus {
    #[default]
    Ongoing,
    Completed,
    Hiatus,
    #[serde(other)]
    Unknown,
}

impl MangaStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ongoing => "ongoing",
            Self::Completed => "completed",
            Self::Hiatus => "hiatus",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for MangaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MangaStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ongoing" => Ok(Self::Ongoing),
            "completed" => Ok(Self::Completed),
            "hiatus" => Ok(Self::Hiatus),
            other => Err(format!(
                "unknown status '{other}' (expected ongoing, completed or hiatus)"
            )),
        }
    }
}

/// Catalog ordering understood by `GET /manga`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    #[default]
    UpdatedAt,
    Rating,
    Title,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UpdatedAt => "updated_at",
            Self::Rating => "rating",
            Self::Title => "title",
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "updated_at" | "updated" => Ok(Self::UpdatedAt),
            "rating" => Ok(Self::Rating),
            "title" => Ok(Self::Title),
            other => Err(format!(
                "unknown sort order '{other}' (expected updated_at, rating or title)"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manga {
    pub id: i64,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub arabic_title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: MangaStatus,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub average_rating: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_chapters: u32,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

impl Manga {
    /// Genres are stored server-side as one comma separated string
    pub fn genres(&self) -> Vec<&str> {
        self.genre
            .as_deref()
            .map(|genre| {
                genre
                    .split(',')
                    .map(str::trim)
                    .filter(|g| !g.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// `GET /manga/:id` payload: the series plus per-reader state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MangaDetails {
    #[serde(flatten)]
    pub manga: Manga,
    #[serde(default, deserialize_with = "null_as_default")]
    pub chapters: Vec<Chapter>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reviews: Vec<Review>,
    /// Last chapter number read by the current reader
    #[serde(default)]
    pub reading_progress: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_favorite: bool,
    #[serde(default)]
    pub user_rating: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub id: i64,
    pub manga_id: i64,
    pub chapter_number: f64,
    #[serde(default)]
    pub title: Option<String>,
    /// JSON encoded list of page image URLs
    #[serde(default)]
    pub images: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub average_rating: f64,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

impl Chapter {
    /// Decoded page URLs; empty when the field is missing or malformed
    pub fn image_urls(&self) -> Vec<String> {
        self.images
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or_default()
    }
}

/// `GET /manga/:mangaId/chapters/:chapterId` payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterDetails {
    #[serde(flatten)]
    pub chapter: Chapter,
    #[serde(default, deserialize_with = "null_as_default")]
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub user_id: UserId,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub manga_id: Option<i64>,
    #[serde(default)]
    pub chapter_id: Option<i64>,
    pub content: String,
    #[serde(default)]
    pub images: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_pinned: bool,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub user_id: UserId,
    #[serde(default)]
    pub user: Option<User>,
    pub manga_id: i64,
    pub content: String,
    pub rating: f64,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Favorite {
    pub id: i64,
    pub user_id: UserId,
    pub manga_id: i64,
    #[serde(default)]
    pub manga: Option<Manga>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingProgress {
    pub id: i64,
    pub user_id: UserId,
    pub manga_id: i64,
    #[serde(default)]
    pub manga: Option<Manga>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_chapter_read: f64,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

/// Page window attached to every list response
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
    pub pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

/// `GET /admin/stats` payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdminStats {
    #[serde(default, deserialize_with = "null_as_default")]
    pub totals: StatsTotals,
    #[serde(default, deserialize_with = "null_as_default")]
    pub recent_activity: RecentActivity,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsTotals {
    pub users: u64,
    pub verified_users: u64,
    pub banned_users: u64,
    pub manga: u64,
    pub chapters: u64,
    pub comments: u64,
    pub ratings: u64,
    pub reviews: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecentActivity {
    pub users: Vec<User>,
    pub comments: Vec<Comment>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_accepts_server_payload() {
        let user: User = serde_json::from_value(json!({
            "id": 7,
            "username": "reader",
            "email": "reader@example.com",
            "profile_image": "default-avatar.png",
            "bio": "",
            "is_admin": false,
            "is_moderator": true,
            "is_verified": true,
            "is_banned": false,
            "created_at": "2024-03-01T10:15:30.123456",
            "updated_at": null
        }))
        .unwrap();

        assert_eq!(user.id, 7);
        assert_eq!(user.avatar.as_deref(), Some("default-avatar.png"));
        assert!(user.can_moderate());
        assert!(user.created_at.is_some());
        assert!(user.updated_at.is_none());
    }

    #[test]
    fn user_accepts_null_bio_and_flags() {
        let user: User = serde_json::from_value(json!({
            "id": 9,
            "username": "quiet",
            "email": "quiet@example.com",
            "profile_image": null,
            "bio": null,
            "is_admin": null,
            "is_moderator": false,
            "is_verified": true,
            "is_banned": null
        }))
        .unwrap();

        assert_eq!(user.bio, "");
        assert!(user.avatar.is_none());
        assert!(!user.is_admin);
        assert!(!user.is_banned);
    }

    #[test]
    fn manga_accepts_null_computed_fields() {
        let manga: Manga = serde_json::from_value(json!({
            "id": 3,
            "title": "Solo",
            "arabic_title": null,
            "status": null,
            "average_rating": null,
            "total_chapters": null
        }))
        .unwrap();

        assert_eq!(manga.arabic_title, "");
        assert_eq!(manga.status, MangaStatus::Ongoing);
        assert_eq!(manga.average_rating, 0.0);
        assert_eq!(manga.total_chapters, 0);
    }

    #[test]
    fn user_accepts_avatar_alias_and_missing_flags() {
        let user: User = serde_json::from_value(json!({
            "id": 1,
            "username": "u",
            "email": "u@example.com",
            "avatar": "me.png"
        }))
        .unwrap();

        assert_eq!(user.avatar.as_deref(), Some("me.png"));
        assert!(!user.is_admin);
        assert!(!user.can_moderate());
    }

    #[test]
    fn admin_can_moderate() {
        let user: User = serde_json::from_value(json!({
            "id": 1, "username": "root", "email": "root@example.com", "is_admin": true
        }))
        .unwrap();
        assert!(user.can_moderate());
    }

    #[test]
    fn manga_details_flatten_series_fields() {
        let details: MangaDetails = serde_json::from_value(json!({
            "id": 3,
            "title": "Solo Leveling",
            "arabic_title": "سولو ليفلينج",
            "genre": "action, fantasy,",
            "status": "completed",
            "average_rating": 4.5,
            "total_chapters": 1,
            "chapters": [{
                "id": 10,
                "manga_id": 3,
                "chapter_number": 1.0,
                "images": "[\"https://cdn.example.com/1.jpg\",\"https://cdn.example.com/2.jpg\"]"
            }],
            "reviews": [],
            "reading_progress": null,
            "is_favorite": true,
            "user_rating": 5.0
        }))
        .unwrap();

        assert_eq!(details.manga.status, MangaStatus::Completed);
        assert_eq!(details.manga.genres(), vec!["action", "fantasy"]);
        assert!(details.is_favorite);
        assert_eq!(details.chapters[0].image_urls().len(), 2);
    }

    #[test]
    fn unknown_status_does_not_fail_deserialization() {
        let status: MangaStatus = serde_json::from_value(json!("cancelled")).unwrap();
        assert_eq!(status, MangaStatus::Unknown);
    }

    #[test]
    fn malformed_chapter_images_yield_no_pages() {
        let chapter = Chapter {
            id: 1,
            manga_id: 1,
            chapter_number: 2.5,
            title: None,
            images: Some("not json".into()),
            average_rating: 0.0,
            created_at: None,
            updated_at: None,
        };
        assert!(chapter.image_urls().is_empty());
    }

    #[test]
    fn sort_and_status_parse_from_cli_strings() {
        assert_eq!("updated-at".parse::<SortBy>().unwrap(), SortBy::UpdatedAt);
        assert_eq!("Title".parse::<SortBy>().unwrap(), SortBy::Title);
        assert_eq!("HIATUS".parse::<MangaStatus>().unwrap(), MangaStatus::Hiatus);
        assert!("dropped".parse::<MangaStatus>().is_err());
    }
}
