//! Request and response bodies of the REST API

use blackhole_core::{
    AdminStats, Chapter, ChapterDetails, Comment, Favorite, Manga, MangaDetails, MangaStatus,
    Pagination, ReadingProgress, SortBy, User, UserId,
};
use serde::{Deserialize, Serialize};

/// Error payload returned with non-2xx statuses
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

/// Acknowledgement carrying only a server message
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

// Authentication

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Registration issues no token, only the pending account id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub user_id: UserId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyRequest {
    pub user_id: UserId,
    pub verification_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub access_token: String,
    pub user: User,
}

/// `GET /auth/profile` and `PUT /auth/profile` payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub user: User,
}

/// Partial profile update; absent fields are left unchanged by the server
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.bio.is_none() && self.profile_image.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResendVerificationRequest {
    pub email: String,
}

// Catalog

/// Filters for `GET /manga`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MangaListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<MangaStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<SortBy>,
}

/// Page selection for the paginated per-user and admin lists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PageQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

impl PageQuery {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: Some(page),
            per_page: Some(per_page),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MangaListResponse {
    pub manga: Vec<Manga>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MangaResponse {
    pub manga: MangaDetails,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterResponse {
    pub chapter: ChapterDetails,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RatingRequest {
    pub rating: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewRequest {
    pub content: String,
    pub rating: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRequest {
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub comment: Option<Comment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub is_favorite: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoritesResponse {
    pub favorites: Vec<Favorite>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadingProgressResponse {
    pub reading_progress: Vec<ReadingProgress>,
    pub pagination: Pagination,
}

// Administration

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminLoginRequest {
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub stats: AdminStats,
}

/// `POST /admin/manga` body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewManga {
    pub title: String,
    pub arabic_title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<MangaStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
}

/// `PUT /admin/manga/:id` body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MangaUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arabic_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<MangaStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminMangaResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub manga: Manga,
}

/// `POST /admin/manga/:id/chapters` body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewChapter {
    pub chapter_number: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

/// `PUT /admin/chapters/:id` body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChapterUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chapter_number: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminChapterResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub chapter: Chapter,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentsResponse {
    pub comments: Vec<Comment>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsersResponse {
    pub users: Vec<User>,
    pub pagination: Pagination,
}

/// `GET /users` payload
///
/// Paginated like the admin listing, though a plain array is accepted too.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserDirectory {
    Page(UsersResponse),
    List(Vec<User>),
}

impl UserDirectory {
    pub fn users(&self) -> &[User] {
        match self {
            UserDirectory::Page(page) => &page.users,
            UserDirectory::List(users) => users,
        }
    }

    pub fn pagination(&self) -> Option<&Pagination> {
        match self {
            UserDirectory::Page(page) => Some(&page.pagination),
            UserDirectory::List(_) => None,
        }
    }
}

/// `GET /users/{id}` payload, with or without a `user` envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserResponse {
    Envelope { user: User },
    Bare(User),
}

impl UserResponse {
    pub fn user(&self) -> &User {
        match self {
            UserResponse::Envelope { user } | UserResponse::Bare(user) => user,
        }
    }

    pub fn into_user(self) -> User {
        match self {
            UserResponse::Envelope { user } | UserResponse::Bare(user) => user,
        }
    }
}

/// Ban and promote answers; both toggle a flag and return the new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserActionResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub user: User,
}
