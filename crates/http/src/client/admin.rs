//! Administration endpoints
//!
//! The server checks admin or moderator rights from the bearer token; these
//! methods only shape the requests.

use super::{BlackHoleClient, ClientError};
use crate::types::{
    AdminChapterResponse, AdminLoginRequest, AdminMangaResponse, ChapterUpdate, CommentResponse,
    CommentsResponse, MangaUpdate, MessageResponse, NewChapter, NewManga, PageQuery,
    StatsResponse, UserActionResponse, UsersResponse,
};
use reqwest::Method;

impl BlackHoleClient {
    /// Submit the admin panel password. The check happens server-side only.
    pub async fn admin_login(
        &self,
        password: impl Into<String>,
    ) -> Result<MessageResponse, ClientError> {
        let req = self
            .request(Method::POST, "/admin/login")
            .json(&AdminLoginRequest {
                password: password.into(),
            });
        self.execute_credential_exchange(req).await
    }

    pub async fn admin_stats(&self) -> Result<StatsResponse, ClientError> {
        let req = self.request(Method::GET, "/admin/stats");
        self.execute(req).await
    }

    pub async fn create_manga(&self, manga: &NewManga) -> Result<AdminMangaResponse, ClientError> {
        let req = self.request(Method::POST, "/admin/manga").json(manga);
        self.execute(req).await
    }

    pub async fn update_manga(
        &self,
        manga_id: i64,
        update: &MangaUpdate,
    ) -> Result<AdminMangaResponse, ClientError> {
        let req = self
            .request(Method::PUT, &format!("/admin/manga/{manga_id}"))
            .json(update);
        self.execute(req).await
    }

    pub async fn delete_manga(&self, manga_id: i64) -> Result<MessageResponse, ClientError> {
        let req = self.request(Method::DELETE, &format!("/admin/manga/{manga_id}"));
        self.execute(req).await
    }

    pub async fn create_chapter(
        &self,
        manga_id: i64,
        chapter: &NewChapter,
    ) -> Result<AdminChapterResponse, ClientError> {
        let req = self
            .request(Method::POST, &format!("/admin/manga/{manga_id}/chapters"))
            .json(chapter);
        self.execute(req).await
    }

    pub async fn update_chapter(
        &self,
        chapter_id: i64,
        update: &ChapterUpdate,
    ) -> Result<AdminChapterResponse, ClientError> {
        let req = self
            .request(Method::PUT, &format!("/admin/chapters/{chapter_id}"))
            .json(update);
        self.execute(req).await
    }

    pub async fn delete_chapter(&self, chapter_id: i64) -> Result<MessageResponse, ClientError> {
        let req = self.request(Method::DELETE, &format!("/admin/chapters/{chapter_id}"));
        self.execute(req).await
    }

    pub async fn admin_comments(&self, page: &PageQuery) -> Result<CommentsResponse, ClientError> {
        let req = self.request(Method::GET, "/admin/comments").query(page);
        self.execute(req).await
    }

    /// Toggle the pinned flag of a comment
    pub async fn pin_comment(&self, comment_id: i64) -> Result<CommentResponse, ClientError> {
        let req = self.request(Method::POST, &format!("/admin/comments/{comment_id}/pin"));
        self.execute(req).await
    }

    pub async fn delete_comment(&self, comment_id: i64) -> Result<MessageResponse, ClientError> {
        let req = self.request(Method::DELETE, &format!("/admin/comments/{comment_id}"));
        self.execute(req).await
    }

    pub async fn admin_users(&self, page: &PageQuery) -> Result<UsersResponse, ClientError> {
        let req = self.request(Method::GET, "/admin/users").query(page);
        self.execute(req).await
    }

    /// Toggle the banned flag of a user
    pub async fn ban_user(&self, user_id: i64) -> Result<UserActionResponse, ClientError> {
        let req = self.request(Method::POST, &format!("/admin/users/{user_id}/ban"));
        self.execute(req).await
    }

    /// Toggle the moderator flag of a user
    pub async fn promote_user(&self, user_id: i64) -> Result<UserActionResponse, ClientError> {
        let req = self.request(Method::POST, &format!("/admin/users/{user_id}/promote"));
        self.execute(req).await
    }
}
