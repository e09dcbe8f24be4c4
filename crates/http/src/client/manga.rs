//! Catalog, rating, comment and favorite endpoints

use super::{BlackHoleClient, ClientError};
use crate::types::{
    ChapterResponse, CommentRequest, CommentResponse, FavoriteResponse, FavoritesResponse,
    MangaListQuery, MangaListResponse, MangaResponse, MessageResponse, PageQuery, RatingRequest,
    ReadingProgressResponse, ReviewRequest,
};
use reqwest::Method;

impl BlackHoleClient {
    /// Browse the catalog
    pub async fn list_manga(&self, query: &MangaListQuery) -> Result<MangaListResponse, ClientError> {
        let req = self.request(Method::GET, "/manga").query(query);
        self.execute(req).await
    }

    /// Series details, chapters and the caller's reading state
    pub async fn get_manga(&self, manga_id: i64) -> Result<MangaResponse, ClientError> {
        let req = self.request(Method::GET, &format!("/manga/{manga_id}"));
        self.execute(req).await
    }

    /// Chapter pages and comments. Also advances the caller's reading progress.
    pub async fn get_chapter(
        &self,
        manga_id: i64,
        chapter_id: i64,
    ) -> Result<ChapterResponse, ClientError> {
        let req = self.request(
            Method::GET,
            &format!("/manga/{manga_id}/chapters/{chapter_id}"),
        );
        self.execute(req).await
    }

    pub async fn rate_manga(&self, manga_id: i64, rating: f64) -> Result<MessageResponse, ClientError> {
        let req = self
            .request(Method::POST, &format!("/manga/{manga_id}/rate"))
            .json(&RatingRequest { rating });
        self.execute(req).await
    }

    pub async fn rate_chapter(
        &self,
        manga_id: i64,
        chapter_id: i64,
        rating: f64,
    ) -> Result<MessageResponse, ClientError> {
        let req = self
            .request(
                Method::POST,
                &format!("/manga/{manga_id}/chapters/{chapter_id}/rate"),
            )
            .json(&RatingRequest { rating });
        self.execute(req).await
    }

    pub async fn add_review(
        &self,
        manga_id: i64,
        review: &ReviewRequest,
    ) -> Result<MessageResponse, ClientError> {
        let req = self
            .request(Method::POST, &format!("/manga/{manga_id}/review"))
            .json(review);
        self.execute(req).await
    }

    pub async fn add_comment(
        &self,
        manga_id: i64,
        chapter_id: i64,
        content: impl Into<String>,
    ) -> Result<CommentResponse, ClientError> {
        let req = self
            .request(
                Method::POST,
                &format!("/manga/{manga_id}/chapters/{chapter_id}/comments"),
            )
            .json(&CommentRequest {
                content: content.into(),
            });
        self.execute(req).await
    }

    /// Add or remove the series from the caller's favorites
    pub async fn toggle_favorite(&self, manga_id: i64) -> Result<FavoriteResponse, ClientError> {
        let req = self.request(Method::POST, &format!("/manga/{manga_id}/favorite"));
        self.execute(req).await
    }

    pub async fn favorites(&self, page: &PageQuery) -> Result<FavoritesResponse, ClientError> {
        let req = self.request(Method::GET, "/manga/favorites").query(page);
        self.execute(req).await
    }

    pub async fn reading_progress(
        &self,
        page: &PageQuery,
    ) -> Result<ReadingProgressResponse, ClientError> {
        let req = self.request(Method::GET, "/manga/reading-progress").query(page);
        self.execute(req).await
    }
}
