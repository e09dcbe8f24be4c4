//! Public user directory

use super::{BlackHoleClient, ClientError};
use crate::types::{PageQuery, UserDirectory, UserResponse};
use reqwest::Method;

impl BlackHoleClient {
    /// List public user profiles
    pub async fn list_users(&self, page: &PageQuery) -> Result<UserDirectory, ClientError> {
        let req = self.request(Method::GET, "/users").query(page);
        self.execute(req).await
    }

    /// Public profile of one user
    pub async fn get_user(&self, user_id: i64) -> Result<UserResponse, ClientError> {
        let req = self.request(Method::GET, &format!("/users/{user_id}"));
        self.execute(req).await
    }
}
