//! Authentication API client methods

use super::{BlackHoleClient, ClientError};
use crate::types::{
    LoginRequest, LoginResponse, MessageResponse, ProfileResponse, ProfileUpdate, RegisterRequest,
    RegisterResponse, ResendVerificationRequest, VerifyRequest,
};
use reqwest::Method;

impl BlackHoleClient {
    /// Create an unverified account
    pub async fn register(
        &self,
        request: &RegisterRequest,
    ) -> Result<RegisterResponse, ClientError> {
        let req = self.request(Method::POST, "/auth/register").json(request);
        self.execute(req).await
    }

    /// Confirm an account with the emailed code
    pub async fn verify(&self, request: &VerifyRequest) -> Result<MessageResponse, ClientError> {
        let req = self.request(Method::POST, "/auth/verify").json(request);
        self.execute(req).await
    }

    /// Exchange email and password for a bearer token
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ClientError> {
        let req = self.request(Method::POST, "/auth/login").json(request);
        self.execute_credential_exchange(req).await
    }

    /// Fetch the profile of the token holder
    pub async fn get_profile(&self) -> Result<ProfileResponse, ClientError> {
        let req = self.request(Method::GET, "/auth/profile");
        self.execute(req).await
    }

    /// Update the token holder's profile
    pub async fn update_profile(
        &self,
        update: &ProfileUpdate,
    ) -> Result<ProfileResponse, ClientError> {
        let req = self.request(Method::PUT, "/auth/profile").json(update);
        self.execute(req).await
    }

    /// Ask the server to issue a new verification code
    pub async fn resend_verification(
        &self,
        email: impl Into<String>,
    ) -> Result<MessageResponse, ClientError> {
        let req = self
            .request(Method::POST, "/auth/resend-verification")
            .json(&ResendVerificationRequest {
                email: email.into(),
            });
        self.execute(req).await
    }
}
