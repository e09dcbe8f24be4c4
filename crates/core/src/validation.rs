//! Client-side form validation
//!
//! These checks run before a request is sent so errors can be shown next to
//! the offending input. They are advisory: the server validates again and its
//! answer is authoritative.

use crate::error::{ValidationError, ValidationErrors};
use crate::types::UserId;
use serde::{Deserialize, Serialize};

/// Forms that can be checked before submission
pub trait Validate {
    /// Returns every failing field, or `Ok(())` if the form may be submitted
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// Account creation form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistrationForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub accept_terms: bool,
}

impl Validate for RegistrationForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(validators::validate_username(&self.username));
        errors.check(validators::validate_email(&self.email));
        errors.check(validators::validate_password(&self.password));
        errors.check(validators::validate_password_confirmation(
            &self.password,
            &self.confirm_password,
        ));
        if !self.accept_terms {
            errors.check(Err(ValidationError::new(
                "terms",
                "يجب الموافقة على الشروط والأحكام",
            )));
        }
        errors.into_result()
    }
}

/// Email/password sign-in form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl Validate for LoginForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(validators::validate_email(&self.email));
        errors.check(validators::validate_required(
            &self.password,
            "password",
            "كلمة المرور مطلوبة",
        ));
        errors.into_result()
    }
}

/// Account verification form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerificationForm {
    pub user_id: UserId,
    pub verification_code: String,
}

impl Validate for VerificationForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(validators::validate_verification_code(
            &self.verification_code,
        ));
        errors.into_result()
    }
}

pub mod validators {
    use crate::error::ValidationError;
    use once_cell::sync::Lazy;
    use regex::Regex;

    pub const USERNAME_MIN_LEN: usize = 3;
    pub const PASSWORD_MIN_LEN: usize = 6;
    pub const VERIFICATION_CODE_LEN: usize = 6;
    pub const RATING_MIN: f64 = 1.0;
    pub const RATING_MAX: f64 = 5.0;

    static EMAIL: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("email pattern is valid")
    });

    static USERNAME: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("username pattern is valid"));

    /// Reject empty or whitespace-only input
    pub fn validate_required(
        value: &str,
        field: &'static str,
        message: &'static str,
    ) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::new(field, message));
        }
        Ok(())
    }

    pub fn validate_username(username: &str) -> Result<(), ValidationError> {
        validate_required(username, "username", "اسم المستخدم مطلوب")?;
        let username = username.trim();
        if username.chars().count() < USERNAME_MIN_LEN {
            return Err(ValidationError::new(
                "username",
                "اسم المستخدم يجب أن يكون 3 أحرف على الأقل",
            ));
        }
        if !USERNAME.is_match(username) {
            return Err(ValidationError::new(
                "username",
                "اسم المستخدم يجب أن يحتوي على أحرف وأرقام فقط",
            ));
        }
        Ok(())
    }

    pub fn validate_email(email: &str) -> Result<(), ValidationError> {
        validate_required(email, "email", "البريد الإلكتروني مطلوب")?;
        if !EMAIL.is_match(email.trim()) {
            return Err(ValidationError::new("email", "البريد الإلكتروني غير صحيح"));
        }
        Ok(())
    }

    pub fn validate_password(password: &str) -> Result<(), ValidationError> {
        if password.is_empty() {
            return Err(ValidationError::new("password", "كلمة المرور مطلوبة"));
        }
        if password.chars().count() < PASSWORD_MIN_LEN {
            return Err(ValidationError::new(
                "password",
                "كلمة المرور يجب أن تكون 6 أحرف على الأقل",
            ));
        }
        Ok(())
    }

    pub fn validate_password_confirmation(
        password: &str,
        confirmation: &str,
    ) -> Result<(), ValidationError> {
        if confirmation.is_empty() {
            return Err(ValidationError::new(
                "confirm_password",
                "تأكيد كلمة المرور مطلوب",
            ));
        }
        if password != confirmation {
            return Err(ValidationError::new(
                "confirm_password",
                "كلمات المرور غير متطابقة",
            ));
        }
        Ok(())
    }

    /// Verification codes are exactly six ASCII digits
    pub fn validate_verification_code(code: &str) -> Result<(), ValidationError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(ValidationError::new(
                "verification_code",
                "رمز التحقق مطلوب",
            ));
        }
        if code.len() != VERIFICATION_CODE_LEN || !code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::new(
                "verification_code",
                "رمز التحقق يجب أن يكون 6 أرقام",
            ));
        }
        Ok(())
    }

    pub fn validate_rating(rating: f64) -> Result<(), ValidationError> {
        if !(RATING_MIN..=RATING_MAX).contains(&rating) {
            return Err(ValidationError::new(
                "rating",
                "التقييم يجب أن يكون بين 1 و 5",
            ));
        }
        Ok(())
    }

    pub fn validate_content(content: &str) -> Result<(), ValidationError> {
        validate_required(content, "content", "المحتوى مطلوب")
    }
}
