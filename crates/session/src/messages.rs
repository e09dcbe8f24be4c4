//! Localized notification texts
//!
//! Failure texts are only used when the server response carries no `error`
//! field of its own.

pub const LOGIN_SUCCESS: &str = "تم تسجيل الدخول بنجاح";
pub const LOGIN_FAILED: &str = "حدث خطأ في تسجيل الدخول";

pub const REGISTER_SUCCESS: &str = "تم إنشاء الحساب بنجاح. يرجى التحقق من بريدك الإلكتروني";
pub const REGISTER_FAILED: &str = "حدث خطأ في إنشاء الحساب";

pub const VERIFY_SUCCESS: &str = "تم تفعيل الحساب بنجاح";
pub const VERIFY_FAILED: &str = "حدث خطأ في تفعيل الحساب";

pub const RESEND_SUCCESS: &str = "تم إرسال رمز التحقق الجديد";
pub const RESEND_FAILED: &str = "حدث خطأ في إرسال رمز التحقق";

pub const PROFILE_UPDATE_SUCCESS: &str = "تم تحديث الملف الشخصي بنجاح";
pub const PROFILE_UPDATE_FAILED: &str = "حدث خطأ في تحديث الملف الشخصي";

pub const LOGOUT_SUCCESS: &str = "تم تسجيل الخروج بنجاح";

/// Shown when a response arrived but could not be stored locally
pub const STORAGE_FAILED: &str = "تعذر حفظ بيانات الجلسة";
