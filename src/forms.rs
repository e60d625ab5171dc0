//! Form validators for the resident-facing forms.
//!
//! Each validator is a pure function from raw field values to [`FieldErrors`].
//! A field carries at most one message: rules run in a fixed order and the
//! first failure wins. An empty map means the form is valid.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::request::ManagementCategory;

/// Largest accepted photo, in bytes.
pub const MAX_PHOTO_BYTES: u64 = 5 * 1024 * 1024;
pub const MAX_PHOTOS: usize = 5;
pub const MIN_PASSWORD_LEN: usize = 8;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9+\-() ]{7,20}$").expect("phone pattern compiles"));

/// Field name to error message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` for `field` unless it already has one.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    fn check(&mut self, field: &'static str, result: Option<String>) {
        if let Some(message) = result {
            self.add(field, message);
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_valid(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

fn required_length(value: &str, label: &str, min: usize, max: usize) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(format!("{label} is required"));
    }
    let len = trimmed.chars().count();
    if len < min {
        return Some(format!("{label} must be at least {min} characters"));
    }
    if len > max {
        return Some(format!("{label} must be at most {max} characters"));
    }
    None
}

fn required_email(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some("Email is required".to_string());
    }
    if !is_valid_email(trimmed) {
        return Some("Please enter a valid email address".to_string());
    }
    None
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// A photo attached to a request, before upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoUpload {
    pub name: String,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhotoLimits {
    pub max_photos: usize,
    pub max_bytes: u64,
}

impl Default for PhotoLimits {
    fn default() -> Self {
        Self {
            max_photos: MAX_PHOTOS,
            max_bytes: MAX_PHOTO_BYTES,
        }
    }
}

fn photos_rule(photos: &[PhotoUpload], limits: PhotoLimits) -> Option<String> {
    if photos.len() > limits.max_photos {
        return Some(format!("You can attach at most {} photos", limits.max_photos));
    }
    if let Some(photo) = photos.iter().find(|photo| photo.size_bytes > limits.max_bytes) {
        return Some(format!(
            "{} is larger than {} MB",
            photo.name,
            limits.max_bytes / (1024 * 1024)
        ));
    }
    None
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagementRequestForm {
    pub category: String,
    pub full_name: String,
    pub email: String,
    pub subject: String,
    pub description: String,
    #[serde(default)]
    pub photos: Vec<PhotoUpload>,
    #[serde(default)]
    pub location: Option<crate::task::GeoPoint>,
}

pub fn validate_management_request(form: &ManagementRequestForm) -> FieldErrors {
    validate_management_request_with(form, PhotoLimits::default())
}

pub fn validate_management_request_with(
    form: &ManagementRequestForm,
    limits: PhotoLimits,
) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if form.category.trim().is_empty() {
        errors.add("category", "Please select a category");
    } else if ManagementCategory::from_id(&form.category).is_none() {
        errors.add("category", "Please select a valid category");
    }
    errors.check("fullName", required_length(&form.full_name, "Full name", 2, 100));
    errors.check("email", required_email(&form.email));
    errors.check("subject", required_length(&form.subject, "Subject", 5, 150));
    errors.check(
        "description",
        required_length(&form.description, "Description", 20, 2000),
    );
    errors.check("photos", photos_rule(&form.photos, limits));
    errors
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub subject: String,
    pub message: String,
}

pub fn validate_contact(form: &ContactForm) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.check("name", required_length(&form.name, "Name", 2, 100));
    errors.check("email", required_email(&form.email));
    let phone = form.phone.trim();
    if !phone.is_empty() && !PHONE_RE.is_match(phone) {
        errors.add("phone", "Please enter a valid phone number");
    }
    errors.check("subject", required_length(&form.subject, "Subject", 5, 150));
    errors.check("message", required_length(&form.message, "Message", 10, 2000));
    errors
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

pub fn validate_login(form: &LoginForm) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.check("email", required_email(&form.email));
    if form.password.is_empty() {
        errors.add("password", "Password is required");
    } else if form.password.chars().count() < MIN_PASSWORD_LEN {
        errors.add(
            "password",
            format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
        );
    }
    errors
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    pub full_name: String,
    pub email: String,
    pub unit: String,
    pub password: String,
    pub confirm_password: String,
    #[serde(default)]
    pub accept_terms: bool,
}

pub fn validate_registration(form: &RegistrationForm) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.check("fullName", required_length(&form.full_name, "Full name", 2, 100));
    errors.check("email", required_email(&form.email));

    let unit = form.unit.trim();
    if unit.is_empty() {
        errors.add("unit", "Unit number is required");
    } else if unit.chars().count() > 20 {
        errors.add("unit", "Unit number must be at most 20 characters");
    }

    let password = form.password.as_str();
    if password.is_empty() {
        errors.add("password", "Password is required");
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        errors.add(
            "password",
            format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
        );
    } else if !password.chars().any(|ch| ch.is_alphabetic())
        || !password.chars().any(|ch| ch.is_ascii_digit())
    {
        errors.add("password", "Password must contain a letter and a number");
    }

    if form.confirm_password.is_empty() {
        errors.add("confirmPassword", "Please confirm your password");
    } else if form.confirm_password != form.password {
        errors.add("confirmPassword", "Passwords do not match");
    }

    if !form.accept_terms {
        errors.add("acceptTerms", "You must accept the community terms");
    }
    errors
}
