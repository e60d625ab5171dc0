//! Management requests and their identifiers.
//!
//! Identifiers look like `CGRS-MAINT-20240315-7Q2K`: a prefix, the category
//! abbreviation, the submission date and four random characters from the OS
//! RNG. Ids are not checked against earlier submissions.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, NaiveDate, Utc};
use rand::rngs::OsRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::forms::{
    validate_management_request_with, FieldErrors, ManagementRequestForm, PhotoLimits, PhotoUpload,
};
use crate::task::GeoPoint;

pub const DEFAULT_ID_PREFIX: &str = "CGRS";
pub const FALLBACK_ABBREVIATION: &str = "REQ";
const SUFFIX_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const SUFFIX_LEN: usize = 4;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ManagementCategory {
    Maintenance,
    Landscaping,
    Security,
    Noise,
    Parking,
    Amenities,
    Billing,
    General,
}

impl ManagementCategory {
    pub const ALL: [ManagementCategory; 8] = [
        ManagementCategory::Maintenance,
        ManagementCategory::Landscaping,
        ManagementCategory::Security,
        ManagementCategory::Noise,
        ManagementCategory::Parking,
        ManagementCategory::Amenities,
        ManagementCategory::Billing,
        ManagementCategory::General,
    ];

    pub fn id(self) -> &'static str {
        match self {
            ManagementCategory::Maintenance => "maintenance",
            ManagementCategory::Landscaping => "landscaping",
            ManagementCategory::Security => "security",
            ManagementCategory::Noise => "noise",
            ManagementCategory::Parking => "parking",
            ManagementCategory::Amenities => "amenities",
            ManagementCategory::Billing => "billing",
            ManagementCategory::General => "general",
        }
    }

    pub fn abbreviation(self) -> &'static str {
        match self {
            ManagementCategory::Maintenance => "MAINT",
            ManagementCategory::Landscaping => "LAND",
            ManagementCategory::Security => "SEC",
            ManagementCategory::Noise => "NOISE",
            ManagementCategory::Parking => "PARK",
            ManagementCategory::Amenities => "AMEN",
            ManagementCategory::Billing => "BILL",
            ManagementCategory::General => "GEN",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ManagementCategory::Maintenance => "Maintenance & Repairs",
            ManagementCategory::Landscaping => "Landscaping & Grounds",
            ManagementCategory::Security => "Security Concern",
            ManagementCategory::Noise => "Noise Complaint",
            ManagementCategory::Parking => "Parking",
            ManagementCategory::Amenities => "Amenities",
            ManagementCategory::Billing => "Billing & Fees",
            ManagementCategory::General => "General Inquiry",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        let id = id.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.id().eq_ignore_ascii_case(id))
    }
}

impl fmt::Display for ManagementCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ManagementCategory {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        Self::from_id(value)
            .ok_or_else(|| Error::InvalidArgument(format!("unknown request category '{value}'")))
    }
}

/// Abbreviation for a category id; unknown ids map to `REQ`.
pub fn abbreviation_for(category_id: &str) -> &'static str {
    ManagementCategory::from_id(category_id)
        .map(ManagementCategory::abbreviation)
        .unwrap_or(FALLBACK_ABBREVIATION)
}

/// Which calendar the date segment follows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateBasis {
    #[default]
    Utc,
    Local,
}

impl DateBasis {
    pub fn date_of(self, instant: DateTime<Utc>) -> NaiveDate {
        match self {
            DateBasis::Utc => instant.date_naive(),
            DateBasis::Local => instant.with_timezone(&Local).date_naive(),
        }
    }
}

fn random_suffix() -> String {
    let mut rng = OsRng;
    (0..SUFFIX_LEN)
        .map(|_| SUFFIX_CHARSET[rng.gen_range(0..SUFFIX_CHARSET.len())] as char)
        .collect()
}

/// Format an id for a category on a given date.
pub fn generate_request_id(category_id: &str, date: NaiveDate) -> String {
    RequestIdGenerator::default().id_for_date(category_id, date)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestIdGenerator {
    prefix: String,
    basis: DateBasis,
}

impl Default for RequestIdGenerator {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_ID_PREFIX.to_string(),
            basis: DateBasis::Utc,
        }
    }
}

impl RequestIdGenerator {
    pub fn new(prefix: impl Into<String>, basis: DateBasis) -> Self {
        Self {
            prefix: prefix.into(),
            basis,
        }
    }

    pub fn basis(&self) -> DateBasis {
        self.basis
    }

    pub fn id_for_date(&self, category_id: &str, date: NaiveDate) -> String {
        format!(
            "{}-{}-{}-{}",
            self.prefix,
            abbreviation_for(category_id),
            date.format("%Y%m%d"),
            random_suffix()
        )
    }

    /// Id for a submission at `submitted_at`, dated per the configured basis.
    pub fn id_at(&self, category_id: &str, submitted_at: DateTime<Utc>) -> String {
        self.id_for_date(category_id, self.basis.date_of(submitted_at))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagementRequest {
    pub id: String,
    pub category: ManagementCategory,
    pub full_name: String,
    pub email: String,
    pub subject: String,
    pub description: String,
    #[serde(default)]
    pub photos: Vec<PhotoUpload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    pub submitted_at: DateTime<Utc>,
}

impl ManagementRequest {
    /// Validate the form and build the request, or hand back the field errors.
    pub fn submit(
        form: &ManagementRequestForm,
        generator: &RequestIdGenerator,
        limits: PhotoLimits,
        submitted_at: DateTime<Utc>,
    ) -> std::result::Result<Self, FieldErrors> {
        let errors = validate_management_request_with(form, limits);
        let category = match ManagementCategory::from_id(&form.category) {
            Some(category) if errors.is_valid() => category,
            _ => return Err(errors),
        };

        let request = Self {
            id: generator.id_at(category.id(), submitted_at),
            category,
            full_name: form.full_name.trim().to_string(),
            email: form.email.trim().to_string(),
            subject: form.subject.trim().to_string(),
            description: form.description.trim().to_string(),
            photos: form.photos.clone(),
            location: form.location,
            submitted_at,
        };
        tracing::info!(id = %request.id, category = %category, "management request submitted");
        Ok(request)
    }
}
