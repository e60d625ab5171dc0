//! cgrs request command implementation
//!
//! Validates a management request, stamps it with an id and reports it.
//! Photos are checked by name and size on disk; their contents are not read.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::forms::{ManagementRequestForm, PhotoUpload};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::request::{abbreviation_for, ManagementCategory, ManagementRequest};
use crate::task::GeoPoint;

/// Options for `cgrs request submit`
pub struct SubmitOptions {
    pub category: String,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub description: String,
    pub photos: Vec<PathBuf>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

/// Options for `cgrs request id`
pub struct IdOptions {
    pub category: String,
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestIdReport<'a> {
    id: String,
    category: &'a str,
    abbreviation: &'static str,
    known_category: bool,
}

pub fn run_submit(options: SubmitOptions) -> Result<()> {
    let storage = super::open_storage(options.dir.as_deref());
    let config = storage.config();

    let photos = options
        .photos
        .iter()
        .map(|path| photo_upload(path))
        .collect::<Result<Vec<_>>>()?;
    let location = match (options.lat, options.lng) {
        (Some(lat), Some(lng)) => Some(GeoPoint { lat, lng }),
        _ => None,
    };

    let form = ManagementRequestForm {
        category: options.category,
        full_name: options.name,
        email: options.email,
        subject: options.subject,
        description: options.description,
        photos,
        location,
    };

    let request = ManagementRequest::submit(
        &form,
        &config.id_generator(),
        config.photo_limits(),
        Utc::now(),
    )
    .map_err(Error::Validation)?;

    if config.requests.submission_delay_ms > 0 {
        std::thread::sleep(Duration::from_millis(config.requests.submission_delay_ms));
    }

    let mut human = HumanOutput::new(format!("cgrs request submitted: {}", request.id));
    human.push_summary("category", request.category.label());
    human.push_summary("subject", request.subject.clone());
    human.push_summary("from", format!("{} <{}>", request.full_name, request.email));
    if !request.photos.is_empty() {
        human.push_summary("photos", request.photos.len().to_string());
    }
    human.push_next_step(format!("keep {} for follow-up with management", request.id));

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "request submit",
        &request,
        Some(&human),
    )
}

pub fn run_id(options: IdOptions) -> Result<()> {
    let storage = super::open_storage(options.dir.as_deref());
    let generator = storage.config().id_generator();

    let known_category = ManagementCategory::from_id(&options.category).is_some();
    let report = RequestIdReport {
        id: generator.id_at(&options.category, Utc::now()),
        category: options.category.trim(),
        abbreviation: abbreviation_for(&options.category),
        known_category,
    };

    let mut human = HumanOutput::new(report.id.clone());
    if !known_category {
        human.push_warning(format!(
            "unknown category '{}'; using {}",
            report.category, report.abbreviation
        ));
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "request id",
        &report,
        Some(&human),
    )
}

fn photo_upload(path: &Path) -> Result<PhotoUpload> {
    let metadata = std::fs::metadata(path).map_err(|err| {
        Error::InvalidArgument(format!("cannot read photo {}: {err}", path.display()))
    })?;
    if !metadata.is_file() {
        return Err(Error::InvalidArgument(format!(
            "photo {} is not a file",
            path.display()
        )));
    }
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(PhotoUpload {
        name,
        size_bytes: metadata.len(),
    })
}
