//! Sync orchestration: version guard, fetch, reconcile, image pass, write.
//!
//! Processing is strictly sequential and per-course. The persisted document
//! is read once at the start and rewritten wholesale at the end; nothing is
//! appended and no file handle is held across network calls.

use crate::api::CourseApi;
use crate::console::Console;
use crate::images::resolve_images;
use crate::mapping::mapped_course_id;
use crate::reconcile::build_structure;
use crate::structure::{CourseStructure, Section};
use crate::translator::TitleTranslator;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Identifies the course being synced, as given on the command line.
#[derive(Debug, Clone)]
pub struct CourseRef {
    /// Site course identifier (already mapped).
    pub course_id: String,
    /// Product code on the course platform.
    pub original_course_id: String,
    /// Human-readable course name.
    pub course_name: String,
    /// Version label being synced.
    pub version: String,
    /// Platform version identifier.
    pub version_id: String,
}

/// Result of one sync invocation.
#[derive(Debug)]
pub enum SyncOutcome {
    /// The stored document already carries this version; nothing was done.
    Skipped { version: String },
    /// The document was rewritten.
    Written {
        path: PathBuf,
        section_count: usize,
    },
}

/// One whitelisted course from the course list endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseListing {
    /// Mapped site course id.
    pub course_id: String,
    /// Product code on the platform.
    pub product_code: String,
    /// Active version label.
    pub version: String,
    /// Active version identifier.
    pub version_id: i64,
}

/// Synchronizes one course's structure document.
///
/// Skips all work when the stored version label equals the requested one.
/// A failed metadata fetch is fatal and leaves the stored document
/// untouched; per-section translation and image failures degrade to a
/// partial (but still complete-tree) document.
pub async fn sync_course(
    course: &CourseRef,
    structures_dir: &Path,
    image_base_url: &str,
    api: &dyn CourseApi,
    translator: &dyn TitleTranslator,
    console: &Console,
) -> Result<SyncOutcome> {
    let path = CourseStructure::path_for(structures_dir, &course.course_id);
    let old = CourseStructure::load(&path, console);

    // Version guard: unchanged version label means zero work and zero writes.
    if let Some(old) = &old
        && old.version == course.version
    {
        return Ok(SyncOutcome::Skipped {
            version: course.version.clone(),
        });
    }

    let old_sections = old.map(|s| s.sections).unwrap_or_default();

    let version = api
        .course_version(&course.version_id)
        .await
        .context("Failed to fetch course version")?;

    console.info(&format!(
        "Fetched {} sections for version {}",
        version.sections.len(),
        course.version
    ));

    let mut sections = build_structure(&version.sections, &old_sections, translator, console).await;

    for section in &mut sections {
        refresh_section_images(section, image_base_url, api, console).await;
        if let Some(children) = &mut section.children {
            for child in children {
                refresh_section_images(child, image_base_url, api, console).await;
            }
        }
    }

    let structure = CourseStructure {
        course_id: course.course_id.clone(),
        original_course_id: course.original_course_id.clone(),
        course_name: course.course_name.clone(),
        version: course.version.clone(),
        version_id: course.version_id.clone(),
        sections,
    };

    structure
        .save(&path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(SyncOutcome::Written {
        section_count: structure.sections.len(),
        path,
    })
}

/// Refreshes the image records of a TEXT section from its rendered HTML.
///
/// A failed section-text fetch logs and leaves whatever records the
/// reconciler carried over from the previous sync.
async fn refresh_section_images(
    section: &mut Section,
    image_base_url: &str,
    api: &dyn CourseApi,
    console: &Console,
) {
    if !section.kind.is_text() {
        return;
    }

    let html = match api.section_html(section.section_id).await {
        Ok(html) => html,
        Err(e) => {
            console.error(&format!(
                "Could not fetch text of section '{}': {}",
                section.title_ru, e
            ));
            return;
        }
    };

    let known = section.images.take().unwrap_or_default();
    let images = resolve_images(&html, &known, image_base_url, api, console).await;
    section.images = Some(images);
}

/// Fetches the course list and filters it through the whitelist mapping.
///
/// Courses missing a product code or active version are skipped, as are
/// product codes absent from the mapping table.
pub async fn list_courses(api: &dyn CourseApi, console: &Console) -> Result<Vec<CourseListing>> {
    let courses = api
        .list_courses()
        .await
        .context("Failed to fetch course list")?;

    let mut listings = Vec::new();

    for course in courses {
        let (Some(product_code), Some(version), Some(version_id)) = (
            course.product_code,
            course.active_version,
            course.active_version_id,
        ) else {
            continue;
        };

        let Some(course_id) = mapped_course_id(&product_code) else {
            console.info(&format!("Skipping unmapped course: {}", product_code));
            continue;
        };

        listings.push(CourseListing {
            course_id: course_id.to_string(),
            product_code,
            version,
            version_id,
        });
    }

    Ok(listings)
}
