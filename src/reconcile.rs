//! Hierarchical reconciliation of fetched sections against the stored tree.
//!
//! Sections are identified by their source-language title, not by platform
//! section id: ids are not stable across course versions, titles mostly are.
//! A section whose normalized title and kind match a previously stored node
//! keeps that node's translated title and slug verbatim, so published URLs
//! never churn just because the translation model changed its mind. Only
//! genuinely new titles go to the translator.

use crate::api::RawSection;
use crate::console::Console;
use crate::structure::{Section, SectionKind, find_section};
use crate::translator::TitleTranslator;
use regex::Regex;
use std::sync::LazyLock;

/// Leading ordinal prefix like "3. " on upstream section titles.
static ORDINAL_PREFIX_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s*").expect("Invalid ORDINAL_PREFIX_REGEX"));

/// Strips a leading "N. " ordinal prefix from a title, if present.
pub fn normalize_title(title: &str) -> String {
    ORDINAL_PREFIX_REGEX.replace(title, "").into_owned()
}

/// Derives a URL-safe slug from a translated title: lowercase, alphanumeric
/// runs joined by single hyphens, apostrophes dropped outright.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(c.to_ascii_lowercase());
            pending_hyphen = false;
        } else if c != '\'' {
            pending_hyphen = true;
        }
    }

    slug
}

/// Builds one reconciled section from a raw upstream section.
///
/// Returns `None` when the section is new and translation fails; the caller
/// skips it and continues with the rest of the list.
async fn build_section(
    raw: &RawSection,
    old_sections: &[Section],
    translator: &dyn TitleTranslator,
    context: &str,
    console: &Console,
) -> Option<Section> {
    let kind = SectionKind::from(raw.kind.clone());
    let title_ru = normalize_title(&raw.title);

    // Reuse stable fields from the previous sync when the title is unchanged.
    // Only the platform section id is refreshed; position in the tree is
    // recomputed from the new list regardless.
    if let Some(old) = find_section(old_sections, &title_ru, &kind) {
        return Some(Section {
            kind: old.kind.clone(),
            title_ru: old.title_ru.clone(),
            title_en: old.title_en.clone(),
            slug: old.slug.clone(),
            section_id: raw.id,
            children: None,
            images: old.images.clone(),
        });
    }

    let title_en = match translator.translate_title(&title_ru, context).await {
        Ok(translated) => translated,
        Err(e) => {
            console.error(&format!("Could not translate title '{}': {}", title_ru, e));
            return None;
        }
    };

    Some(Section {
        kind,
        slug: slugify(&title_en),
        title_ru,
        title_en,
        section_id: raw.id,
        children: None,
        images: None,
    })
}

/// Builds the two-level section hierarchy from the flat upstream list.
///
/// Every HEADER starts a new top-level node and collects the non-HEADER
/// sections that follow it as children. Non-HEADER sections appearing before
/// any header stay at the top level. Deeper nesting is not modeled.
pub async fn build_structure(
    raw_sections: &[RawSection],
    old_sections: &[Section],
    translator: &dyn TitleTranslator,
    console: &Console,
) -> Vec<Section> {
    let mut result: Vec<Section> = Vec::new();
    let mut current_header: Option<usize> = None;

    for raw in raw_sections {
        // The enclosing header, if any, doubles as translation context.
        let context = current_header
            .and_then(|i| result.get(i))
            .map(|header| header.title_ru.clone())
            .unwrap_or_default();

        let Some(mut section) =
            build_section(raw, old_sections, translator, &context, console).await
        else {
            continue;
        };

        if section.kind.is_header() {
            section.children = Some(Vec::new());
            result.push(section);
            current_header = Some(result.len() - 1);
        } else if let Some(i) = current_header {
            result[i].children.get_or_insert_with(Vec::new).push(section);
        } else {
            result.push(section);
        }
    }

    result
}
