//! Persisted course structure model and YAML storage.
//!
//! One YAML document per course holds the section tree with stable slugs and
//! translated titles. Documents are rewritten wholesale on each sync; a
//! missing or unreadable document is treated as "no prior state".

use crate::console::Console;
use crate::error::StructureError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Kind of a section as reported by the course platform.
///
/// Serialized as the upstream string so unknown kinds survive a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SectionKind {
    Header,
    Text,
    Other(String),
}

impl From<String> for SectionKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "HEADER" => SectionKind::Header,
            "TEXT" => SectionKind::Text,
            _ => SectionKind::Other(value),
        }
    }
}

impl From<SectionKind> for String {
    fn from(kind: SectionKind) -> Self {
        match kind {
            SectionKind::Header => "HEADER".to_string(),
            SectionKind::Text => "TEXT".to_string(),
            SectionKind::Other(value) => value,
        }
    }
}

impl SectionKind {
    pub fn is_header(&self) -> bool {
        matches!(self, SectionKind::Header)
    }

    pub fn is_text(&self) -> bool {
        matches!(self, SectionKind::Text)
    }
}

/// A tracked image inside a TEXT section.
///
/// Identity is the content hash: two paths serving identical bytes are the
/// same record, and the path is refreshed in place when it renames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Basename of the image file.
    pub filename: String,
    /// Source path as referenced by the section HTML.
    pub path: String,
    /// Hex-encoded SHA-256 of the fetched bytes.
    pub hash: String,
    /// Caption in the source language (filled in manually later).
    #[serde(default)]
    pub title_ru: String,
    /// Caption in the target language (filled in manually later).
    #[serde(default)]
    pub title_en: String,
}

/// One unit of course content: a header or a text block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    #[serde(rename = "type")]
    pub kind: SectionKind,
    /// Title in the source language, ordinal prefix stripped.
    pub title_ru: String,
    /// Translated title. Stable once assigned.
    pub title_en: String,
    /// URL-safe identifier derived from the translated title. Stable once
    /// assigned.
    pub slug: String,
    /// Platform section id. Refreshed every sync; not stable across versions.
    pub section_id: i64,
    /// Child sections. Only HEADER sections carry children.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Section>>,
    /// Tracked images. Only TEXT sections carry images.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<ImageRecord>>,
}

/// The persisted per-course document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseStructure {
    /// Site course identifier (the mapped name).
    pub course_id: String,
    /// Product code on the course platform.
    pub original_course_id: String,
    /// Human-readable course name.
    pub course_name: String,
    /// Version label of the last successful sync.
    pub version: String,
    /// Platform version identifier.
    pub version_id: String,
    /// Top-level section tree (two levels deep at most).
    pub sections: Vec<Section>,
}

impl CourseStructure {
    /// Path of the document for a course inside `dir`.
    pub fn path_for(dir: &Path, course_id: &str) -> PathBuf {
        dir.join(format!("{}.yaml", course_id))
    }

    /// Loads a previously persisted structure.
    ///
    /// Returns `None` when the file doesn't exist or doesn't parse; prior
    /// state is best-effort and an unreadable document just means a full
    /// re-translation.
    pub fn load(path: &Path, console: &Console) -> Option<CourseStructure> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => return None,
        };

        match serde_yaml::from_str(&content) {
            Ok(structure) => Some(structure),
            Err(e) => {
                console.warning(&format!(
                    "Ignoring unreadable structure file {}: {}",
                    path.display(),
                    e
                ));
                None
            }
        }
    }

    /// Writes the structure, replacing any previous document.
    pub fn save(&self, path: &Path) -> Result<(), StructureError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Finds a section by source-language title and kind, depth first in
/// document order.
///
/// Uses an explicit stack rather than recursion; the tree is only two levels
/// deep today but the lookup shouldn't care.
pub fn find_section<'a>(
    sections: &'a [Section],
    title_ru: &str,
    kind: &SectionKind,
) -> Option<&'a Section> {
    let mut stack: Vec<&Section> = sections.iter().rev().collect();

    while let Some(section) = stack.pop() {
        if section.title_ru == title_ru && section.kind == *kind {
            return Some(section);
        }
        if let Some(children) = &section.children {
            for child in children.iter().rev() {
                stack.push(child);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn section(kind: SectionKind, title_ru: &str, id: i64) -> Section {
        Section {
            kind,
            title_ru: title_ru.to_string(),
            title_en: format!("{} (en)", title_ru),
            slug: title_ru.to_lowercase(),
            section_id: id,
            children: None,
            images: None,
        }
    }

    fn sample_tree() -> Vec<Section> {
        let mut header = section(SectionKind::Header, "Основы", 1);
        header.children = Some(vec![
            section(SectionKind::Text, "Обзор", 2),
            section(SectionKind::Text, "Детали", 3),
        ]);
        vec![header, section(SectionKind::Text, "Приложение", 4)]
    }

    #[test]
    fn test_kind_round_trip() {
        assert_eq!(SectionKind::from("HEADER".to_string()), SectionKind::Header);
        assert_eq!(SectionKind::from("TEXT".to_string()), SectionKind::Text);
        assert_eq!(
            SectionKind::from("QUIZ".to_string()),
            SectionKind::Other("QUIZ".to_string())
        );
        assert_eq!(String::from(SectionKind::Header), "HEADER");
        assert_eq!(String::from(SectionKind::Other("QUIZ".to_string())), "QUIZ");
    }

    #[test]
    fn test_find_section_top_level() {
        let tree = sample_tree();
        let found = find_section(&tree, "Приложение", &SectionKind::Text).unwrap();
        assert_eq!(found.section_id, 4);
    }

    #[test]
    fn test_find_section_in_children() {
        let tree = sample_tree();
        let found = find_section(&tree, "Детали", &SectionKind::Text).unwrap();
        assert_eq!(found.section_id, 3);
    }

    #[test]
    fn test_find_section_kind_constrained() {
        let tree = sample_tree();
        // Same title, wrong kind: no match.
        assert!(find_section(&tree, "Основы", &SectionKind::Text).is_none());
        assert!(find_section(&tree, "Основы", &SectionKind::Header).is_some());
    }

    #[test]
    fn test_find_section_document_order() {
        // A child earlier in document order wins over a later top-level node.
        let mut header = section(SectionKind::Header, "Глава", 1);
        header.children = Some(vec![section(SectionKind::Text, "Дубль", 2)]);
        let tree = vec![header, section(SectionKind::Text, "Дубль", 9)];

        let found = find_section(&tree, "Дубль", &SectionKind::Text).unwrap();
        assert_eq!(found.section_id, 2);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let console = Console::with_colors(false);
        let path = CourseStructure::path_for(dir.path(), "nope");
        assert!(CourseStructure::load(&path, &console).is_none());
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = tempdir().unwrap();
        let console = Console::with_colors(false);
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "{ not yaml: [").unwrap();
        assert!(CourseStructure::load(&path, &console).is_none());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let console = Console::with_colors(false);

        let structure = CourseStructure {
            course_id: "rational-work".to_string(),
            original_course_id: "ontologics-sobr".to_string(),
            course_name: "Rational Work".to_string(),
            version: "2024-05".to_string(),
            version_id: "317".to_string(),
            sections: sample_tree(),
        };

        let path = CourseStructure::path_for(dir.path(), &structure.course_id);
        structure.save(&path).unwrap();

        let loaded = CourseStructure::load(&path, &console).unwrap();
        assert_eq!(loaded, structure);
    }
}
