//! Coursesync - course structure synchronizer.
//!
//! This library provides functionality for:
//! - Fetching course version metadata from the course platform API
//! - Reconciling fetched sections with the stored YAML structure, keeping
//!   translated titles and slugs stable across course versions
//! - Tracking section images by content hash
//! - Translating new section titles using OpenAI-compatible APIs

pub mod api;
pub mod config;
pub mod console;
pub mod error;
pub mod images;
pub mod mapping;
pub mod reconcile;
pub mod structure;
pub mod sync;
pub mod translator;

// Re-export commonly used types
pub use api::{Course, CourseApi, CourseVersion, PlatformClient, RawSection};
pub use config::Config;
pub use console::Console;
pub use error::{ApiError, ConfigError, StructureError, TranslationError};
pub use structure::{CourseStructure, ImageRecord, Section, SectionKind};
pub use sync::{CourseListing, CourseRef, SyncOutcome};
pub use translator::{TitleTranslator, Translator};
