//! Typed HTTP client for the course platform API.
//!
//! All requests are authenticated with a `Session-Token` header and return
//! validated, explicitly typed responses. A response that doesn't match the
//! expected shape fails fast with [`ApiError::MalformedResponse`] instead of
//! surfacing as a missing-key fault somewhere downstream.

use crate::error::ApiError;
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// One course as returned by the course list endpoint.
///
/// The platform omits fields for unpublished courses, so everything here is
/// optional; entries missing a product code or active version are skipped.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub product_code: Option<String>,
    pub name: Option<String>,
    pub active_version: Option<String>,
    pub active_version_id: Option<i64>,
    pub authors: Option<String>,
    pub active_version_change_log: Option<String>,
}

/// Course version detail: the ordered flat section list.
#[derive(Debug, Clone, Deserialize)]
pub struct CourseVersion {
    pub sections: Vec<RawSection>,
}

/// One section as returned by the course version endpoint, before
/// reconciliation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSection {
    pub id: i64,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub prev_version_section_id: Option<i64>,
}

/// Boundary trait for the course platform, so sync logic can be exercised
/// against a test double.
#[async_trait]
pub trait CourseApi: Send + Sync {
    /// Fetches the full course list.
    async fn list_courses(&self) -> Result<Vec<Course>, ApiError>;

    /// Fetches the section list for a course version.
    async fn course_version(&self, version_id: &str) -> Result<CourseVersion, ApiError>;

    /// Fetches the rendered HTML of a TEXT section.
    async fn section_html(&self, section_id: i64) -> Result<String, ApiError>;

    /// Fetches raw image bytes from an absolute URL.
    async fn image_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError>;
}

/// reqwest-backed [`CourseApi`] implementation.
pub struct PlatformClient {
    client: reqwest::Client,
    base_url: String,
    session_token: String,
}

impl PlatformClient {
    /// Creates a client for the given API base URL and session token.
    pub fn new(base_url: &str, session_token: &str) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session_token: session_token.to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Issues a GET request and returns the successful response.
    async fn get(&self, url: &str) -> Result<reqwest::Response, ApiError> {
        let response = self
            .client
            .get(url)
            .header("Session-Token", &self.session_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::Status {
                status: response.status(),
                url: url.to_string(),
            });
        }

        Ok(response)
    }

    /// Issues a GET request and deserializes the JSON body, mapping decode
    /// failures to a malformed-response error that names the URL.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path);
        let body = self.get(&url).await?.text().await?;

        serde_json::from_str(&body).map_err(|e| ApiError::MalformedResponse {
            url,
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl CourseApi for PlatformClient {
    async fn list_courses(&self) -> Result<Vec<Course>, ApiError> {
        self.get_json("courses/courses").await
    }

    async fn course_version(&self, version_id: &str) -> Result<CourseVersion, ApiError> {
        self.get_json(&format!("courses/course-versions/{}", version_id))
            .await
    }

    async fn section_html(&self, section_id: i64) -> Result<String, ApiError> {
        let url = self.endpoint(&format!("courses/text/{}", section_id));
        Ok(self.get(&url).await?.text().await?)
    }

    async fn image_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        Ok(self.get(url).await?.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_join() {
        let client = PlatformClient::new("https://api.example.com/api/", "token").unwrap();
        assert_eq!(
            client.endpoint("courses/courses"),
            "https://api.example.com/api/courses/courses"
        );
        assert_eq!(
            client.endpoint("/courses/text/5"),
            "https://api.example.com/api/courses/text/5"
        );
    }

    #[test]
    fn test_course_deserialization() {
        let json = r#"{
            "productCode": "ontologics-sobr",
            "name": "Рациональная работа",
            "activeVersion": "2024-05",
            "activeVersionId": 317,
            "authors": "Прапион Медведева",
            "activeVersionChangeLog": "Минорные правки"
        }"#;

        let course: Course = serde_json::from_str(json).unwrap();
        assert_eq!(course.product_code.as_deref(), Some("ontologics-sobr"));
        assert_eq!(course.active_version.as_deref(), Some("2024-05"));
        assert_eq!(course.active_version_id, Some(317));
    }

    #[test]
    fn test_course_with_missing_fields() {
        // Unpublished courses come back with most fields absent.
        let course: Course = serde_json::from_str("{}").unwrap();
        assert!(course.product_code.is_none());
        assert!(course.active_version.is_none());
    }

    #[test]
    fn test_course_version_deserialization() {
        let json = r#"{
            "sections": [
                {"id": 11, "title": "1. Основы", "type": "HEADER", "prevVersionSectionId": 7},
                {"id": 12, "title": "2. Обзор", "type": "TEXT", "prevVersionSectionId": null}
            ]
        }"#;

        let version: CourseVersion = serde_json::from_str(json).unwrap();
        assert_eq!(version.sections.len(), 2);
        assert_eq!(version.sections[0].kind, "HEADER");
        assert_eq!(version.sections[0].prev_version_section_id, Some(7));
        assert_eq!(version.sections[1].prev_version_section_id, None);
    }

    #[test]
    fn test_malformed_course_version() {
        // Sections must be an array; anything else is a malformed response.
        let result: Result<CourseVersion, _> = serde_json::from_str(r#"{"sections": 3}"#);
        assert!(result.is_err());
    }
}
