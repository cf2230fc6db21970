// Estructuras de datos principales

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Una fila del catálogo de cursos (`courseId,courseName,semester`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseCatalogEntry {
    pub course_id: String,
    pub course_name: String,
}

/// Payload enviado al proceso recomendador por stdin.
///
/// Siempre se construye con `api_json::sanitize_request`, nunca se persiste.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisorRequest {
    pub current_semester: i64,
    pub passed_courses: Vec<String>,
    pub failed_courses: Vec<String>,
    pub low_grade_courses: Vec<String>,
    pub gpa: f64,
    pub warning_count: i64,
    pub credit_earned: i64,
    pub max_courses: i64,
}

impl Default for AdvisorRequest {
    fn default() -> Self {
        AdvisorRequest {
            current_semester: 0,
            passed_courses: Vec::new(),
            failed_courses: Vec::new(),
            low_grade_courses: Vec::new(),
            gpa: 0.0,
            warning_count: 0,
            credit_earned: 0,
            max_courses: 5,
        }
    }
}

/// A ranked course produced by the recommendation process. Only `courseId`
/// and `courseName` are required; anything else the process emits is kept
/// in `extra` and echoed back to the client untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub course_id: String,
    pub course_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_core: Option<bool>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Recommendation {
    pub fn new(course_id: impl Into<String>, course_name: impl Into<String>) -> Self {
        Recommendation {
            course_id: course_id.into(),
            course_name: course_name.into(),
            score: None,
            is_core: None,
            extra: serde_json::Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub recommendations: Vec<Recommendation>,
}

// --- Feed ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostAuthor {
    pub name: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub uid: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostType {
    #[default]
    Announcement,
    Event,
    News,
    Update,
}

impl PostType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostType::Announcement => "announcement",
            PostType::Event => "event",
            PostType::News => "news",
            PostType::Update => "update",
        }
    }

    pub fn parse(s: &str) -> Option<PostType> {
        match s {
            "announcement" => Some(PostType::Announcement),
            "event" => Some(PostType::Event),
            "news" => Some(PostType::News),
            "update" => Some(PostType::Update),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub author: PostAuthor,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub likes: u32,
    pub liked_by: Vec<String>,
    pub comments: u32,
    pub is_pinned: bool,
    #[serde(rename = "type")]
    pub post_type: PostType,
}

/// Resultado de `toggle_like`: contador nuevo y si el usuario quedó con like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeOutcome {
    pub likes: u32,
    pub is_liked: bool,
}

// --- Recursos ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceType {
    #[serde(rename = "Past Paper")]
    PastPaper,
    #[serde(rename = "Study Guide")]
    StudyGuide,
    #[serde(rename = "Notes")]
    Notes,
    #[serde(rename = "Practice Set")]
    PracticeSet,
    #[serde(rename = "Official Document")]
    OfficialDocument,
}

impl ResourceType {
    pub const ALL: [ResourceType; 5] = [
        ResourceType::PastPaper,
        ResourceType::StudyGuide,
        ResourceType::Notes,
        ResourceType::PracticeSet,
        ResourceType::OfficialDocument,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::PastPaper => "Past Paper",
            ResourceType::StudyGuide => "Study Guide",
            ResourceType::Notes => "Notes",
            ResourceType::PracticeSet => "Practice Set",
            ResourceType::OfficialDocument => "Official Document",
        }
    }

    pub fn parse(s: &str) -> Option<ResourceType> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceCategory {
    #[serde(rename = "Entry Test")]
    EntryTest,
    Mathematics,
    English,
    #[serde(rename = "CS")]
    Cs,
    Analytical,
    General,
}

impl ResourceCategory {
    pub const ALL: [ResourceCategory; 6] = [
        ResourceCategory::EntryTest,
        ResourceCategory::Mathematics,
        ResourceCategory::English,
        ResourceCategory::Cs,
        ResourceCategory::Analytical,
        ResourceCategory::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceCategory::EntryTest => "Entry Test",
            ResourceCategory::Mathematics => "Mathematics",
            ResourceCategory::English => "English",
            ResourceCategory::Cs => "CS",
            ResourceCategory::Analytical => "Analytical",
            ResourceCategory::General => "General",
        }
    }

    pub fn parse(s: &str) -> Option<ResourceCategory> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

impl fmt::Display for ResourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub category: ResourceCategory,
    pub subject: String,
    pub date: String,
    pub size: String,
    pub icon: String,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- Tour virtual ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TourLocation {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image: String,
    pub icon: String,
    pub order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- Usuarios ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    #[default]
    Student,
}

impl UserRole {
    /// Where a freshly signed-in user is sent.
    pub fn landing_path(&self) -> &'static str {
        match self {
            UserRole::Admin => "/admin",
            UserRole::Student => "/dashboard",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Student => "student",
        }
    }

    pub fn parse(s: &str) -> UserRole {
        if s.eq_ignore_ascii_case("admin") { UserRole::Admin } else { UserRole::Student }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub uid: String,
    pub name: String,
    pub email: String,
    pub email_verified: bool,
    #[serde(default, rename = "photoURL", skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- Chat ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}
