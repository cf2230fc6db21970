//! Biblioteca de recursos (past papers, guías, apuntes).

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::models::{Resource, ResourceCategory, ResourceType};

pub const DEFAULT_ICON: &str = "FileText";
pub const DEFAULT_COLOR: &str = "bg-blue-500";
pub const REQUIRED_FIELDS_MESSAGE: &str = "Title, type, category, subject, date, and size are required";

#[derive(Debug, Clone, PartialEq)]
pub struct NewResource {
    pub title: String,
    pub resource_type: ResourceType,
    pub category: ResourceCategory,
    pub subject: String,
    pub date: String,
    pub size: String,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub file_url: Option<String>,
}

impl NewResource {
    pub fn into_resource(self, id: String, now: DateTime<Utc>) -> Resource {
        Resource {
            id,
            title: self.title,
            resource_type: self.resource_type,
            category: self.category,
            subject: self.subject,
            date: self.date,
            size: self.size,
            icon: self.icon.filter(|s| !s.is_empty()).unwrap_or_else(|| DEFAULT_ICON.to_string()),
            color: self.color.filter(|s| !s.is_empty()).unwrap_or_else(|| DEFAULT_COLOR.to_string()),
            file_url: self.file_url.filter(|s| !s.is_empty()),
            created_at: now,
            updated_at: now,
        }
    }
}

fn text_field(body: &Value, key: &str) -> Option<String> {
    body.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Valida el body de `POST /api/resources`.
pub fn validate_new_resource(body: &Value) -> Result<NewResource, String> {
    let (Some(title), Some(kind), Some(category), Some(subject), Some(date), Some(size)) = (
        text_field(body, "title"),
        text_field(body, "type"),
        text_field(body, "category"),
        text_field(body, "subject"),
        text_field(body, "date"),
        text_field(body, "size"),
    ) else {
        return Err(REQUIRED_FIELDS_MESSAGE.to_string());
    };

    let resource_type = ResourceType::parse(&kind).ok_or_else(|| format!("Unknown resource type: {}", kind))?;
    let category = ResourceCategory::parse(&category).ok_or_else(|| format!("Unknown category: {}", category))?;

    Ok(NewResource {
        title,
        resource_type,
        category,
        subject,
        date,
        size,
        icon: text_field(body, "icon"),
        color: text_field(body, "color"),
        file_url: text_field(body, "fileUrl"),
    })
}

/// Body de `PATCH /api/resources/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourcePatch {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub resource_type: Option<ResourceType>,
    pub category: Option<ResourceCategory>,
    pub subject: Option<String>,
    pub date: Option<String>,
    pub size: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    /// `""` clears the URL.
    pub file_url: Option<String>,
}

impl ResourcePatch {
    pub fn apply(&self, r: &mut Resource, now: DateTime<Utc>) {
        if let Some(v) = &self.title {
            r.title = v.clone();
        }
        if let Some(v) = self.resource_type {
            r.resource_type = v;
        }
        if let Some(v) = self.category {
            r.category = v;
        }
        if let Some(v) = &self.subject {
            r.subject = v.clone();
        }
        if let Some(v) = &self.date {
            r.date = v.clone();
        }
        if let Some(v) = &self.size {
            r.size = v.clone();
        }
        if let Some(v) = &self.icon {
            r.icon = v.clone();
        }
        if let Some(v) = &self.color {
            r.color = v.clone();
        }
        if let Some(v) = &self.file_url {
            r.file_url = if v.is_empty() { None } else { Some(v.clone()) };
        }
        r.updated_at = now;
    }
}

/// Filtros de la página de recursos: búsqueda por título y categoría.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ResourceFilter {
    pub search: Option<String>,
    /// `"All"` or absent disables the category filter.
    pub category: Option<String>,
}

impl ResourceFilter {
    pub fn matches(&self, r: &Resource) -> bool {
        let search_ok = match self.search.as_deref().map(str::trim) {
            Some(q) if !q.is_empty() => r.title.to_lowercase().contains(&q.to_lowercase()),
            _ => true,
        };
        let category_ok = match self.category.as_deref() {
            None | Some("") | Some("All") => true,
            Some(c) => r.category.as_str() == c,
        };
        search_ok && category_ok
    }
}

pub fn filter_resources(resources: Vec<Resource>, filter: &ResourceFilter) -> Vec<Resource> {
    resources.into_iter().filter(|r| filter.matches(r)).collect()
}
