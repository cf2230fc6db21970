use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::models::{UserProfile, UserRole};

/// Campos editables del perfil. `uid`, `email` y `createdAt` no se tocan.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    pub name: Option<String>,
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
    pub email_verified: Option<bool>,
    pub role: Option<UserRole>,
    pub bio: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl UserPatch {
    pub fn apply(&self, u: &mut UserProfile, now: DateTime<Utc>) {
        if let Some(v) = &self.name {
            u.name = v.clone();
        }
        if let Some(v) = &self.photo_url {
            u.photo_url = Some(v.clone()).filter(|s| !s.is_empty());
        }
        if let Some(v) = self.email_verified {
            u.email_verified = v;
        }
        if let Some(v) = self.role {
            u.role = v;
        }
        if let Some(v) = &self.bio {
            u.bio = Some(v.clone());
        }
        if let Some(v) = &self.phone {
            u.phone = Some(v.clone());
        }
        if let Some(v) = &self.address {
            u.address = Some(v.clone());
        }
        u.updated_at = now;
    }
}

/// Body de `POST /api/users`: lo que el proveedor de identidad sabe del
/// usuario tras el sign-up o el sign-in con Google.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRegistration {
    #[serde(default)]
    pub uid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, rename = "photoURL")]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
}

impl UserRegistration {
    pub fn validate(self) -> Result<UserRegistration, String> {
        if self.uid.trim().is_empty() {
            return Err("User ID is required.".to_string());
        }
        if self.email.trim().is_empty() {
            return Err("Email is required.".to_string());
        }
        Ok(self)
    }

    /// Merges into `existing`. Role, `createdAt` and the editable profile
    /// fields survive a repeated sign-in; a first sign-in is a student.
    pub fn into_profile(self, existing: Option<UserProfile>, now: DateTime<Utc>) -> UserProfile {
        let name = if self.name.trim().is_empty() { "User".to_string() } else { self.name };
        let photo_url = self.photo_url.filter(|s| !s.is_empty());
        match existing {
            Some(mut u) => {
                u.name = name;
                u.email = self.email;
                u.email_verified = self.email_verified;
                if photo_url.is_some() {
                    u.photo_url = photo_url;
                }
                u.updated_at = now;
                u
            }
            None => {
                let mut u = new_profile(&self.uid, &name, &self.email, now);
                u.email_verified = self.email_verified;
                u.photo_url = photo_url;
                u
            }
        }
    }
}

/// New student profile, as created on first sign-up.
pub fn new_profile(uid: &str, name: &str, email: &str, now: DateTime<Utc>) -> UserProfile {
    UserProfile {
        uid: uid.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        email_verified: false,
        photo_url: None,
        role: UserRole::Student,
        bio: None,
        phone: None,
        address: None,
        created_at: now,
        updated_at: now,
    }
}
