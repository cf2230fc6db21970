//! Persistencia del portal (posts, recursos, tour, usuarios).
//!
//! Los handlers reciben un `Arc<dyn PortalStore>` construido una vez en
//! `server::run_server`; los tests inyectan `SqliteStore::open_in_memory()`.
//! The trait is synchronous; async callers go through `web::block`.

pub mod sqlite;

use thiserror::Error;

use crate::feed::{NewPost, PostPatch};
use crate::models::{LikeOutcome, Post, Resource, TourLocation, UserProfile};
use crate::resources::{NewResource, ResourcePatch};
use crate::tour::NewTourLocation;
use crate::users::UserPatch;

pub use sqlite::SqliteStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The named kind of record does not exist ("Post", "Resource", "User").
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("stored value is malformed: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("failed to prepare database directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("database lock poisoned")]
    Poisoned,
}

pub trait PortalStore: Send + Sync {
    // posts
    fn list_posts(&self) -> Result<Vec<Post>, StoreError>;
    fn get_post(&self, id: &str) -> Result<Option<Post>, StoreError>;
    fn create_post(&self, post: NewPost) -> Result<String, StoreError>;
    fn update_post(&self, id: &str, patch: &PostPatch) -> Result<(), StoreError>;
    fn delete_post(&self, id: &str) -> Result<(), StoreError>;
    /// Read-modify-write of the like list; atomic with respect to other calls.
    fn toggle_post_like(&self, id: &str, user_id: &str) -> Result<LikeOutcome, StoreError>;

    // resources, newest first
    fn list_resources(&self) -> Result<Vec<Resource>, StoreError>;
    fn get_resource(&self, id: &str) -> Result<Option<Resource>, StoreError>;
    fn create_resource(&self, resource: NewResource) -> Result<String, StoreError>;
    fn update_resource(&self, id: &str, patch: &ResourcePatch) -> Result<(), StoreError>;
    fn delete_resource(&self, id: &str) -> Result<(), StoreError>;

    // tour
    fn list_tour_locations(&self) -> Result<Vec<TourLocation>, StoreError>;
    fn create_tour_location(&self, location: NewTourLocation) -> Result<String, StoreError>;

    // users
    fn get_user(&self, uid: &str) -> Result<Option<UserProfile>, StoreError>;
    fn upsert_user(&self, profile: &UserProfile) -> Result<(), StoreError>;
    fn update_user(&self, uid: &str, patch: &UserPatch) -> Result<(), StoreError>;
}
