use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::fs;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};
use uuid::Uuid;

use super::{PortalStore, StoreError};
use crate::feed::{self, NewPost, PostPatch};
use crate::models::{
    LikeOutcome, Post, PostType, Resource, ResourceCategory, ResourceType, TourLocation, UserProfile, UserRole,
};
use crate::resources::{NewResource, ResourcePatch};
use crate::tour::NewTourLocation;
use crate::users::UserPatch;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS posts (
        id TEXT PRIMARY KEY,
        author_json TEXT NOT NULL,
        content TEXT NOT NULL,
        image TEXT,
        created_at TEXT NOT NULL,
        likes INTEGER NOT NULL DEFAULT 0,
        liked_by TEXT NOT NULL DEFAULT '[]',
        comments INTEGER NOT NULL DEFAULT 0,
        is_pinned INTEGER NOT NULL DEFAULT 0,
        post_type TEXT NOT NULL DEFAULT 'announcement'
    );

    CREATE TABLE IF NOT EXISTS resources (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        resource_type TEXT NOT NULL,
        category TEXT NOT NULL,
        subject TEXT NOT NULL,
        date TEXT NOT NULL,
        size TEXT NOT NULL,
        icon TEXT NOT NULL,
        color TEXT NOT NULL,
        file_url TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS tour_locations (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT NOT NULL,
        image TEXT NOT NULL,
        icon TEXT NOT NULL,
        ord INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS users (
        uid TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL,
        email_verified INTEGER NOT NULL DEFAULT 0,
        photo_url TEXT,
        role TEXT NOT NULL DEFAULT 'student',
        bio TEXT,
        phone TEXT,
        address TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
";

/// `PortalStore` sobre un único fichero SQLite.
///
/// Una sola conexión detrás de un `Mutex`: cada operación (incluido el
/// read-modify-write de likes y patches) se ejecuta con el lock tomado.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Abre (o crea) la base en `path`, creando el directorio si hace falta.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }
        let conn = Connection::open(path)?;
        info!(path = %path.display(), "portal database opened");
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(SqliteStore { conn: Mutex::new(conn) })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

// RFC 3339 con microsegundos y `Z`: ordena bien como texto.
fn ts_to_sql(t: &DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn ts_from_row(row: &Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let s: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn json_from_row<T: serde::de::DeserializeOwned>(row: &Row, idx: usize) -> rusqlite::Result<T> {
    let s: String = row.get(idx)?;
    serde_json::from_str(&s).map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn bad_value(idx: usize, msg: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, msg.into())
}

// --- posts ---

const POST_COLUMNS: &str = "id, author_json, content, image, created_at, likes, liked_by, comments, is_pinned, post_type";

fn post_from_row(row: &Row) -> rusqlite::Result<Post> {
    let kind: String = row.get(9)?;
    Ok(Post {
        id: row.get(0)?,
        author: json_from_row(row, 1)?,
        content: row.get(2)?,
        image: row.get(3)?,
        created_at: ts_from_row(row, 4)?,
        likes: row.get(5)?,
        liked_by: json_from_row(row, 6)?,
        comments: row.get(7)?,
        is_pinned: row.get(8)?,
        post_type: PostType::parse(&kind).unwrap_or_default(),
    })
}

fn fetch_post(conn: &Connection, id: &str) -> Result<Option<Post>, StoreError> {
    let sql = format!("SELECT {} FROM posts WHERE id = ?1", POST_COLUMNS);
    Ok(conn.query_row(&sql, params![id], post_from_row).optional()?)
}

fn write_post(conn: &Connection, p: &Post) -> Result<(), StoreError> {
    conn.execute(
        "INSERT OR REPLACE INTO posts (
            id, author_json, content, image, created_at, likes, liked_by, comments, is_pinned, post_type
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            p.id,
            serde_json::to_string(&p.author)?,
            p.content,
            p.image,
            ts_to_sql(&p.created_at),
            p.likes,
            serde_json::to_string(&p.liked_by)?,
            p.comments,
            p.is_pinned,
            p.post_type.as_str(),
        ],
    )?;
    Ok(())
}

// --- resources ---

const RESOURCE_COLUMNS: &str =
    "id, title, resource_type, category, subject, date, size, icon, color, file_url, created_at, updated_at";

fn resource_from_row(row: &Row) -> rusqlite::Result<Resource> {
    let kind: String = row.get(2)?;
    let category: String = row.get(3)?;
    Ok(Resource {
        id: row.get(0)?,
        title: row.get(1)?,
        resource_type: ResourceType::parse(&kind).ok_or_else(|| bad_value(2, format!("unknown resource type {}", kind)))?,
        category: ResourceCategory::parse(&category)
            .ok_or_else(|| bad_value(3, format!("unknown category {}", category)))?,
        subject: row.get(4)?,
        date: row.get(5)?,
        size: row.get(6)?,
        icon: row.get(7)?,
        color: row.get(8)?,
        file_url: row.get(9)?,
        created_at: ts_from_row(row, 10)?,
        updated_at: ts_from_row(row, 11)?,
    })
}

fn fetch_resource(conn: &Connection, id: &str) -> Result<Option<Resource>, StoreError> {
    let sql = format!("SELECT {} FROM resources WHERE id = ?1", RESOURCE_COLUMNS);
    Ok(conn.query_row(&sql, params![id], resource_from_row).optional()?)
}

fn write_resource(conn: &Connection, r: &Resource) -> Result<(), StoreError> {
    conn.execute(
        "INSERT OR REPLACE INTO resources (
            id, title, resource_type, category, subject, date, size, icon, color, file_url, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            r.id,
            r.title,
            r.resource_type.as_str(),
            r.category.as_str(),
            r.subject,
            r.date,
            r.size,
            r.icon,
            r.color,
            r.file_url,
            ts_to_sql(&r.created_at),
            ts_to_sql(&r.updated_at),
        ],
    )?;
    Ok(())
}

// --- tour ---

fn tour_from_row(row: &Row) -> rusqlite::Result<TourLocation> {
    Ok(TourLocation {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        image: row.get(3)?,
        icon: row.get(4)?,
        order: row.get(5)?,
        created_at: ts_from_row(row, 6)?,
        updated_at: ts_from_row(row, 7)?,
    })
}

// --- users ---

const USER_COLUMNS: &str =
    "uid, name, email, email_verified, photo_url, role, bio, phone, address, created_at, updated_at";

fn user_from_row(row: &Row) -> rusqlite::Result<UserProfile> {
    let role: String = row.get(5)?;
    Ok(UserProfile {
        uid: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        email_verified: row.get(3)?,
        photo_url: row.get(4)?,
        role: UserRole::parse(&role),
        bio: row.get(6)?,
        phone: row.get(7)?,
        address: row.get(8)?,
        created_at: ts_from_row(row, 9)?,
        updated_at: ts_from_row(row, 10)?,
    })
}

fn fetch_user(conn: &Connection, uid: &str) -> Result<Option<UserProfile>, StoreError> {
    let sql = format!("SELECT {} FROM users WHERE uid = ?1", USER_COLUMNS);
    Ok(conn.query_row(&sql, params![uid], user_from_row).optional()?)
}

fn write_user(conn: &Connection, u: &UserProfile) -> Result<(), StoreError> {
    conn.execute(
        "INSERT OR REPLACE INTO users (
            uid, name, email, email_verified, photo_url, role, bio, phone, address, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            u.uid,
            u.name,
            u.email,
            u.email_verified,
            u.photo_url,
            u.role.as_str(),
            u.bio,
            u.phone,
            u.address,
            ts_to_sql(&u.created_at),
            ts_to_sql(&u.updated_at),
        ],
    )?;
    Ok(())
}

impl PortalStore for SqliteStore {
    fn list_posts(&self) -> Result<Vec<Post>, StoreError> {
        let conn = self.conn()?;
        let sql = format!("SELECT {} FROM posts ORDER BY created_at DESC", POST_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], post_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn get_post(&self, id: &str) -> Result<Option<Post>, StoreError> {
        fetch_post(&*self.conn()?, id)
    }

    fn create_post(&self, post: NewPost) -> Result<String, StoreError> {
        let conn = self.conn()?;
        let id = new_id();
        write_post(&conn, &post.into_post(id.clone(), Utc::now()))?;
        debug!(post_id = %id, "post created");
        Ok(id)
    }

    fn update_post(&self, id: &str, patch: &PostPatch) -> Result<(), StoreError> {
        let conn = self.conn()?;
        let mut post = fetch_post(&conn, id)?.ok_or(StoreError::NotFound("Post"))?;
        patch.apply(&mut post);
        write_post(&conn, &post)
    }

    fn delete_post(&self, id: &str) -> Result<(), StoreError> {
        let n = self.conn()?.execute("DELETE FROM posts WHERE id = ?1", params![id])?;
        if n == 0 {
            return Err(StoreError::NotFound("Post"));
        }
        Ok(())
    }

    fn toggle_post_like(&self, id: &str, user_id: &str) -> Result<LikeOutcome, StoreError> {
        let conn = self.conn()?;
        let mut post = fetch_post(&conn, id)?.ok_or(StoreError::NotFound("Post"))?;
        let outcome = feed::toggle_like(&mut post, user_id);
        conn.execute(
            "UPDATE posts SET likes = ?1, liked_by = ?2 WHERE id = ?3",
            params![post.likes, serde_json::to_string(&post.liked_by)?, id],
        )?;
        Ok(outcome)
    }

    fn list_resources(&self) -> Result<Vec<Resource>, StoreError> {
        let conn = self.conn()?;
        let sql = format!("SELECT {} FROM resources ORDER BY created_at DESC", RESOURCE_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], resource_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn get_resource(&self, id: &str) -> Result<Option<Resource>, StoreError> {
        fetch_resource(&*self.conn()?, id)
    }

    fn create_resource(&self, resource: NewResource) -> Result<String, StoreError> {
        let conn = self.conn()?;
        let id = new_id();
        write_resource(&conn, &resource.into_resource(id.clone(), Utc::now()))?;
        Ok(id)
    }

    fn update_resource(&self, id: &str, patch: &ResourcePatch) -> Result<(), StoreError> {
        let conn = self.conn()?;
        let mut resource = fetch_resource(&conn, id)?.ok_or(StoreError::NotFound("Resource"))?;
        patch.apply(&mut resource, Utc::now());
        write_resource(&conn, &resource)
    }

    fn delete_resource(&self, id: &str) -> Result<(), StoreError> {
        let n = self.conn()?.execute("DELETE FROM resources WHERE id = ?1", params![id])?;
        if n == 0 {
            return Err(StoreError::NotFound("Resource"));
        }
        Ok(())
    }

    fn list_tour_locations(&self) -> Result<Vec<TourLocation>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, description, image, icon, ord, created_at, updated_at
             FROM tour_locations ORDER BY ord ASC, created_at ASC",
        )?;
        let rows = stmt.query_map([], tour_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn create_tour_location(&self, location: NewTourLocation) -> Result<String, StoreError> {
        let conn = self.conn()?;
        let id = new_id();
        let loc = location.into_location(id.clone(), Utc::now());
        conn.execute(
            "INSERT INTO tour_locations (id, name, description, image, icon, ord, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                loc.id,
                loc.name,
                loc.description,
                loc.image,
                loc.icon,
                loc.order,
                ts_to_sql(&loc.created_at),
                ts_to_sql(&loc.updated_at),
            ],
        )?;
        Ok(id)
    }

    fn get_user(&self, uid: &str) -> Result<Option<UserProfile>, StoreError> {
        fetch_user(&*self.conn()?, uid)
    }

    fn upsert_user(&self, profile: &UserProfile) -> Result<(), StoreError> {
        write_user(&*self.conn()?, profile)
    }

    fn update_user(&self, uid: &str, patch: &UserPatch) -> Result<(), StoreError> {
        let conn = self.conn()?;
        let mut user = fetch_user(&conn, uid)?.ok_or(StoreError::NotFound("User"))?;
        patch.apply(&mut user, Utc::now());
        write_user(&conn, &user)
    }
}
