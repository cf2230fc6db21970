//! Muro de anuncios: orden, likes y marcas de tiempo relativas.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{LikeOutcome, Post, PostAuthor, PostType};

/// Body de `POST /api/posts`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    pub author: PostAuthor,
    pub content: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub is_pinned: bool,
    #[serde(default, rename = "type")]
    pub post_type: PostType,
}

impl NewPost {
    pub fn validate(self) -> Result<NewPost, String> {
        if self.content.trim().is_empty() {
            return Err("Content is required".to_string());
        }
        if self.author.uid.trim().is_empty() || self.author.name.trim().is_empty() {
            return Err("Author name and uid are required".to_string());
        }
        Ok(self)
    }

    pub fn into_post(self, id: String, now: DateTime<Utc>) -> Post {
        Post {
            id,
            author: self.author,
            content: self.content,
            image: self.image.filter(|s| !s.trim().is_empty()),
            created_at: now,
            likes: 0,
            liked_by: Vec::new(),
            comments: 0,
            is_pinned: self.is_pinned,
            post_type: self.post_type,
        }
    }
}

/// Body de `PATCH /api/posts/{id}`; solo se tocan los campos presentes.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPatch {
    pub content: Option<String>,
    /// Empty string clears the image.
    pub image: Option<String>,
    pub is_pinned: Option<bool>,
    #[serde(rename = "type")]
    pub post_type: Option<PostType>,
}

impl PostPatch {
    pub fn apply(&self, post: &mut Post) {
        if let Some(c) = &self.content {
            post.content = c.clone();
        }
        if let Some(img) = &self.image {
            post.image = if img.trim().is_empty() { None } else { Some(img.clone()) };
        }
        if let Some(p) = self.is_pinned {
            post.is_pinned = p;
        }
        if let Some(t) = self.post_type {
            post.post_type = t;
        }
    }
}

/// Fijados primero, luego los más nuevos.
pub fn sort_feed(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.is_pinned.cmp(&a.is_pinned).then(b.created_at.cmp(&a.created_at)));
}

/// Like/unlike for `user_id`. The counter never goes below zero.
pub fn toggle_like(post: &mut Post, user_id: &str) -> LikeOutcome {
    if let Some(pos) = post.liked_by.iter().position(|u| u == user_id) {
        post.liked_by.remove(pos);
        post.likes = post.likes.saturating_sub(1);
        LikeOutcome { likes: post.likes, is_liked: false }
    } else {
        post.liked_by.push(user_id.to_string());
        post.likes += 1;
        LikeOutcome { likes: post.likes, is_liked: true }
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 { format!("1 {} ago", unit) } else { format!("{} {}s ago", n, unit) }
}

/// "12 seconds ago", "1 minute ago", "3 days ago"; a week or more shows the date.
pub fn relative_timestamp(created: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - created).num_seconds().max(0);
    match secs {
        s if s < 60 => format!("{} seconds ago", s),
        s if s < 3_600 => plural(s / 60, "minute"),
        s if s < 86_400 => plural(s / 3_600, "hour"),
        s if s < 604_800 => plural(s / 86_400, "day"),
        _ => created.format("%Y-%m-%d").to_string(),
    }
}

/// Post as returned by the feed endpoints, with its display timestamp.
#[derive(Debug, Serialize)]
pub struct FeedItem<'a> {
    #[serde(flatten)]
    pub post: &'a Post,
    pub timestamp: String,
}

pub fn feed_items(posts: &[Post], now: DateTime<Utc>) -> Vec<FeedItem<'_>> {
    posts
        .iter()
        .map(|p| FeedItem { post: p, timestamp: relative_timestamp(p.created_at, now) })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn post(id: &str, pinned: bool, at: DateTime<Utc>) -> Post {
        Post {
            id: id.into(),
            author: PostAuthor { name: "Admin".into(), role: "Admin".into(), avatar: None, uid: "u0".into() },
            content: "hello".into(),
            image: None,
            created_at: at,
            likes: 0,
            liked_by: vec![],
            comments: 0,
            is_pinned: pinned,
            post_type: PostType::Announcement,
        }
    }

    #[test]
    fn pinned_posts_come_first_then_newest() {
        let t0 = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let mut posts = vec![
            post("old", false, t0),
            post("pinned-old", true, t0 - Duration::days(30)),
            post("new", false, t0 + Duration::hours(1)),
        ];
        sort_feed(&mut posts);
        let order: Vec<&str> = posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(order, vec!["pinned-old", "new", "old"]);
    }

    #[test]
    fn like_toggles_and_never_underflows() {
        let mut p = post("p", false, Utc::now());
        assert_eq!(toggle_like(&mut p, "u1"), LikeOutcome { likes: 1, is_liked: true });
        assert_eq!(toggle_like(&mut p, "u2"), LikeOutcome { likes: 2, is_liked: true });
        assert_eq!(toggle_like(&mut p, "u1"), LikeOutcome { likes: 1, is_liked: false });
        assert_eq!(p.liked_by, vec!["u2"]);

        // contador desincronizado con liked_by
        p.likes = 0;
        assert_eq!(toggle_like(&mut p, "u2"), LikeOutcome { likes: 0, is_liked: false });
    }

    #[test]
    fn relative_timestamps() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
        assert_eq!(relative_timestamp(now - Duration::seconds(5), now), "5 seconds ago");
        assert_eq!(relative_timestamp(now - Duration::seconds(61), now), "1 minute ago");
        assert_eq!(relative_timestamp(now - Duration::hours(5), now), "5 hours ago");
        assert_eq!(relative_timestamp(now - Duration::days(1), now), "1 day ago");
        assert_eq!(relative_timestamp(now - Duration::days(9), now), "2025-03-01");
        assert_eq!(relative_timestamp(now + Duration::seconds(30), now), "0 seconds ago");
    }

    #[test]
    fn patch_only_touches_given_fields() {
        let mut p = post("p", false, Utc::now());
        p.image = Some("a.png".into());
        PostPatch { is_pinned: Some(true), image: Some(String::new()), ..Default::default() }.apply(&mut p);
        assert!(p.is_pinned);
        assert_eq!(p.image, None);
        assert_eq!(p.content, "hello");
    }

    #[test]
    fn new_post_needs_content() {
        let raw = serde_json::json!({"author": {"name": "A", "role": "Admin", "uid": "u"}, "content": "  "});
        let np: NewPost = serde_json::from_value(raw).unwrap();
        assert!(np.validate().is_err());
    }
}
