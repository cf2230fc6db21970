//! Lectura del catálogo de cursos (`data.csv`).
//!
//! The file is a flat CSV: a header line followed by
//! `courseId,courseName,semesterLabel[,...]` rows. Rows are bucketed by the
//! part of the semester label before the first `-`, so `"3-A"` and `"3-B"`
//! both land in bucket `"3"`.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::CourseCatalogEntry;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Semester label -> courses, in file order.
///
/// Buckets keep the order in which their label first appeared; entries keep
/// row order. Serialises as a JSON object `{ "1": [..], "2": [..] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseCatalog {
    buckets: Vec<(String, Vec<CourseCatalogEntry>)>,
}

impl CourseCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `entry` to the bucket `semester`, creating it if needed.
    pub fn push(&mut self, semester: &str, entry: CourseCatalogEntry) {
        match self.buckets.iter_mut().find(|(k, _)| k == semester) {
            Some((_, list)) => list.push(entry),
            None => self.buckets.push((semester.to_string(), vec![entry])),
        }
    }

    pub fn semesters(&self) -> impl Iterator<Item = &str> {
        self.buckets.iter().map(|(k, _)| k.as_str())
    }

    pub fn get(&self, semester: &str) -> Option<&[CourseCatalogEntry]> {
        self.buckets
            .iter()
            .find(|(k, _)| k == semester)
            .map(|(_, v)| v.as_slice())
    }

    pub fn buckets(&self) -> impl Iterator<Item = (&str, &[CourseCatalogEntry])> {
        self.buckets.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Every entry of every bucket, bucket order first.
    pub fn entries(&self) -> impl Iterator<Item = &CourseCatalogEntry> {
        self.buckets.iter().flat_map(|(_, v)| v.iter())
    }

    pub fn course_ids(&self) -> impl Iterator<Item = &str> {
        self.entries().map(|e| e.course_id.as_str())
    }

    /// Number of entries (not buckets).
    pub fn len(&self) -> usize {
        self.buckets.iter().map(|(_, v)| v.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

impl Serialize for CourseCatalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.buckets.len()))?;
        for (k, v) in &self.buckets {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CourseCatalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CatalogVisitor;

        impl<'de> Visitor<'de> for CatalogVisitor {
            type Value = CourseCatalog;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of semester label to course list")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut catalog = CourseCatalog::new();
                while let Some((k, v)) = access.next_entry::<String, Vec<CourseCatalogEntry>>()? {
                    for entry in v {
                        catalog.push(&k, entry);
                    }
                }
                Ok(catalog)
            }
        }

        deserializer.deserialize_map(CatalogVisitor)
    }
}

/// Bucket key for a raw semester field: everything before the first `-`.
pub fn semester_bucket(raw: &str) -> &str {
    raw.split('-').next().unwrap_or(raw)
}

/// Parsea el contenido del CSV. Las filas incompletas se descartan sin error.
pub fn parse_catalog(text: &str) -> CourseCatalog {
    let mut catalog = CourseCatalog::new();
    let mut skipped = 0usize;

    let rows = text
        .split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .filter(|l| !l.trim().is_empty())
        .skip(1); // header

    for row in rows {
        let mut cols = row.split(',').map(str::trim);
        let course_id = cols.next().unwrap_or("");
        let course_name = cols.next().unwrap_or("");
        let semester = cols.next().unwrap_or("");
        if course_id.is_empty() || course_name.is_empty() || semester.is_empty() {
            skipped += 1;
            continue;
        }

        catalog.push(
            semester_bucket(semester),
            CourseCatalogEntry {
                course_id: course_id.to_string(),
                course_name: course_name.to_string(),
            },
        );
    }

    if skipped > 0 {
        debug!(skipped, "catalog rows without id, name or semester were dropped");
    }
    catalog
}

/// Lee y parsea el catálogo desde disco. No hay catálogo parcial: o se lee
/// el archivo completo o se devuelve error.
pub async fn load_catalog<P: AsRef<Path>>(path: P) -> Result<CourseCatalog, CatalogError> {
    let path = path.as_ref();
    let text = tokio::fs::read_to_string(path).await.map_err(|source| {
        warn!(path = %path.display(), error = %source, "catalog read failed");
        CatalogError::Read { path: path.to_path_buf(), source }
    })?;
    let catalog = parse_catalog(&text);
    debug!(path = %path.display(), courses = catalog.len(), "catalog loaded");
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "course_id,course_name,semester_offered,is_core\r\n\
        CS101,Programming Fundamentals,1,yes\r\n\
        MT101,Calculus,1,yes\r\n\
        CS201,Data Structures,3-B,yes\r\n\
        CS202,Databases,3,no\r\n\
        \r\n\
        CS499,Orphan,,yes\n\
        CS301,Algorithms,5\n";

    #[test]
    fn sub_semester_labels_collapse_to_parent() {
        let cat = parse_catalog(SAMPLE);
        let third: Vec<&str> = cat.get("3").unwrap().iter().map(|e| e.course_id.as_str()).collect();
        assert_eq!(third, vec!["CS201", "CS202"]);
        assert!(cat.get("3-B").is_none());
        assert_eq!(cat.entries().filter(|e| e.course_id == "CS201").count(), 1);
    }

    #[test]
    fn malformed_rows_are_skipped_without_stopping() {
        let cat = parse_catalog(SAMPLE);
        assert!(cat.course_ids().all(|id| id != "CS499"));
        // la fila válida posterior sí se carga
        assert_eq!(cat.get("5").unwrap()[0].course_name, "Algorithms");
        assert_eq!(cat.len(), 5);
    }

    #[test]
    fn bucket_order_follows_the_file() {
        let cat = parse_catalog(SAMPLE);
        let sems: Vec<&str> = cat.semesters().collect();
        assert_eq!(sems, vec!["1", "3", "5"]);
    }

    #[test]
    fn duplicates_are_kept() {
        let cat = parse_catalog("h\nCS1,Intro,1\nCS1,Intro,1-A\n");
        assert_eq!(cat.get("1").unwrap().len(), 2);
    }

    #[test]
    fn header_only_and_empty_inputs() {
        assert!(parse_catalog("").is_empty());
        assert!(parse_catalog("course_id,course_name,semester\n").is_empty());
    }

    #[test]
    fn serialises_as_object_of_lists() {
        let cat = parse_catalog("h\nCS1,Intro,2\n");
        let v = serde_json::to_value(&cat).unwrap();
        assert_eq!(v, serde_json::json!({"2": [{"courseId": "CS1", "courseName": "Intro"}]}));

        let back: CourseCatalog = serde_json::from_value(v).unwrap();
        assert_eq!(back, cat);
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let err = load_catalog("/definitely/not/here/data.csv").await.unwrap_err();
        assert!(err.to_string().contains("failed to read catalog"));
    }
}
