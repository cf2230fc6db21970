use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::eligibility::SelectionState;

pub const MIN_SEMESTER: i64 = 1;
pub const MAX_SEMESTER: i64 = 8;
pub const MIN_GPA: f64 = 0.0;
pub const MAX_GPA: f64 = 4.0;

/// Valores crudos del formulario, tal como los escribe el estudiante.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisorForm {
    pub current_semester: String,
    pub gpa: String,
    pub warning_count: String,
    pub credit_earned: String,
    pub max_courses: String,
}

/// Field-level messages. `None` means the field is fine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormErrors {
    pub current_semester: Option<String>,
    pub gpa: Option<String>,
    pub credit_earned: Option<String>,
    pub max_courses: Option<String>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.current_semester.is_none() && self.gpa.is_none() && self.credit_earned.is_none() && self.max_courses.is_none()
    }

    /// Only semester and GPA errors block the submit button on their own;
    /// the other two are caught by the "required field empty" check.
    pub fn blocks_submit(&self) -> bool {
        self.current_semester.is_some() || self.gpa.is_some()
    }
}

impl AdvisorForm {
    fn required_missing(&self) -> bool {
        [&self.current_semester, &self.gpa, &self.credit_earned, &self.max_courses]
            .iter()
            .any(|v| v.trim().is_empty())
    }

    /// Declared semester, if it parses; drives `visible_semesters`.
    pub fn declared_semester(&self) -> Option<i64> {
        self.current_semester.trim().parse::<i64>().ok()
    }

    /// Body for `POST /api/batch-advisor`. Numbers travel as the raw strings;
    /// the server-side sanitizer coerces them.
    pub fn to_payload(&self, selection: &SelectionState) -> Value {
        json!({
            "currentSemester": self.current_semester,
            "gpa": self.gpa,
            "warningCount": self.warning_count,
            "creditEarned": self.credit_earned,
            "maxCourses": self.max_courses,
            "passedCourses": selection.passed_list(),
            "failedCourses": selection.failed_list(),
            "lowGradeCourses": selection.low_list(),
        })
    }
}

pub fn validate_semester(raw: &str) -> Option<String> {
    let t = raw.trim();
    if t.is_empty() {
        return Some("Current semester is required".to_string());
    }
    match t.parse::<i64>() {
        Ok(n) if (MIN_SEMESTER..=MAX_SEMESTER).contains(&n) => None,
        _ => Some(format!("Semester must be between {} and {}", MIN_SEMESTER, MAX_SEMESTER)),
    }
}

pub fn validate_gpa(raw: &str) -> Option<String> {
    let t = raw.trim();
    if t.is_empty() {
        return Some("GPA is required".to_string());
    }
    match t.parse::<f64>() {
        Ok(g) if g.is_finite() && (MIN_GPA..=MAX_GPA).contains(&g) => None,
        _ => Some(format!("GPA must be between {} and {}", MIN_GPA, MAX_GPA)),
    }
}

fn required(raw: &str) -> Option<String> {
    if raw.trim().is_empty() { Some("Required".to_string()) } else { None }
}

pub fn validate_form(form: &AdvisorForm) -> FormErrors {
    FormErrors {
        current_semester: validate_semester(&form.current_semester),
        gpa: validate_gpa(&form.gpa),
        credit_earned: required(&form.credit_earned),
        max_courses: required(&form.max_courses),
    }
}

/// El botón de enviar queda deshabilitado si hay petición en vuelo, falta un
/// campo requerido, falló la carga del catálogo o semestre/GPA son inválidos.
pub fn can_submit(form: &AdvisorForm, errors: &FormErrors, in_flight: bool, catalog_failed: bool) -> bool {
    !in_flight && !catalog_failed && !form.required_missing() && !errors.blocks_submit()
}
