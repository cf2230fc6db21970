use serde_json::Value;
use tracing::debug;

use crate::models::AdvisorRequest;

/// Normaliza el body crudo de `POST /api/batch-advisor` a un `AdvisorRequest`.
///
/// El formulario del cliente manda lo que tenga: números, strings con números,
/// listas o strings separados por comas. Esta función nunca falla; los campos
/// ausentes o con basura toman su valor por defecto.
///
/// # Estructura aceptada:
/// ```json
/// {
///   "currentSemester": "5",
///   "passedCourses": "CS101, CS102",
///   "failedCourses": ["MT101"],
///   "lowGradeCourses": [],
///   "gpa": 3.1,
///   "warningCount": "0",
///   "creditEarned": "64",
///   "maxCourses": 5
/// }
/// ```
pub fn sanitize_request(body: &Value) -> AdvisorRequest {
    let defaults = AdvisorRequest::default();
    let field = |name: &str| body.get(name).unwrap_or(&Value::Null);

    AdvisorRequest {
        current_semester: coerce_int(field("currentSemester"), defaults.current_semester, "currentSemester"),
        passed_courses: sanitize_list(field("passedCourses")),
        failed_courses: sanitize_list(field("failedCourses")),
        low_grade_courses: sanitize_list(field("lowGradeCourses")),
        gpa: coerce_number(field("gpa"), defaults.gpa, "gpa"),
        warning_count: coerce_int(field("warningCount"), defaults.warning_count, "warningCount"),
        credit_earned: coerce_int(field("creditEarned"), defaults.credit_earned, "creditEarned"),
        max_courses: coerce_int(field("maxCourses"), defaults.max_courses, "maxCourses"),
    }
}

/// Same shape as JS `Number(v ?? default)`, except that garbage resolves to
/// `default` instead of NaN.
pub fn coerce_number(v: &Value, default: f64, field: &str) -> f64 {
    let parsed = match v {
        Value::Null => return default,
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => {
            let t = s.trim();
            if t.is_empty() { Some(0.0) } else { t.parse::<f64>().ok() }
        }
        Value::Array(_) | Value::Object(_) => None,
    };

    match parsed {
        Some(n) if n.is_finite() => n,
        _ => {
            debug!(field, value = %v, "non-numeric value replaced by default");
            default
        }
    }
}

/// Variante entera: trunca hacia cero.
pub fn coerce_int(v: &Value, default: i64, field: &str) -> i64 {
    let n = coerce_number(v, default as f64, field);
    n.trunc() as i64
}

/// Accepts an array or a comma-separated string; anything else is empty.
/// Items are trimmed, empties dropped and repeats removed (first one wins).
pub fn sanitize_list(v: &Value) -> Vec<String> {
    let raw: Vec<String> = match v {
        Value::Array(items) => items.iter().filter_map(stringify).collect(),
        Value::String(s) => s.split(',').map(str::to_string).collect(),
        _ => Vec::new(),
    };

    let mut out: Vec<String> = Vec::with_capacity(raw.len());
    for item in raw {
        let item = item.trim();
        if item.is_empty() || out.iter().any(|o| o == item) {
            continue;
        }
        out.push(item.to_string());
    }
    out
}

fn stringify(v: &Value) -> Option<String> {
    match v {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}
