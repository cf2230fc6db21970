//! Estado de selección del formulario del asesor.
//!
//! Three pickers share one catalog: passed, failed (retake) and low-grade.
//! Invariants after every transition:
//! - `failed ∩ passed = ∅`
//! - `low ⊆ passed`
//!
//! Everything here is pure: `apply_toggle` returns the next state and the
//! option helpers derive what each picker may offer.

use std::collections::BTreeSet;

use crate::catalog::CourseCatalog;
use crate::models::CourseCatalogEntry;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub passed: BTreeSet<String>,
    pub failed: BTreeSet<String>,
    pub low: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionAction {
    TogglePassed(String),
    ToggleFailed(String),
    ToggleLow(String),
    /// Replaces the whole passed set (bulk select / clear).
    SetPassed(BTreeSet<String>),
    Reset,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Both invariants hold.
    pub fn is_consistent(&self) -> bool {
        self.failed.is_disjoint(&self.passed) && self.low.is_subset(&self.passed)
    }

    pub fn passed_list(&self) -> Vec<String> {
        self.passed.iter().cloned().collect()
    }

    pub fn failed_list(&self) -> Vec<String> {
        self.failed.iter().cloned().collect()
    }

    pub fn low_list(&self) -> Vec<String> {
        self.low.iter().cloned().collect()
    }

    // Limpieza tras cambiar `passed`; idempotente.
    fn enforce(mut self) -> Self {
        let passed = &self.passed;
        self.failed.retain(|id| !passed.contains(id));
        self.low.retain(|id| passed.contains(id));
        self
    }
}

fn toggle(set: &mut BTreeSet<String>, id: String) {
    if !set.remove(&id) {
        set.insert(id);
    }
}

/// Reducer: one action in, next state out, invariants enforced in the same step.
pub fn apply_toggle(state: &SelectionState, action: SelectionAction) -> SelectionState {
    let mut next = state.clone();
    match action {
        SelectionAction::TogglePassed(id) => {
            toggle(&mut next.passed, id);
            next.enforce()
        }
        SelectionAction::SetPassed(ids) => {
            next.passed = ids;
            next.enforce()
        }
        SelectionAction::ToggleFailed(id) => {
            // el picker de reprobados no ofrece cursos aprobados
            if !next.passed.contains(&id) {
                toggle(&mut next.failed, id);
            }
            next
        }
        SelectionAction::ToggleLow(id) => {
            if next.passed.contains(&id) {
                toggle(&mut next.low, id);
            }
            next
        }
        SelectionAction::Reset => SelectionState::default(),
    }
}

/// Semesters the student may pick courses from.
///
/// With a declared `current_semester > 0`, only numeric labels strictly below
/// it. Without one, every label. Numeric labels come first in numeric order,
/// then any non-numeric labels in catalog order.
pub fn visible_semesters(catalog: &CourseCatalog, current_semester: Option<i64>) -> Vec<String> {
    let limit = current_semester.filter(|s| *s > 0);

    let mut numeric: Vec<(i64, &str)> = Vec::new();
    let mut other: Vec<&str> = Vec::new();
    for label in catalog.semesters() {
        match label.trim().parse::<i64>() {
            Ok(n) => {
                if limit.map_or(true, |cur| n < cur) {
                    numeric.push((n, label));
                }
            }
            Err(_) => {
                if limit.is_none() {
                    other.push(label);
                }
            }
        }
    }
    numeric.sort_by_key(|(n, _)| *n);

    numeric
        .into_iter()
        .map(|(_, l)| l.to_string())
        .chain(other.into_iter().map(str::to_string))
        .collect()
}

fn visible_entries<'a>(catalog: &'a CourseCatalog, visible: &'a [String]) -> impl Iterator<Item = &'a CourseCatalogEntry> {
    visible
        .iter()
        .filter_map(move |sem| catalog.get(sem))
        .flat_map(|entries| entries.iter())
}

/// Opciones del picker de aprobados.
pub fn passed_options<'a>(catalog: &'a CourseCatalog, visible: &'a [String]) -> Vec<&'a CourseCatalogEntry> {
    visible_entries(catalog, visible).collect()
}

/// Visible catalog minus already-passed courses.
pub fn failed_options<'a>(
    catalog: &'a CourseCatalog,
    visible: &'a [String],
    state: &SelectionState,
) -> Vec<&'a CourseCatalogEntry> {
    visible_entries(catalog, visible)
        .filter(|e| !state.passed.contains(&e.course_id))
        .collect()
}

/// Visible catalog intersected with passed courses.
pub fn low_options<'a>(
    catalog: &'a CourseCatalog,
    visible: &'a [String],
    state: &SelectionState,
) -> Vec<&'a CourseCatalogEntry> {
    visible_entries(catalog, visible)
        .filter(|e| state.passed.contains(&e.course_id))
        .collect()
}
