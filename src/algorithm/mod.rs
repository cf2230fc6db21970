//! Lógica del formulario del asesor de cursos (lado cliente, sin IO).
//!
//! - `eligibility`: reducer de selección y opciones de cada picker
//! - `validation`: validación de campos y habilitación del envío

pub mod eligibility;
pub mod validation;

pub use eligibility::{
    SelectionAction, SelectionState, apply_toggle, failed_options, low_options, passed_options, visible_semesters,
};
pub use validation::{AdvisorForm, FormErrors, can_submit, validate_form};
