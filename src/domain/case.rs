//! Case study domain models: intake parameters and the generated document.

use std::fmt;

use crate::domain::AppError;
use crate::domain::section::SECTION_HEADER_PREFIX;

/// Upper bound for patient age on the intake form.
pub const MAX_PATIENT_AGE: u8 = 100;

/// Physiotherapy specialization selected on the intake form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Specialization {
    /// Placeholder for a form submitted without choosing a domain.
    #[default]
    Unselected,
    Sports,
    Geriatric,
    Orthopedic,
    Pediatric,
    Neurological,
    Cardiovascular,
}

impl Specialization {
    /// The fixed list of selectable domains, in form order.
    pub const ALL: [Specialization; 6] = [
        Specialization::Sports,
        Specialization::Geriatric,
        Specialization::Orthopedic,
        Specialization::Pediatric,
        Specialization::Neurological,
        Specialization::Cardiovascular,
    ];

    /// Display label as it appears on the form and in prompts.
    pub fn as_str(&self) -> &'static str {
        match self {
            Specialization::Unselected => "unselected",
            Specialization::Sports => "Sports Physiotherapy",
            Specialization::Geriatric => "Geriatric Physiotherapy",
            Specialization::Orthopedic => "Orthopedic Physiotherapy",
            Specialization::Pediatric => "Pediatric Physiotherapy",
            Specialization::Neurological => "Neurological Physiotherapy",
            Specialization::Cardiovascular => "Cardiovascular Physiotherapy",
        }
    }

    /// Parse a specialization from its label or bare domain word.
    ///
    /// Matching is case-insensitive; the " Physiotherapy" suffix is optional.
    pub fn parse(value: &str) -> Option<Specialization> {
        let normalized = value.trim().to_ascii_lowercase();
        let stem = normalized.strip_suffix(" physiotherapy").unwrap_or(&normalized);

        match stem {
            "unselected" => Some(Specialization::Unselected),
            "sports" => Some(Specialization::Sports),
            "geriatric" => Some(Specialization::Geriatric),
            "orthopedic" => Some(Specialization::Orthopedic),
            "pediatric" => Some(Specialization::Pediatric),
            "neurological" => Some(Specialization::Neurological),
            "cardiovascular" => Some(Specialization::Cardiovascular),
            _ => None,
        }
    }
}

impl fmt::Display for Specialization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated intake parameters for one case study run.
///
/// Immutable once constructed; the pipeline reads it but never mutates it.
/// Free-text fields are opaque and may be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseInput {
    pub age: u8,
    pub background: String,
    pub specialization: Specialization,
    pub adl_problem: String,
}

impl CaseInput {
    /// Create an intake record, enforcing the age bound.
    pub fn new(
        age: u8,
        background: impl Into<String>,
        specialization: Specialization,
        adl_problem: impl Into<String>,
    ) -> Result<Self, AppError> {
        if age > MAX_PATIENT_AGE {
            return Err(AppError::InvalidInput(format!(
                "Patient age must be between 0 and {}, got {}",
                MAX_PATIENT_AGE, age
            )));
        }

        Ok(Self {
            age,
            background: background.into(),
            specialization,
            adl_problem: adl_problem.into(),
        })
    }
}

/// One generated section of the final document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseSection {
    pub name: String,
    pub body: String,
}

/// Ordered collection of generated sections for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseDocument {
    sections: Vec<CaseSection>,
}

impl CaseDocument {
    /// Append a section; callers are responsible for preserving catalog order.
    pub fn push(&mut self, name: impl Into<String>, body: impl Into<String>) {
        self.sections.push(CaseSection { name: name.into(), body: body.into() });
    }

    pub fn sections(&self) -> &[CaseSection] {
        &self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Render the document as a single Markdown string.
    ///
    /// Each section is emitted as `### {name}` followed by its body and a
    /// blank line, in insertion order.
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();
        for section in &self.sections {
            output.push_str(SECTION_HEADER_PREFIX);
            output.push_str(&section.name);
            output.push('\n');
            output.push_str(&section.body);
            output.push_str("\n\n");
        }
        output
    }
}
