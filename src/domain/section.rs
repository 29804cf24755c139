//! Section definitions for the generated case study.

use serde::Deserialize;

/// Markdown prefix used for section headers in the rendered document.
pub const SECTION_HEADER_PREFIX: &str = "### ";

/// One section of the case study: a unique name and the instruction text
/// describing what the section must contain.
///
/// Specs are static configuration, loaded once from the embedded section
/// manifest and never mutated at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SectionSpec {
    pub name: String,
    pub instruction: String,
}
