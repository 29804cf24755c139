pub mod case;
pub mod config;
pub mod error;
pub mod section;

pub use case::{CaseDocument, CaseInput, CaseSection, MAX_PATIENT_AGE, Specialization};
pub use config::{AppConfig, BackendConfig, GenerationConfig, parse_config_content};
pub use error::AppError;
pub use section::{SECTION_HEADER_PREFIX, SectionSpec};
