mod text_backend;

pub use text_backend::{Candidate, Completion, MockTextBackend, TextBackend};
