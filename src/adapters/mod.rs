mod openai_backend;

pub use openai_backend::HttpTextBackend;
