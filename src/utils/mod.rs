pub mod redact;
pub mod text;
