pub mod error_codes;
pub mod gemini_client;
pub mod generated;
pub mod prompt_templates;
pub mod reference_images;
pub mod render;
pub mod response_schema;
pub mod settings;
