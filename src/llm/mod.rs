pub mod client;
pub mod prompts;
pub mod response;

pub use client::{OpenRouterClient, OpenRouterConfig};
pub use prompts::{build_category_prompt, SYSTEM_PROMPT};
pub use response::{extract_json_object, parse_category_response};
