//! Domain types - the values a match request carries through the proxy.

mod client;
mod match_request;
mod prompt;

pub use client::ClientId;
pub use match_request::{MAX_IMAGE_BASE64_LEN, MatchRequest, MimeType};
pub use prompt::{DEFAULT_PROMPT_TEMPLATE, PromptTemplate, SLUG_LIST_PLACEHOLDER};
