//! Mock infrastructure for testing external services
//!
//! - OpenAI chat completions (the relay's upstream)


pub use openai::*;
