//! Proxy module
//!
//! Shapes relay requests, forwards them to the upstream completion API and
//! translates what comes back.

pub mod caller;
pub mod headers;
pub mod logging;
pub mod openai;
pub mod payload;
pub mod provider;
pub mod response;

pub use caller::UpstreamCaller;
pub use openai::OpenAIProvider;
pub use payload::{IncomingChatRequest, IncomingFaqRequest, SamplingParams, UpstreamPayload};
pub use provider::{CompletionProvider, UpstreamReply};
