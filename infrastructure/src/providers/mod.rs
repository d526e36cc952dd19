//! LLM provider adapters implementing the
//! [`LlmGateway`](bookbot_application::LlmGateway) port.

pub mod openai;

pub use openai::OpenAiGateway;
