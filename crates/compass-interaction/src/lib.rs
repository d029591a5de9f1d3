//! Outbound adapters to language-model services.

pub mod claude_api_gateway;

pub use claude_api_gateway::ClaudeApiGateway;
