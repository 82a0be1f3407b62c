//! Transport module - reqwest client wrapped by the credential interceptor
//!
//! Every outbound call of the crate goes through one send path on
//! [`ApiClient`], so the bearer token is attached and a 401 ends the session
//! regardless of endpoint.

mod client;
mod identity;
mod key_values;
mod prompts;
mod strategies;

pub use client::ApiClient;
pub use key_values::{KeyQuery, KeyValue, KeyValueApi};
pub use prompts::{Prompt, PromptApi, PromptQuery};
pub use strategies::{
    Strategy, StrategyApi, StrategyQuery, StrategyStatus, StrategySummary, StrategyUpdate,
};
