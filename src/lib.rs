pub mod classifier;
pub mod config;
pub mod engine;
pub mod error;
pub mod http_server;
pub mod lexicon;
pub mod lifecycle;
pub mod mood;
pub mod rate_limiter;
pub mod responder;
pub mod session;
