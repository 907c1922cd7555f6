//! HTTP client with retry and rate limiting
//!
//! # Overview
//!
//! The http module wraps `reqwest` with the behavior every upstream call
//! needs: bounded retries with configurable backoff, `Retry-After` handling
//! for 429 responses, timeout classification, and a token-bucket rate
//! limiter so chunked extraction does not hammer the API.

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
