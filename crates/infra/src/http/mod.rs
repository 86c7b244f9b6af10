//! HTTP client layer

mod client;

pub use client::{HttpClient, HttpClientBuilder};
