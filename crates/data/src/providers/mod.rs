mod http;

pub use http::{HttpMetricsConfig, HttpMetricsProvider};
