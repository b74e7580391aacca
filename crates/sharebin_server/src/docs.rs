//! API information document served at `/api/documentation`.

use serde::Serialize;

/// Top-level API information, built once at startup.
#[derive(Debug, Clone, Serialize)]
pub struct ApiDocumentation {
    pub openapi: &'static str,
    pub info: ApiInfo,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApiInfo {
    pub title: &'static str,
    pub version: &'static str,
    pub summary: &'static str,
    pub description: &'static str,
}

impl Default for ApiDocumentation {
    fn default() -> Self {
        Self {
            openapi: "3.1.0",
            info: ApiInfo {
                title: "ShareBin API",
                version: env!("CARGO_PKG_VERSION"),
                summary: "API Documentation",
                description: "ShareBin - Easily share code and text.",
            },
        }
    }
}
