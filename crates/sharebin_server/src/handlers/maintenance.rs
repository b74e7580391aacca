//! Maintenance page served for every request while maintenance mode is on.

use axum::{http::StatusCode, response::Html};

const MAINTENANCE_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>ShareBin - Maintenance</title>
</head>
<body>
  <h1>Down for maintenance</h1>
  <p>ShareBin is undergoing maintenance. Please check back soon.</p>
</body>
</html>
"#;

pub async fn maintenance_page() -> (StatusCode, Html<&'static str>) {
    (StatusCode::SERVICE_UNAVAILABLE, Html(MAINTENANCE_PAGE))
}
