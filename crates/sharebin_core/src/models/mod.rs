//! Data models for API requests, responses, and stored records.

/// Paste submissions, stored pastes, and their API views.
pub mod paste;
/// Users authenticated by bearer token.
pub mod user;

#[cfg(test)]
mod tests;
