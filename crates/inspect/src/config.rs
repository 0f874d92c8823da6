//! Shared inspection configuration.
//!
//! A [`Config`] is owned outside this crate and shared read-only across
//! transactions behind an [`std::sync::Arc`]. A transaction records whether
//! its configuration is shared, but it never releases the configuration
//! itself; that responsibility stays with the external owner in both cases.

/// Inspection settings consulted while a transaction is populated.
#[derive(Debug, Clone)]
pub struct Config {
    /// Capacity hint for the header-line sequences and header tables
    /// reserved at transaction creation.
    pub header_capacity_hint: usize,
    /// Whether the parsing layer decodes URL-encoded query/body parameters.
    pub parse_urlencoded: bool,
    /// Whether the parsing layer decodes multipart request bodies.
    pub parse_multipart: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self { header_capacity_hint: 32, parse_urlencoded: true, parse_multipart: true }
    }
}
