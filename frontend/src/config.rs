//! Build-time configuration.
//!
//! The API base URL is baked in at compile time: set `BARCODE_API_URL` in
//! the environment when building against a remote backend, otherwise the
//! app issues same-origin relative requests (the usual deployment, where
//! the backend serves the bundle itself).

/// Base URL prefix for every backend request, without a trailing slash.
pub fn api_base_url() -> &'static str {
    option_env!("BARCODE_API_URL").unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_has_no_trailing_slash_by_default() {
        assert!(!api_base_url().ends_with('/'));
    }
}
