//! Extraction configuration.

use crate::error::{Error, Result};

/// Output mode for extracted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Plain text output.
    #[default]
    Text,
    /// Lightly marked-up HTML output.
    Html,
}

impl OutputMode {
    /// Default file extension for this mode, including the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputMode::Text => ".txt",
            OutputMode::Html => ".html",
        }
    }
}

/// Configuration for a text extraction run.
///
/// Immutable once constructed; build with the `with_*` methods and hand
/// the value to [`Extractor::new`](crate::Extractor::new).
///
/// Page bounds are 1-based and inclusive. An end page smaller than the
/// start page yields an empty extracted range, not an error.
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    /// Password for encrypted documents.
    pub password: Option<String>,

    /// Output character encoding label (e.g. "UTF-8", "ISO-8859-1").
    pub encoding: String,

    /// Sort text fragments by their on-page position before writing.
    pub sort_by_position: bool,

    /// Partition page text by article beads before linearizing.
    pub separate_beads: bool,

    /// First page to extract (1-based).
    pub start_page: u32,

    /// Last page to extract (inclusive).
    pub end_page: u32,

    /// Plain text or HTML output.
    pub mode: OutputMode,
}

impl ExtractionConfig {
    /// Create a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the document password.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Set the output encoding label.
    ///
    /// Unknown labels are accepted here; they surface as an error when
    /// the output sink is opened.
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = encoding.into();
        self
    }

    /// Enable or disable sorting text by position.
    pub fn with_sort_by_position(mut self, sort: bool) -> Self {
        self.sort_by_position = sort;
        self
    }

    /// Enable or disable bead-based flow separation.
    pub fn with_separate_beads(mut self, separate: bool) -> Self {
        self.separate_beads = separate;
        self
    }

    /// Set the first page to extract (1-based).
    pub fn with_start_page(mut self, page: u32) -> Self {
        self.start_page = page.max(1);
        self
    }

    /// Set the last page to extract (inclusive).
    pub fn with_end_page(mut self, page: u32) -> Self {
        self.end_page = page;
        self
    }

    /// Set the output mode.
    pub fn with_mode(mut self, mode: OutputMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set page bounds from raw text, as received on a command line.
    ///
    /// This is the only validation the configuration performs: a bound
    /// that does not parse as an integer fails with
    /// [`Error::InvalidPageBound`]. `end < start` is accepted and yields
    /// an empty range later.
    pub fn with_page_bounds_from_str(
        mut self,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Self> {
        if let Some(s) = start {
            let page: u32 = s
                .parse()
                .map_err(|_| Error::InvalidPageBound(s.to_string()))?;
            self.start_page = page.max(1);
        }
        if let Some(e) = end {
            self.end_page = e
                .parse()
                .map_err(|_| Error::InvalidPageBound(e.to_string()))?;
        }
        Ok(self)
    }

    /// Whether a 1-based page number falls inside the configured range.
    pub fn includes_page(&self, page: u32) -> bool {
        page >= self.start_page && page <= self.end_page
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            password: None,
            encoding: "UTF-8".to_string(),
            sort_by_position: false,
            separate_beads: true,
            start_page: 1,
            end_page: u32::MAX,
            mode: OutputMode::Text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ExtractionConfig::default();
        assert_eq!(config.encoding, "UTF-8");
        assert_eq!(config.start_page, 1);
        assert_eq!(config.end_page, u32::MAX);
        assert!(config.separate_beads);
        assert!(!config.sort_by_position);
        assert_eq!(config.mode, OutputMode::Text);
    }

    #[test]
    fn test_builder() {
        let config = ExtractionConfig::new()
            .with_password("secret")
            .with_encoding("ISO-8859-1")
            .with_sort_by_position(true)
            .with_separate_beads(false)
            .with_start_page(2)
            .with_end_page(5)
            .with_mode(OutputMode::Html);

        assert_eq!(config.password.as_deref(), Some("secret"));
        assert_eq!(config.encoding, "ISO-8859-1");
        assert!(config.sort_by_position);
        assert!(!config.separate_beads);
        assert_eq!(config.start_page, 2);
        assert_eq!(config.end_page, 5);
        assert_eq!(config.mode, OutputMode::Html);
    }

    #[test]
    fn test_page_bounds_from_str() {
        let config = ExtractionConfig::new()
            .with_page_bounds_from_str(Some("3"), Some("7"))
            .unwrap();
        assert_eq!(config.start_page, 3);
        assert_eq!(config.end_page, 7);
    }

    #[test]
    fn test_page_bounds_reject_non_numeric() {
        let result = ExtractionConfig::new().with_page_bounds_from_str(Some("abc"), None);
        assert!(matches!(result, Err(Error::InvalidPageBound(_))));

        let result = ExtractionConfig::new().with_page_bounds_from_str(None, Some("1x"));
        assert!(matches!(result, Err(Error::InvalidPageBound(_))));
    }

    #[test]
    fn test_inverted_range_is_accepted() {
        // end < start is an empty range, not a config error
        let config = ExtractionConfig::new()
            .with_page_bounds_from_str(Some("2"), Some("1"))
            .unwrap();
        assert!(!config.includes_page(1));
        assert!(!config.includes_page(2));
    }

    #[test]
    fn test_includes_page() {
        let config = ExtractionConfig::new().with_start_page(2).with_end_page(4);
        assert!(!config.includes_page(1));
        assert!(config.includes_page(2));
        assert!(config.includes_page(4));
        assert!(!config.includes_page(5));
    }

    #[test]
    fn test_extension() {
        assert_eq!(OutputMode::Text.extension(), ".txt");
        assert_eq!(OutputMode::Html.extension(), ".html");
    }
}
