//! Configuration options for rendering documents.
//!
//! [`RenderOptions`] controls the cosmetic parts of
//! [`render_with_options`](crate::render_with_options). None of the options
//! change what a document means: parsing any rendering gives back an equal
//! node.
//!
//! ## Examples
//!
//! ```rust
//! use wax::{node, render_with_options, RenderOptions};
//!
//! let config = node! { "a": [1, 2], "sub": { "b": 1 } };
//!
//! let options = RenderOptions::new().with_section_spacing(false);
//! assert_eq!(render_with_options(&config, options)?, "a = [1,2]\n[sub]\nb = 1\n");
//!
//! let options = RenderOptions::new().with_spaced_json(true);
//! assert_eq!(render_with_options(&config, options)?, "a = [1, 2]\n\n[sub]\nb = 1\n");
//! # Ok::<(), wax::Error>(())
//! ```

/// Configuration options for rendering.
///
/// # Examples
///
/// ```rust
/// use wax::RenderOptions;
///
/// // Defaults: blank line before headers, compact JSON, comments kept.
/// let options = RenderOptions::new();
/// assert!(options.section_spacing);
/// assert!(!options.spaced_json);
/// assert!(options.comments);
///
/// let options = RenderOptions::compact();
/// assert!(!options.section_spacing);
/// assert!(!options.comments);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct RenderOptions {
    /// Emit a blank line before each section header that follows other output.
    pub section_spacing: bool,
    /// Put a space after `,` and `:` inside JSON arrays and objects.
    pub spaced_json: bool,
    /// Emit comments and annotations.
    pub comments: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            section_spacing: true,
            spaced_json: false,
            comments: true,
        }
    }
}

impl RenderOptions {
    /// Creates default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for the smallest output: no blank lines, no comments.
    #[must_use]
    pub fn compact() -> Self {
        RenderOptions {
            section_spacing: false,
            spaced_json: false,
            comments: false,
        }
    }

    /// Sets whether a blank line precedes section headers.
    #[must_use]
    pub fn with_section_spacing(mut self, spacing: bool) -> Self {
        self.section_spacing = spacing;
        self
    }

    /// Sets whether JSON values are written with spaces after separators.
    #[must_use]
    pub fn with_spaced_json(mut self, spaced: bool) -> Self {
        self.spaced_json = spaced;
        self
    }

    /// Sets whether comments and annotations are written.
    #[must_use]
    pub fn with_comments(mut self, comments: bool) -> Self {
        self.comments = comments;
        self
    }
}
