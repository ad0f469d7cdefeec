/// Parser and encoder settings.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Strip `[bracketed]` comment spans from values and unescape `[[x]]` to `[x]`.
    pub comments: bool,
}

impl Options {
    pub fn with_comments(comments: bool) -> Self {
        Self { comments }
    }
}
