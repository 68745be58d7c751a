use ammonia::Builder;

/// Reduces user-supplied post bodies to an allowlist of harmless markup.
/// Script and style elements are dropped with their contents, unknown tags
/// and attributes (including every `on*` handler) are stripped, and link
/// targets must use a plain web or mail scheme.
pub struct Sanitizer {
    builder: Builder<'static>,
}

impl Sanitizer {
    pub fn new() -> Self {
        let mut builder = Builder::default();
        builder.url_schemes(["http", "https", "mailto"].into_iter().collect());
        Self { builder }
    }

    pub fn clean(&self, input: &str) -> String {
        self.builder.clean(input).to_string()
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new()
    }
}
