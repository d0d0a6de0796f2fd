use execwrap_common::paths::DEST_DIR_TOKEN;

/// Literal token substitutions applied to argv entries and env values.
#[derive(Debug, Clone, Default)]
pub struct Replacements {
    pairs: Vec<(String, String)>,
}

impl Replacements {
    pub fn new(token: impl Into<String>, value: impl Into<String>) -> Self {
        Self::default().with(token, value)
    }

    /// The install-time replacement of [`DEST_DIR_TOKEN`] by `dest_folder`.
    pub fn dest_dir(dest_folder: &str) -> Self {
        Self::new(DEST_DIR_TOKEN, dest_folder)
    }

    pub fn with(mut self, token: impl Into<String>, value: impl Into<String>) -> Self {
        let token = token.into();
        if !token.is_empty() {
            self.pairs.push((token, value.into()));
        }
        self
    }

    pub fn apply(&self, input: &str) -> String {
        self.pairs
            .iter()
            .fold(input.to_string(), |acc, (token, value)| {
                acc.replace(token.as_str(), value)
            })
    }
}
