//! Ignore-file component.

use projforge_core::{
    application::{Component, SynthContext},
    error::ForgeResult,
};

use super::GENERATED_HEADER;

/// An ordered ignore file (`.gitignore` by default).
///
/// Patterns keep insertion order; comments (`#`) and negations (`!`) pass
/// through untouched. Re-adding an existing pattern is a no-op so caller
/// composition cannot produce duplicates.
pub struct IgnoreFile {
    file_name: String,
    patterns: Vec<String>,
}

impl IgnoreFile {
    pub fn new() -> Self {
        Self::named(".gitignore")
    }

    pub fn named(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            patterns: Vec::new(),
        }
    }

    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.add(pattern.into());
        self
    }

    pub fn patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for pattern in patterns {
            self.add(pattern.into());
        }
        self
    }

    fn add(&mut self, pattern: String) {
        if !self.patterns.contains(&pattern) {
            self.patterns.push(pattern);
        }
    }
}

impl Default for IgnoreFile {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for IgnoreFile {
    fn name(&self) -> &str {
        "ignore-file"
    }

    fn synthesize(&mut self, ctx: &mut SynthContext<'_>) -> ForgeResult<()> {
        let mut lines = vec![format!("# {GENERATED_HEADER}")];
        lines.extend(self.patterns.iter().cloned());
        let text = format!("{}\n", lines.join("\n"));
        ctx.write_file(&self.file_name, &text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_patterns_are_dropped() {
        let ignore = IgnoreFile::new()
            .pattern("node_modules/")
            .pattern("dist/")
            .pattern("node_modules/");
        assert_eq!(ignore.patterns, vec!["node_modules/", "dist/"]);
    }

    #[test]
    fn negations_and_comments_pass_through() {
        let ignore = IgnoreFile::new().patterns(["# build output", "dist/", "!dist/keep.txt"]);
        assert_eq!(
            ignore.patterns,
            vec!["# build output", "dist/", "!dist/keep.txt"]
        );
    }
}
