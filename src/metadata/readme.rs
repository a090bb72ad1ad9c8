use std::fs;
use std::path::Path;

use regex::Regex;

/// README file names, in lookup order.
pub const README_CANDIDATES: &[&str] = &["README.md", "readme.md", "README", "readme.txt"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadmeSummary {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Pulls a title and a one-paragraph description out of a README.
#[derive(Debug, Clone)]
pub struct ReadmeParser {
    heading: Regex,
}

impl Default for ReadmeParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadmeParser {
    #[must_use]
    pub fn new() -> Self {
        Self {
            heading: Regex::new(r"^\s{0,3}#{1,6}\s*(.*?)(?:\s+#+)?\s*$")
                .expect("Invalid regex"),
        }
    }

    /// First README candidate present in `dir`, summarized.
    #[must_use]
    pub fn read(&self, dir: &Path) -> Option<ReadmeSummary> {
        README_CANDIDATES
            .iter()
            .find_map(|name| fs::read_to_string(dir.join(name)).ok())
            .map(|content| self.parse(&content))
    }

    /// The title is the text of the first heading line. The description is the
    /// first blank-line-delimited paragraph after it that is not itself a
    /// heading, joined onto one line.
    #[must_use]
    pub fn parse(&self, content: &str) -> ReadmeSummary {
        let content = content.replace("\r\n", "\n");
        let paragraphs = paragraphs(&content);

        let heading_at = paragraphs
            .iter()
            .position(|p| p.first().is_some_and(|line| self.heading.is_match(line)));

        let title = heading_at
            .and_then(|i| paragraphs[i].first())
            .and_then(|line| self.heading_text(line));

        let description = paragraphs
            .iter()
            .skip(heading_at.map_or(1, |i| i + 1))
            .find(|p| p.first().is_some_and(|line| !self.heading.is_match(line)))
            .map(|p| p.join(" "));

        ReadmeSummary { title, description }
    }

    fn heading_text(&self, line: &str) -> Option<String> {
        let text = self.heading.captures(line)?.get(1)?.as_str().trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

/// Non-empty runs of trimmed lines separated by blank lines.
fn paragraphs(content: &str) -> Vec<Vec<&str>> {
    let mut out: Vec<Vec<&str>> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in content.lines().map(str::trim) {
        if line.is_empty() {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

#[cfg(test)]
#[path = "readme_tests.rs"]
mod tests;
