//! Explanation text shown next to the scene.
//!
//! The asset is read once at startup. It is HTML; the panel only drops the
//! markup and wraps the remaining words to the panel width.

use crate::error::{Error, Result};
use log::warn;
use std::path::{Path, PathBuf};

pub const DEFAULT_HELP_FILE: &str = "assets/explanation.html";

/// Closing tags that end a paragraph
const BREAK_TAGS: [&str; 9] = ["/p", "/h1", "/h2", "/h3", "/li", "br", "br/", "/ul", "/ol"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HelpPanel {
    Loaded { text: String },
    /// The asset could not be read; the panel reports the failure instead
    Failed {
        path: PathBuf,
        reason: String,
    },
}

impl HelpPanel {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::HelpAsset {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(HelpPanel::Loaded { text })
    }

    /// Loads the asset, turning a failure into a panel that shows it
    pub fn load_or_report(path: &Path) -> Self {
        match HelpPanel::load(path) {
            Ok(panel) => panel,
            Err(err) => {
                warn!("{}", err);
                let reason = match &err {
                    Error::HelpAsset { source, .. } => source.to_string(),
                    other => other.to_string(),
                };
                HelpPanel::Failed {
                    path: path.to_path_buf(),
                    reason,
                }
            }
        }
    }

    /// Panel contents wrapped to `width` columns
    pub fn lines(&self, width: usize) -> Vec<String> {
        match self {
            HelpPanel::Loaded { text } => {
                let plain = strip_markup(text);
                plain
                    .split("\n\n")
                    .map(str::trim)
                    .filter(|paragraph| !paragraph.is_empty())
                    .enumerate()
                    .flat_map(|(i, paragraph)| {
                        let separator = (i > 0).then(String::new);
                        separator.into_iter().chain(wrap(paragraph, width))
                    })
                    .collect()
            }
            HelpPanel::Failed { path, reason } => {
                let message = format!("Could not load {}: {}", path.display(), reason);
                wrap(&message, width)
            }
        }
    }
}

/// Drops tags and decodes the common entities. Block-level closing tags
/// become paragraph breaks.
fn strip_markup(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start].replace('\n', " "));
        let Some(end) = rest[start..].find('>') else {
            rest = "";
            break;
        };
        let tag = rest[start + 1..start + end].trim().to_ascii_lowercase();
        if BREAK_TAGS.contains(&tag.as_str()) {
            out.push_str("\n\n");
        } else if tag == "li" {
            out.push_str("- ");
        }
        rest = &rest[start + end + 1..];
    }
    out.push_str(&rest.replace('\n', " "));

    out.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&alpha;", "α")
        .replace("&delta;", "δ")
        .replace("&amp;", "&")
}

/// Greedy word wrap; words longer than `width` get a line of their own
fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let needed = if line.is_empty() {
            word.chars().count()
        } else {
            line.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}
