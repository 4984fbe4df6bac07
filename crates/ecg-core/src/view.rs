//! View models for the two screens of the analyzer.
//!
//! The front-end never inspects session internals directly: it asks for a
//! [`Screen`] and renders whatever that says. Both views also implement
//! `Display` for plain-text front-ends.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::session::AnalyzerSession;
use crate::upload::Preview;

/// Number of placeholder lines shown while an analysis loads.
pub const SKELETON_LINES: usize = 6;

/// Which of the two screens is showing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActiveView {
    /// Batch editing and submission.
    #[default]
    Upload,
    /// Loading, error, or analysis text.
    Result,
}

/// One row of the upload view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadItem {
    /// Position in the batch
    pub index: usize,
    /// File name
    pub name: String,
    /// Size in bytes
    pub byte_size: u64,
    /// Preview state
    pub preview: Preview,
}

/// The upload screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadView {
    /// Batch entries in display order
    pub items: Vec<UploadItem>,
    /// How many more images may be added
    pub remaining_slots: usize,
    /// Whether the submit action is enabled
    pub can_submit: bool,
    /// Label of the submit action
    pub submit_label: &'static str,
}

/// The result screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultView {
    /// Nothing has been submitted yet.
    Empty,
    /// Analysis in flight; render a skeleton.
    Loading {
        /// Number of placeholder lines
        skeleton_lines: usize,
    },
    /// The analysis failed.
    Error {
        /// Message for the error banner
        message: String,
    },
    /// The analysis text, one paragraph per line.
    Analysis {
        /// Non-blank lines of the analysis
        paragraphs: Vec<String>,
    },
}

/// What the front-end should draw right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// The upload screen
    Upload(UploadView),
    /// The result screen
    Result(ResultView),
}

impl Screen {
    /// Builds the screen for the session's active view.
    pub fn render(session: &AnalyzerSession) -> Self {
        match session.view() {
            ActiveView::Upload => Screen::Upload(UploadView::render(session)),
            ActiveView::Result => Screen::Result(ResultView::render(session)),
        }
    }
}

impl UploadView {
    /// Builds the upload view.
    pub fn render(session: &AnalyzerSession) -> Self {
        let batch = session.batch();
        let items = batch
            .entries()
            .iter()
            .zip(session.previews())
            .enumerate()
            .map(|(index, (entry, preview))| UploadItem {
                index,
                name: entry.file.name.clone(),
                byte_size: entry.file.byte_size(),
                preview,
            })
            .collect();

        let max = session.upload().validator().max_images();
        let loading = session.analysis().is_loading();

        Self {
            items,
            remaining_slots: max.saturating_sub(batch.len()),
            can_submit: session.can_submit(),
            submit_label: if loading { "Analyzing..." } else { "Analyze ECG" },
        }
    }
}

impl ResultView {
    /// Builds the result view.
    pub fn render(session: &AnalyzerSession) -> Self {
        let analysis = session.analysis();
        if analysis.is_loading() {
            return ResultView::Loading {
                skeleton_lines: SKELETON_LINES,
            };
        }
        if let Some(message) = analysis.error() {
            return ResultView::Error {
                message: message.to_string(),
            };
        }
        if analysis.result().is_empty() {
            return ResultView::Empty;
        }
        ResultView::Analysis {
            paragraphs: paragraphs(analysis.result()),
        }
    }
}

/// Splits analysis text into paragraphs, one per non-blank line.
pub fn paragraphs(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

impl fmt::Display for UploadView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.items.is_empty() {
            writeln!(f, "No ECG images selected (JPG, PNG, GIF up to 10MB)")?;
        }
        for item in &self.items {
            let preview = match item.preview {
                Preview::Pending => "loading preview",
                Preview::Ready(_) => "preview ready",
            };
            writeln!(
                f,
                "  [{}] {} ({} bytes, {preview})",
                item.index + 1,
                item.name,
                item.byte_size
            )?;
        }
        writeln!(f, "{} more image(s) allowed", self.remaining_slots)?;
        let state = if self.can_submit { "" } else { " (disabled)" };
        write!(f, "[{}]{state}", self.submit_label)
    }
}

impl fmt::Display for ResultView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultView::Empty => write!(f, "No ECG image analyzed yet"),
            ResultView::Loading { skeleton_lines } => {
                for _ in 0..*skeleton_lines {
                    writeln!(f, "░░░░░░░░░░░░░░░░░░░░░░░░")?;
                }
                Ok(())
            }
            ResultView::Error { message } => write!(f, "Error: {message}"),
            ResultView::Analysis { paragraphs } => {
                for paragraph in paragraphs {
                    writeln!(f, "{paragraph}")?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Screen::Upload(view) => fmt::Display::fmt(view, f),
            Screen::Result(view) => fmt::Display::fmt(view, f),
        }
    }
}
