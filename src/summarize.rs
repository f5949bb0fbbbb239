//! Summarization collaborator seam.
//!
//! The engine consumes already-summarized text. Whatever produces that text sits behind
//! [`Summarizer`]; its failures never reach composition because
//! [`summarize_or_placeholder`] swaps in a fixed placeholder.

use tracing::warn;

use crate::config::SummaryConfig;

pub trait Summarizer {
    fn summarize(&self, description: &str) -> anyhow::Result<String>;
}

/// Passes the description through unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct Verbatim;

impl Summarizer for Verbatim {
    fn summarize(&self, description: &str) -> anyhow::Result<String> {
        Ok(description.to_owned())
    }
}

impl<F> Summarizer for F
where
    F: Fn(&str) -> anyhow::Result<String>,
{
    fn summarize(&self, description: &str) -> anyhow::Result<String> {
        self(description)
    }
}

/// Run `summarizer`, substituting the configured placeholder on error or blank output.
pub fn summarize_or_placeholder(
    summarizer: &dyn Summarizer,
    description: &str,
    cfg: &SummaryConfig,
) -> String {
    match summarizer.summarize(description) {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => {
            warn!("summarizer returned no text; using placeholder");
            cfg.placeholder.clone()
        }
        Err(e) => {
            warn!(error = %e, "summarizer failed; using placeholder");
            cfg.placeholder.clone()
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/summarize/summarize.rs"]
mod tests;
