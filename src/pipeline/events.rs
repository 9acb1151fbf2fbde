use std::fmt::Display;

pub const UNSUPPORTED_MESSAGE: &str = "Unsupported Spotify URL type.";
pub const COMPLETE_MESSAGE: &str = "All downloads complete.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    /// 0..=100
    pub percent: u8,
    pub message: String,
}

impl ProgressEvent {
    pub fn new(percent: u8, message: impl Into<String>) -> Self {
        Self {
            percent,
            message: message.into(),
        }
    }

    /// Progress announced before item `index` (1-based) of `total` is attempted
    pub fn for_item(index: usize, total: usize, display_query: &str) -> Self {
        let percent = (index * 100 / total.max(1)).min(100) as u8;
        Self::new(percent, format!("Downloading {index}/{total}: {display_query}"))
    }
}

impl Display for ProgressEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:>3}%] {}", self.percent, self.message)
    }
}

/// Counters of one finished run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub downloaded: usize,
    pub failed: usize,
    /// downloaded, but tags or cover could not be fully written
    pub partially_tagged: usize,
}

/// Everything a caller hears about a run, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    Progress(ProgressEvent),
    /// the reference could not be resolved, nothing was downloaded
    Aborted(ProgressEvent),
    /// stopped between items on request
    Cancelled { summary: RunSummary },
    Done {
        progress: ProgressEvent,
        summary: RunSummary,
    },
}
