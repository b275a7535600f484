use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info, warn};

use mnemo_core::Amendment;

use crate::store::MemoryStore;

/// Outcome of one amendment batch.
#[derive(Debug, Clone, Serialize)]
pub struct ApplyReport {
    pub total: usize,
    pub applied: usize,
    /// 1-based indexes of amendments that did not apply.
    pub skipped: Vec<usize>,
}

impl ApplyReport {
    /// A non-empty batch succeeds only if something actually changed.
    /// An empty batch is a trivial success.
    pub fn success(&self) -> bool {
        self.applied > 0 || self.total == 0
    }
}

/// Apply amendments to `text`, sequentially.
///
/// Each amendment is a single, first-occurrence, literal substring
/// replacement against the progressively updated text — later
/// amendments see the result of earlier ones, never a frozen snapshot.
/// An amendment whose search text is empty or absent is skipped and the
/// batch continues.
pub fn apply_to_text(text: &str, amendments: &[Amendment]) -> (String, ApplyReport) {
    let mut working = text.to_string();
    let mut report = ApplyReport {
        total: amendments.len(),
        applied: 0,
        skipped: Vec::new(),
    };

    for (idx, amendment) in amendments.iter().enumerate() {
        if amendment.search.is_empty() {
            warn!(index = idx + 1, "rejecting amendment with empty search text");
            report.skipped.push(idx + 1);
            continue;
        }

        match working.find(&amendment.search) {
            Some(position) => {
                working.replace_range(
                    position..position + amendment.search.len(),
                    &amendment.replace,
                );
                report.applied += 1;
                debug!(index = idx + 1, total = report.total, "applied amendment");
            }
            None => {
                warn!(
                    index = idx + 1,
                    "amendment search text not found in document"
                );
                report.skipped.push(idx + 1);
            }
        }
    }

    (working, report)
}

/// Apply a batch against the persisted document.
///
/// Persists via [`MemoryStore::save`] only when at least one amendment
/// applied; a batch where nothing applied leaves the file untouched on
/// disk and reports failure without raising an error.
pub fn apply_amendments(store: &MemoryStore, amendments: &[Amendment]) -> Result<ApplyReport> {
    if amendments.is_empty() {
        info!("no amendments to apply");
        return Ok(ApplyReport {
            total: 0,
            applied: 0,
            skipped: Vec::new(),
        });
    }

    let current = store.load()?;
    let (updated, report) = apply_to_text(&current, amendments);

    if report.applied > 0 {
        store.save(&updated)?;
        info!(
            applied = report.applied,
            total = report.total,
            "applied amendment batch"
        );
    } else {
        warn!("no amendments could be applied");
    }

    Ok(report)
}
