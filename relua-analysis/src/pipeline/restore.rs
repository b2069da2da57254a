//! Driving the restoration collaborator over a plan.

use std::time::Instant;

use relua_core::config::RestoreConfig;
use relua_core::errors::{PipelineError, PipelineResult, RestoreError};
use relua_core::events::{
    EventDispatcher, RestoreCompleteEvent, RestoreProgressEvent, RestoreStartedEvent,
};
use relua_core::traits::cancellation::CancellationToken;

use super::plan::{RestorationPlan, RestorationRecord};
use crate::graph::NodeKey;

/// The external code-restoration collaborator (typically a language-model
/// client). Receives records strictly in plan order; transport concerns
/// (retries, rate limits) are its own business.
pub trait Restorer: Send + Sync {
    fn restore(&self, record: &RestorationRecord) -> Result<String, RestoreError>;
}

/// One restored output file.
#[derive(Debug, Clone)]
pub struct RestoredFile {
    pub key: NodeKey,
    pub content: String,
    /// True when the collaborator failed and the original content was kept.
    pub from_fallback: bool,
}

/// Feed the plan's records to the collaborator in order.
///
/// Per-record failures are non-fatal: they are collected on the result,
/// and when `fallback_to_source` is enabled the original content stands in
/// for the failed restoration. Cancellation between records aborts with
/// `PipelineError::Cancelled`.
pub fn restore_in_order(
    plan: &RestorationPlan,
    restorer: &dyn Restorer,
    config: &RestoreConfig,
    events: Option<&EventDispatcher>,
    cancel: Option<&CancellationToken>,
) -> Result<PipelineResult<Vec<RestoredFile>>, PipelineError> {
    use relua_core::traits::cancellation::Cancellable;

    let start = Instant::now();
    let total = plan.records.len();
    if let Some(events) = events {
        events.emit_restore_started(&RestoreStartedEvent {
            total_records: total,
        });
    }

    let mut result: PipelineResult<Vec<RestoredFile>> = PipelineResult::default();
    let mut failed = 0usize;

    for (i, record) in plan.records.iter().enumerate() {
        if cancel.is_some_and(|c| c.is_cancelled()) {
            tracing::info!(processed = i, total, "restoration cancelled");
            return Err(PipelineError::Cancelled);
        }

        match restorer.restore(record) {
            Ok(content) => {
                result.data.push(RestoredFile {
                    key: record.key.clone(),
                    content,
                    from_fallback: false,
                });
            }
            Err(error) => {
                failed += 1;
                tracing::warn!(
                    path = %record.key.display(),
                    error = %error,
                    "restoration failed for record"
                );
                result.add_error(PipelineError::Restore(error));
                if config.effective_fallback_to_source() {
                    result.data.push(RestoredFile {
                        key: record.key.clone(),
                        content: record.content.clone(),
                        from_fallback: true,
                    });
                }
            }
        }

        if let Some(events) = events {
            events.emit_restore_progress(&RestoreProgressEvent {
                processed: i + 1,
                total,
            });
        }
    }

    if let Some(events) = events {
        events.emit_restore_complete(&RestoreCompleteEvent {
            restored: total - failed,
            failed,
            duration_ms: start.elapsed().as_millis() as u64,
        });
    }
    Ok(result)
}
