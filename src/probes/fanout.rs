//! Fan-out coordinator
//!
//! Every unit is spawned as its own task. Join handles are kept in declared
//! order and all of them are awaited, so completion order never leaks into
//! the result and a failing unit never cancels its siblings.

use std::future::Future;

use tracing::{debug, error};

use crate::core::error::{ProbeError, ProbeFailure};
use crate::core::model::ProbeResult;

/// Run every task concurrently; results come back in declared order
pub async fn run_all<F>(tasks: Vec<(String, F)>) -> Vec<ProbeResult>
where
    F: Future<Output = ProbeResult> + Send + 'static,
{
    let handles: Vec<_> = tasks
        .into_iter()
        .map(|(title, task)| (title, tokio::spawn(task)))
        .collect();

    debug!(probes = handles.len(), "fan-out started");

    let mut results = Vec::with_capacity(handles.len());
    for (title, handle) in handles {
        let result = match handle.await {
            Ok(result) => result,
            Err(e) => {
                error!(probe = %title, error = %e, "probe task did not complete");
                ProbeResult::failed(title, ProbeError::Panicked(e.to_string()))
            }
        };
        debug!(
            probe = %result.title,
            lines = result.total(),
            ok = result.is_ok(),
            "probe finished"
        );
        results.push(result);
    }
    results
}

/// Report the first failing result in declared order, or hand back all results
pub fn first_error(results: Vec<ProbeResult>) -> Result<Vec<ProbeResult>, ProbeFailure> {
    for result in &results {
        if let Some(error) = &result.error {
            return Err(ProbeFailure {
                title: result.title.clone(),
                source: error.clone(),
            });
        }
    }
    Ok(results)
}
