//! Human progress on stderr, kept apart from ranking output on stdout.
use skyrank_graph::{ProgressEvent, ProgressObserver};

pub struct StderrProgress;

impl ProgressObserver for StderrProgress {
    fn on_event(&self, event: ProgressEvent) {
        tracing::debug!(?event, "progress");
        if let Some(line) = progress_line(&event) {
            eprintln!("{line}");
        }
    }
}

fn progress_line(event: &ProgressEvent) -> Option<String> {
    match *event {
        ProgressEvent::FollowsLoaded { total } => Some(format!(
            "Loading accounts followed by the {total} accounts you follow:"
        )),
        ProgressEvent::AccountsProcessed { done, .. } => {
            Some(format!("...completed loading follows for {done} accounts"))
        }
        ProgressEvent::AggregationFinished { .. } => Some(String::new()),
        ProgressEvent::ProfilesStarted { total } => {
            Some(format!("Loading {total} account profiles:"))
        }
        ProgressEvent::ProfilesLoaded { done, .. } => {
            Some(format!("...completed loading {done} account profiles"))
        }
        ProgressEvent::EnrichmentFinished { .. } => Some(String::new()),
    }
}
