//! Background pick worker for the interactive panel
//!
//! Listing directories is blocking I/O, so the panel never runs a pick on
//! its input loop. Requests go to a worker task over a channel and the
//! frame loop polls for the reply. One request is in flight at a time; the
//! operation is user-paced and there is no cancellation.

use crate::cooldown;
use crate::launcher::Launched;
use crate::listing::FsSource;
use crate::selector::{self, OpenReport, Selection};
use crate::store::Profile;
use tokio::sync::{mpsc, oneshot};

/// What the panel shows about the most recent pick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickSummary {
    pub folder_name: String,
    /// `None` when the folder held nothing openable
    pub file_name: Option<String>,
    pub cooldown_notice: bool,
    /// Extra note about the launch (fallback used, launch failed)
    pub launch_note: Option<String>,
}

/// Worker-side view of the pick lifecycle
#[derive(Debug, Clone)]
pub enum PickState {
    Idle,
    Running,
    Finished(PickSummary),
    Failed(String),
}

enum PickRequest {
    Run {
        root_id: String,
        response_tx: oneshot::Sender<Result<PickSummary, String>>,
    },
    Shutdown,
}

/// Synchronous handle used by the panel's frame loop.
pub struct PickWorker {
    runtime: tokio::runtime::Runtime,
    request_tx: mpsc::Sender<PickRequest>,
    state: PickState,
    receiver: Option<oneshot::Receiver<Result<PickSummary, String>>>,
}

impl PickWorker {
    pub fn new() -> Self {
        let runtime = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
        let (request_tx, request_rx) = mpsc::channel(8);
        runtime.spawn(worker_loop(request_rx));

        Self {
            runtime,
            request_tx,
            state: PickState::Idle,
            receiver: None,
        }
    }

    /// Queues a pick for `root_id`. Returns false while a pick is already
    /// in flight.
    pub fn request(&mut self, root_id: &str) -> bool {
        if self.receiver.is_some() {
            return false;
        }

        let (response_tx, response_rx) = oneshot::channel();
        let request = PickRequest::Run {
            root_id: root_id.to_string(),
            response_tx,
        };
        let sender = self.request_tx.clone();
        let queued = self
            .runtime
            .block_on(async move { sender.send(request).await })
            .is_ok();

        if queued {
            self.receiver = Some(response_rx);
            self.state = PickState::Running;
        }
        queued
    }

    /// Non-blocking poll, called once per frame.
    pub fn poll(&mut self) -> PickState {
        if let Some(rx) = &mut self.receiver {
            match rx.try_recv() {
                Ok(Ok(summary)) => {
                    self.state = PickState::Finished(summary);
                    self.receiver = None;
                }
                Ok(Err(message)) => {
                    self.state = PickState::Failed(message);
                    self.receiver = None;
                }
                Err(oneshot::error::TryRecvError::Empty) => {}
                Err(oneshot::error::TryRecvError::Closed) => {
                    self.state = PickState::Failed("pick worker went away".to_string());
                    self.receiver = None;
                }
            }
        }
        self.state.clone()
    }

    /// Consumes a finished or failed pick once, resetting to idle.
    pub fn take_result(&mut self) -> Option<PickState> {
        let state = self.poll();
        match state {
            PickState::Finished(_) | PickState::Failed(_) => {
                self.state = PickState::Idle;
                Some(state)
            }
            _ => None,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.receiver.is_some()
    }
}

impl Default for PickWorker {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for PickWorker {
    fn drop(&mut self) {
        let sender = self.request_tx.clone();
        let _ = self
            .runtime
            .block_on(async move { sender.send(PickRequest::Shutdown).await });
    }
}

async fn worker_loop(mut request_rx: mpsc::Receiver<PickRequest>) {
    while let Some(request) = request_rx.recv().await {
        match request {
            PickRequest::Run {
                root_id,
                response_tx,
            } => {
                let result = tokio::task::spawn_blocking(move || run_pick(&root_id))
                    .await
                    .unwrap_or_else(|e| Err(format!("pick task panicked: {e}")));
                let _ = response_tx.send(result);
            }
            PickRequest::Shutdown => break,
        }
    }
}

/// Loads the profile fresh, runs the pick, and persists the profile: the
/// same read-modify-write cycle a one-shot invocation performs, so both
/// surfaces agree on state.
fn run_pick(root_id: &str) -> Result<PickSummary, String> {
    let mut profile = Profile::load().map_err(|e| e.to_string())?;
    let mut rng = rand::thread_rng();
    let report = selector::pick_and_open(
        &mut profile,
        &FsSource,
        root_id,
        &mut rng,
        cooldown::now_millis(),
    )
    .map_err(|e| e.to_string())?;
    profile.save().map_err(|e| e.to_string())?;
    Ok(summarize(&report))
}

pub(crate) fn summarize(report: &OpenReport) -> PickSummary {
    match &report.selection {
        Selection::Picked(pick) => {
            let launch_note = match &report.launch {
                Some(Ok(Launched { app: None })) => {
                    Some("opened with the default handler".to_string())
                }
                Some(Ok(Launched { app: Some(_) })) => None,
                Some(Err(e)) => Some(e.to_string()),
                None => None,
            };
            PickSummary {
                folder_name: pick.folder_name.clone(),
                file_name: Some(pick.file.name.clone()),
                cooldown_notice: pick.cooldown_notice,
                launch_note,
            }
        }
        Selection::NoMedia { folder_name } => PickSummary {
            folder_name: folder_name.clone(),
            file_name: None,
            cooldown_notice: false,
            launch_note: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LaunchError;
    use crate::listing::Entry;
    use crate::media::MediaKind;
    use crate::selector::Pick;

    fn report(selection: Selection, launch: Option<Result<Launched, LaunchError>>) -> OpenReport {
        OpenReport { selection, launch }
    }

    fn sample_pick() -> Pick {
        Pick {
            folder_id: "/r/Y".to_string(),
            folder_name: "Y".to_string(),
            file: Entry::file("/r/Y/1.png"),
            kind: MediaKind::Image,
            cooldown_notice: false,
            used_root: false,
        }
    }

    #[test]
    fn test_summary_for_clean_pick() {
        let r = report(
            Selection::Picked(sample_pick()),
            Some(Ok(Launched {
                app: Some("feh".to_string()),
            })),
        );
        let summary = summarize(&r);
        assert_eq!(summary.folder_name, "Y");
        assert_eq!(summary.file_name.as_deref(), Some("1.png"));
        assert!(summary.launch_note.is_none());
    }

    #[test]
    fn test_summary_notes_default_handler_fallback() {
        let r = report(
            Selection::Picked(sample_pick()),
            Some(Ok(Launched { app: None })),
        );
        let summary = summarize(&r);
        assert_eq!(
            summary.launch_note.as_deref(),
            Some("opened with the default handler")
        );
    }

    #[test]
    fn test_summary_carries_launch_failure() {
        let r = report(
            Selection::Picked(sample_pick()),
            Some(Err(LaunchError::NoHandler {
                app: "feh".to_string(),
            })),
        );
        let summary = summarize(&r);
        assert!(summary.launch_note.unwrap().contains("feh"));
    }

    #[test]
    fn test_summary_for_no_media() {
        let r = report(
            Selection::NoMedia {
                folder_name: "docs".to_string(),
            },
            None,
        );
        let summary = summarize(&r);
        assert_eq!(summary.folder_name, "docs");
        assert!(summary.file_name.is_none());
    }
}
