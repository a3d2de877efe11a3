//! Runs stage requests off the UI thread.

use crate::api::Transport;
use crate::api::types::UploadResponse;
use crate::error::SculleryError;
use crate::workflow::{Stage, StageOutcome, StageRequest};
use eframe::egui;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Dispatches one [`StageRequest`] at a time onto a worker thread and
/// collects its [`StageOutcome`] on a later frame.
pub struct StageController {
    transport: Arc<dyn Transport>,
    receiver: Option<crossbeam_channel::Receiver<StageOutcome>>,
    busy: Option<Stage>,
    start_time: Option<Instant>,
}

impl StageController {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            receiver: None,
            busy: None,
            start_time: None,
        }
    }

    /// Which stage is currently running, if any.
    pub fn busy(&self) -> Option<Stage> {
        self.busy
    }

    /// Seconds since the running stage was dispatched.
    pub fn elapsed_secs(&self) -> Option<f32> {
        self.start_time.map(|t| t.elapsed().as_secs_f32())
    }

    fn prepare(&mut self, stage: Stage) -> crossbeam_channel::Sender<StageOutcome> {
        self.busy = Some(stage);
        self.start_time = Some(Instant::now());

        let (tx, rx) = crossbeam_channel::unbounded();
        self.receiver = Some(rx);
        tx
    }

    /// Run a request on a worker thread. The workflow's in-flight guard
    /// keeps a second dispatch from landing before this one reports.
    pub fn dispatch(&mut self, ctx: egui::Context, request: StageRequest) {
        let tx = self.prepare(request.stage());
        let transport = Arc::clone(&self.transport);

        std::thread::spawn(move || {
            let outcome = run_request(transport.as_ref(), request);
            if tx.send(outcome).is_err() {
                tracing::error!("Failed to send stage outcome");
            }
            ctx.request_repaint();
        });
    }

    /// Collect a finished outcome, clearing the busy flag with it. A
    /// worker that died without reporting becomes a transport failure,
    /// so the loading indicator can never get stuck.
    pub fn poll(&mut self) -> Option<StageOutcome> {
        let receiver = self.receiver.as_ref()?;
        match receiver.try_recv() {
            Ok(outcome) => {
                self.busy = None;
                self.start_time = None;
                self.receiver = None;
                Some(outcome)
            }
            Err(crossbeam_channel::TryRecvError::Empty) => None,
            Err(crossbeam_channel::TryRecvError::Disconnected) => {
                let stage = self.busy.take();
                self.start_time = None;
                self.receiver = None;
                stage.map(|stage| {
                    failed_outcome(stage, "the request worker stopped unexpectedly")
                })
            }
        }
    }
}

fn run_request(transport: &dyn Transport, request: StageRequest) -> StageOutcome {
    match request {
        StageRequest::Login { username, password } => StageOutcome::Login(
            crate::utils::TOKIO_RUNTIME.block_on(transport.login(&username, &password)),
        ),
        StageRequest::Upload { path } => StageOutcome::Upload(upload_file(transport, &path)),
        StageRequest::Preprocess { filepath, config } => StageOutcome::Preprocess(
            crate::utils::TOKIO_RUNTIME.block_on(transport.preprocess(&filepath, &config)),
        ),
        StageRequest::Export(request) => StageOutcome::Export(
            crate::utils::TOKIO_RUNTIME.block_on(transport.export_to_db(&request)),
        ),
    }
}

/// Read the file here, off the UI thread, then hand the bytes to the
/// transport.
fn upload_file(transport: &dyn Transport, path: &Path) -> crate::error::Result<UploadResponse> {
    let bytes = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload.csv")
        .to_owned();
    crate::utils::TOKIO_RUNTIME.block_on(transport.upload(&file_name, bytes))
}

fn failed_outcome(stage: Stage, message: &str) -> StageOutcome {
    let err = SculleryError::Transport(message.to_owned());
    match stage {
        Stage::Login => StageOutcome::Login(Err(err)),
        Stage::Upload => StageOutcome::Upload(Err(err)),
        Stage::Preprocess => StageOutcome::Preprocess(Err(err)),
        Stage::Export => StageOutcome::Export(Err(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{
        DbExportRequest, ExportResponse, LoginResponse, PreprocessResponse, PreprocessingConfig,
    };
    use crate::error::Result;
    use async_trait::async_trait;

    struct OkLoginTransport;

    #[async_trait]
    impl Transport for OkLoginTransport {
        async fn login(&self, _username: &str, _password: &str) -> Result<LoginResponse> {
            Ok(LoginResponse {
                token: "T1".to_owned(),
            })
        }

        async fn upload(&self, _file_name: &str, _bytes: Vec<u8>) -> Result<UploadResponse> {
            Err(SculleryError::Other("not scripted".to_owned()))
        }

        async fn preprocess(
            &self,
            _filepath: &str,
            _config: &PreprocessingConfig,
        ) -> Result<PreprocessResponse> {
            Err(SculleryError::Other("not scripted".to_owned()))
        }

        async fn export_to_db(&self, _request: &DbExportRequest) -> Result<ExportResponse> {
            Err(SculleryError::Other("not scripted".to_owned()))
        }
    }

    fn wait_for_outcome(controller: &mut StageController) -> StageOutcome {
        for _ in 0..200 {
            if let Some(outcome) = controller.poll() {
                return outcome;
            }
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
        panic!("worker never reported");
    }

    #[test]
    fn test_poll_is_quiet_when_idle() {
        let mut controller = StageController::new(Arc::new(OkLoginTransport));
        assert!(controller.poll().is_none());
        assert_eq!(controller.busy(), None);
    }

    #[test]
    fn test_dispatch_delivers_outcome_and_clears_busy() {
        let mut controller = StageController::new(Arc::new(OkLoginTransport));
        controller.dispatch(
            egui::Context::default(),
            StageRequest::Login {
                username: "alice".to_owned(),
                password: "pw1".to_owned(),
            },
        );
        assert_eq!(controller.busy(), Some(Stage::Login));

        let outcome = wait_for_outcome(&mut controller);
        let StageOutcome::Login(Ok(response)) = outcome else {
            panic!("expected a successful login outcome");
        };
        assert_eq!(response.token, "T1");
        assert_eq!(controller.busy(), None);
    }

    #[test]
    fn test_missing_upload_file_reports_io_failure() {
        let mut controller = StageController::new(Arc::new(OkLoginTransport));
        controller.dispatch(
            egui::Context::default(),
            StageRequest::Upload {
                path: std::path::PathBuf::from("definitely/not/here.csv"),
            },
        );

        let outcome = wait_for_outcome(&mut controller);
        let StageOutcome::Upload(Err(err)) = outcome else {
            panic!("expected the upload to fail before any network call");
        };
        assert!(matches!(err, SculleryError::Io(_)));
    }
}
