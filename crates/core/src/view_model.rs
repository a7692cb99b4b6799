use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{error, info, warn};
use rceditor_container::ResourceContainer;

use crate::backend::{ContainerBackend, FsBackend};
use crate::io::{IoCompletion, IoFailure, IoOperation, IoOrchestrator, IoOutput, Waker};
use crate::notification::{Notification, NOTHING_LOADED_MESSAGE, SAVE_SUCCEEDED_MESSAGE};
use crate::session::ContainerSession;
use crate::validation::stage_for_save;
use crate::view_state::ManifestViewState;

pub const CREATE_CAPTION: &str = "Create Resource Container";
pub const OPEN_CAPTION: &str = "Open Resource Container";

/// 目錄選擇器。 / Native directory picker; `None` means the user cancelled.
pub trait DirectoryChooser {
    fn choose_directory(&self, caption: &str) -> Option<PathBuf>;
}

impl<F> DirectoryChooser for F
where
    F: Fn(&str) -> Option<PathBuf>,
{
    fn choose_directory(&self, caption: &str) -> Option<PathBuf> {
        self(caption)
    }
}

/// 編輯器的 view-model。 / Handler surface bound by the editor window.
///
/// Lives on the UI thread. Background results only take effect inside [`pump`] (or
/// [`finish_pending`]), which the host calls from that same thread.
///
/// [`pump`]: EditorViewModel::pump
/// [`finish_pending`]: EditorViewModel::finish_pending
pub struct EditorViewModel {
    backend: Arc<dyn ContainerBackend>,
    io: IoOrchestrator,
    session: ContainerSession,
    view_state: ManifestViewState,
    notifications: Vec<Notification>,
    busy: bool,
    loaded: bool,
    quit_requested: bool,
}

impl Default for EditorViewModel {
    fn default() -> Self {
        Self::new(Arc::new(FsBackend))
    }
}

impl EditorViewModel {
    pub fn new(backend: Arc<dyn ContainerBackend>) -> Self {
        Self {
            backend,
            io: IoOrchestrator::new(),
            session: ContainerSession::new(),
            view_state: ManifestViewState::new(),
            notifications: Vec::new(),
            busy: false,
            loaded: false,
            quit_requested: false,
        }
    }

    /// Registers a callback run by workers after they post a result.
    pub fn with_waker(mut self, waker: Waker) -> Self {
        self.io.set_waker(waker);
        self
    }

    // ------------- Handlers ---------------- //

    pub fn handle_new_document_selected(&mut self, chooser: &dyn DirectoryChooser) {
        if let Some(dir) = chooser.choose_directory(CREATE_CAPTION) {
            self.create_container(dir);
        }
    }

    pub fn handle_open_directory_selected(&mut self, chooser: &dyn DirectoryChooser) {
        if let Some(dir) = chooser.choose_directory(OPEN_CAPTION) {
            self.open_container(dir);
        }
    }

    pub fn handle_save_document_selected(&mut self) {
        self.save_container();
    }

    /// Waits for in-flight operations, applies their results and marks the editor as
    /// ready to close. The host performs the actual window close.
    pub fn handle_app_quit(&mut self) {
        if self.quit_requested {
            return;
        }
        let pending = self.io.in_flight();
        if pending > 0 {
            info!("event=app_quit module=view_model status=waiting pending={pending}");
        }
        self.finish_pending();
        self.quit_requested = true;
        info!("event=app_quit module=view_model status=ok");
    }

    // ------------ Operations -------------- //

    pub fn create_container(&mut self, dir: PathBuf) {
        self.begin_load();
        let backend = self.backend.clone();
        let path = dir.clone();
        info!(
            "event=container_create module=view_model status=start path={}",
            dir.display()
        );
        self.io.spawn(IoOperation::Create, dir, move || {
            backend.create(&path).map(IoOutput::Container)
        });
    }

    pub fn open_container(&mut self, dir: PathBuf) {
        self.begin_load();
        let backend = self.backend.clone();
        let path = dir.clone();
        info!(
            "event=container_open module=view_model status=start path={}",
            dir.display()
        );
        self.io.spawn(IoOperation::Open, dir, move || {
            backend.open(&path).map(IoOutput::Container)
        });
    }

    /// Flushes the form into a staged manifest, validates it and, when accepted, writes
    /// it in the background. A rejected save performs no I/O.
    pub fn save_container(&mut self) {
        let Some(container) = self.session.current() else {
            warn!("event=container_save module=view_model status=skipped reason=not_loaded");
            self.notify(Notification::error(NOTHING_LOADED_MESSAGE));
            return;
        };

        let staged = match stage_for_save(self.backend.as_ref(), &self.view_state, container) {
            Ok(staged) => staged,
            Err(rejection) => {
                self.notify(Notification::error(rejection.to_string()));
                return;
            }
        };

        if let Some(current) = self.session.current_mut() {
            current.manifest = staged.manifest.clone();
        }
        self.busy = true;
        let backend = self.backend.clone();
        let dir = staged.dir().to_path_buf();
        info!(
            "event=container_save module=view_model status=start path={}",
            dir.display()
        );
        self.io.spawn(IoOperation::Save, dir, move || {
            backend.save(&staged).map(|()| IoOutput::Saved)
        });
    }

    /// Applies every completion that has arrived so far. Call once per frame.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Some(completion) = self.io.try_next() {
            self.apply(completion);
            applied += 1;
        }
        applied
    }

    /// Blocks until all in-flight operations finish, then applies their results.
    pub fn finish_pending(&mut self) -> usize {
        let completions = self.io.wait_all();
        let applied = completions.len();
        for completion in completions {
            self.apply(completion);
        }
        applied
    }

    // ------------ State -------------- //

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn container(&self) -> Option<&ResourceContainer> {
        self.session.current()
    }

    pub fn container_dir(&self) -> Option<&Path> {
        self.session.dir()
    }

    pub fn view_state(&self) -> &ManifestViewState {
        &self.view_state
    }

    pub fn view_state_mut(&mut self) -> &mut ManifestViewState {
        &mut self.view_state
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Create and open clear the form before the operation starts; a failed operation
    /// leaves it cleared.
    fn begin_load(&mut self) {
        self.busy = true;
        self.loaded = false;
        self.view_state.clear();
    }

    fn apply(&mut self, completion: IoCompletion) {
        let IoCompletion {
            operation,
            path,
            result,
        } = completion;

        match (operation, result) {
            (IoOperation::Create, Ok(IoOutput::Container(container))) => {
                self.session.replace(container);
                self.view_state.clear();
                self.loaded = true;
                info!(
                    "event=container_create module=view_model status=ok path={}",
                    path.display()
                );
            }
            (IoOperation::Open, Ok(IoOutput::Container(container))) => {
                self.view_state.clear();
                match self.view_state.load(&container.manifest) {
                    Ok(()) => {
                        self.session.replace(container);
                        self.loaded = true;
                        info!(
                            "event=container_open module=view_model status=ok path={}",
                            path.display()
                        );
                    }
                    Err(err) => self.report_failure(operation, &path, err.to_string()),
                }
            }
            (IoOperation::Save, Ok(IoOutput::Saved)) => {
                info!(
                    "event=container_save module=view_model status=ok path={}",
                    path.display()
                );
                self.notify(Notification::success(SAVE_SUCCEEDED_MESSAGE));
            }
            (operation, Ok(_)) => {
                let failure = IoFailure::MissingResult { operation };
                self.report_failure(operation, &path, failure.to_string());
            }
            (operation, Err(failure)) => {
                self.report_failure(operation, &path, failure.to_string());
            }
        }

        self.busy = self.io.in_flight() > 0;
    }

    fn report_failure(&mut self, operation: IoOperation, path: &Path, message: String) {
        error!(
            "event=container_{} module=view_model status=error path={} error={}",
            operation,
            path.display(),
            message
        );
        self.notify(Notification::error(message));
    }

    fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }
}
