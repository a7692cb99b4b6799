pub mod backend;
pub mod io;
pub mod item;
pub mod logging;
pub mod notification;
pub mod rows;
pub mod session;
pub mod validation;
pub mod view_model;
pub mod view_state;

pub use backend::{initial_manifest, ContainerBackend, FsBackend};
pub use io::{IoCompletion, IoFailure, IoOperation, IoOrchestrator, IoOutput, Waker};
pub use item::TextItem;
pub use logging::{init_logging, logging_status, LoggingError};
pub use notification::{
    Notification, NotificationKind, NOTHING_LOADED_MESSAGE, SAVE_REJECTED_MESSAGE,
    SAVE_SUCCEEDED_MESSAGE,
};
pub use rows::{ProjectRow, RowConversionError, SourceRow, UNKNOWN_CATEGORY};
pub use session::ContainerSession;
pub use validation::{stage_for_save, SaveRejection};
pub use view_model::{DirectoryChooser, EditorViewModel, CREATE_CAPTION, OPEN_CAPTION};
pub use view_state::{
    format_date, parse_date, remove_item, today, FlushError, LoadError, ManifestViewState,
    ISO_DATE_FORMAT,
};
