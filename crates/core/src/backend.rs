use std::path::Path;

use rceditor_container::{
    validate, Checking, ContainerError, DublinCore, Manifest, ResourceContainer, ValidationReport,
};

use crate::view_state::{format_date, today};

/// 容器函式庫的邊界。 / Boundary to the container library.
///
/// Implementations run on background worker threads and must not touch UI state.
pub trait ContainerBackend: Send + Sync {
    fn open(&self, dir: &Path) -> Result<ResourceContainer, ContainerError>;
    fn create(&self, dir: &Path) -> Result<ResourceContainer, ContainerError>;
    fn save(&self, container: &ResourceContainer) -> Result<(), ContainerError>;
    fn validate(&self, container: &ResourceContainer) -> ValidationReport;
}

/// Backend over the on-disk container format.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsBackend;

impl ContainerBackend for FsBackend {
    fn open(&self, dir: &Path) -> Result<ResourceContainer, ContainerError> {
        ResourceContainer::open(dir)
    }

    fn create(&self, dir: &Path) -> Result<ResourceContainer, ContainerError> {
        ResourceContainer::create(dir, |manifest| *manifest = initial_manifest())
    }

    fn save(&self, container: &ResourceContainer) -> Result<(), ContainerError> {
        container.write()
    }

    fn validate(&self, container: &ResourceContainer) -> ValidationReport {
        validate(container)
    }
}

/// 新容器的初始 manifest。 / Manifest written into a newly created container.
///
/// Everything is blank except the two dates, which are stamped with today so the container
/// can be reopened before its first save.
pub fn initial_manifest() -> Manifest {
    let stamp = format_date(today());
    let dublin_core = DublinCore {
        issued: stamp.clone(),
        modified: stamp,
        ..DublinCore::default()
    };
    Manifest::new(dublin_core, Vec::new(), Checking::default())
}
