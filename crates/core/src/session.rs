use std::path::Path;

use rceditor_container::ResourceContainer;

/// 目前載入的容器。 / Holds the single container currently being edited.
///
/// The handle is only ever replaced wholesale after a successful open or create.
#[derive(Debug, Default)]
pub struct ContainerSession {
    handle: Option<ResourceContainer>,
}

impl ContainerSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, container: ResourceContainer) -> Option<ResourceContainer> {
        self.handle.replace(container)
    }

    pub fn current(&self) -> Option<&ResourceContainer> {
        self.handle.as_ref()
    }

    pub fn current_mut(&mut self) -> Option<&mut ResourceContainer> {
        self.handle.as_mut()
    }

    pub fn dir(&self) -> Option<&Path> {
        self.handle.as_ref().map(ResourceContainer::dir)
    }
}
