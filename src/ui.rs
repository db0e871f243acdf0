//! Client-facing UI model: views, placeholders and the tool registry

mod registry;
mod surface;
mod view;

#[allow(unused_imports)] // Public API re-exports
pub use registry::{component, resolve, validate_registry, RegistryError, ToolComponent, ToolKind};
#[allow(unused_imports)]
pub use surface::{
    Placeholder, PlaceholderId, PlaceholderKind, PlaceholderStatus, UiSurface, UiUpdate,
};
pub use view::View;
