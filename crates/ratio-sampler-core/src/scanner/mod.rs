pub mod groups;
pub mod walk;

pub use groups::{normalized_extension, ExtensionGroup, ExtensionGroups};
pub use walk::{absolute_root, DirectoryScanner};
