pub mod components;
pub mod contexts;

pub use components::{components, ComponentsArgs};
pub use contexts::{contexts, ContextsArgs};
