//! # Formtree Layout
//!
//! Static side of a form: layout-sets made of pages, pages made of component
//! trees.
//!
//! ## Storage
//!
//! Every page owns its components in a flat arena (`Vec<Component>`); group
//! children are [`NodeId`]s into that arena. The page root is a synthetic
//! `Page` group whose id is the page name. The same arena doubles as the
//! component lookup index, so `(page, id)` resolves in O(1) without any
//! self-referential borrowing.
//!
//! Layout-sets reference each other only by id (sub-forms), and the
//! [`LayoutModel`] registry resolves those ids. Nothing here is mutated after
//! construction.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use formtree_layout::{loader, LayoutModel};
//!
//! let sets = loader::load_layout_sets(&app_dir.join("layout-sets.json"), &app_dir.join("layouts"))?;
//! let model = LayoutModel::new(sets, None)?;
//! let field = model.get_component("page1", "field1")?;
//! ```

pub mod component;
pub mod error;
pub mod layout_set;
pub mod loader;
pub mod model;
pub mod page;
pub mod visitor;

pub use component::{Component, ComponentKind, ModelBinding, NodeId, GROUP_BINDING};
pub use error::{LayoutError, LayoutResult};
pub use layout_set::LayoutSet;
pub use model::{ComponentIter, LayoutModel};
pub use page::{Page, RawComponent};
pub use visitor::Visitor;
