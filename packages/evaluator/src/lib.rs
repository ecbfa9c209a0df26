//! # Formtree Evaluator
//!
//! Materializes a static layout against one instance's data.
//!
//! ## Purpose
//!
//! The [`ContextBuilder`] walks the default layout-set page by page and emits a
//! [`ComponentContext`] for every component occurrence: one per row of every
//! repeating group, at every nesting level, and one full page tree per data
//! element behind every sub-form. Each context knows the data element it reads
//! from and its index path, so expression evaluation, validation and PDF
//! rendering can address `(component id, index path, data element)` without
//! ever seeing two occurrences collide.
//!
//! ## Determinism
//!
//! Children come out in declaration order, rows in ascending index order and
//! sub-form entries in the instance's data-element order. Building twice from
//! the same layout and the same data snapshot gives equal trees.
//!
//! ## Failure
//!
//! Configuration errors (unknown referenced layout-set, recursive sub-forms)
//! and [`DataAccessor`] failures abort the whole build; there are no partial
//! trees. A missing default data element or an unresolvable collection is not
//! an error and simply yields fewer contexts.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use formtree_evaluator::{GenerateContexts, JsonDataAccessor};
//!
//! let contexts = model.generate_component_contexts(&instance, &accessor).await?;
//! for page in &contexts {
//!     println!("{} -> {} components", page.id(), page.descendants().count());
//! }
//! ```

pub mod accessor;
pub mod builder;
pub mod context;
pub mod error;
pub mod expression;
pub mod json_accessor;

pub use accessor::DataAccessor;
pub use builder::{ContextBuilder, GenerateContexts};
pub use context::{ComponentContext, ContextSummary};
pub use error::{ContextError, ContextResult, DataAccessError};
pub use expression::{referenced_functions, ExpressionError, ExpressionFunction};
pub use json_accessor::JsonDataAccessor;
