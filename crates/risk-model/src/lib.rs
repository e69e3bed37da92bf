//! Feature schema, risk labels and the decision-tree artifact of the
//! environmental risk classifier.
//!
//! The classifier is trained offline and exported as plain JSON: an ordered
//! list of split and leaf nodes over named feature columns. This crate loads
//! that export, validates its structure and walks it. It never trains or
//! modifies a tree.
mod artifact;
mod error;
mod record;
mod tree;

pub use artifact::{ARTIFACT_FORMAT_VERSION, ModelArtifact, ModelManifest};
pub use error::{InputError, LoadError, SchemaMismatch, TreeError};
pub use record::*;
pub use tree::{Branch, DecisionStep, DecisionTree, TreeNode};
