use serde::{Deserialize, Serialize};
use sha2::Digest;
use std::path::Path;

use crate::error::LoadError;
use crate::tree::{DecisionTree, TreeNode};

/// Artifact layout version understood by this crate.
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// Descriptive metadata of a loaded artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelManifest {
    pub name: String,
    pub description: Option<String>,
    pub created_at: Option<String>,
    pub format_version: u32,
    /// Lowercase hex SHA-256 of the artifact bytes.
    pub digest: String,
    pub size: usize,
}

/// On-disk representation: a flattened tree plus metadata, as exported by
/// the offline training pipeline.
#[derive(Debug, Serialize, Deserialize)]
struct ArtifactDocument {
    format_version: u32,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    feature_names: Vec<String>,
    classes: Vec<u8>,
    nodes: Vec<TreeNode>,
}

/// The pre-trained classifier. Immutable once loaded.
#[derive(Debug, Clone)]
pub struct ModelArtifact {
    manifest: ModelManifest,
    tree: DecisionTree,
}

impl ModelArtifact {
    /// Reads and validates an artifact file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        log::debug!("Loading model artifact from {}", path.display());

        let bytes = std::fs::read(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                LoadError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                LoadError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        let artifact = Self::from_bytes(&bytes)?;
        log::info!(
            "Loaded model artifact '{}' ({} nodes, digest {})",
            artifact.manifest.name,
            artifact.tree.node_count(),
            artifact.manifest.digest
        );
        Ok(artifact)
    }

    /// Parses and validates an artifact held in memory.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LoadError> {
        let document: ArtifactDocument = serde_json::from_slice(bytes)?;
        if document.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(LoadError::UnsupportedVersion {
                found: document.format_version,
                supported: ARTIFACT_FORMAT_VERSION,
            });
        }

        let tree = DecisionTree::new(document.feature_names, document.classes, document.nodes)?;
        let manifest = ModelManifest {
            name: document.name,
            description: document.description,
            created_at: document.created_at,
            format_version: document.format_version,
            digest: hex_digest(bytes),
            size: bytes.len(),
        };

        Ok(Self { manifest, tree })
    }

    /// Wraps an in-memory tree, e.g. one built programmatically.
    pub fn from_tree(name: impl Into<String>, tree: DecisionTree) -> Self {
        let document = ArtifactDocument {
            format_version: ARTIFACT_FORMAT_VERSION,
            name: name.into(),
            description: None,
            created_at: None,
            feature_names: tree.feature_names().to_vec(),
            classes: tree.classes().to_vec(),
            nodes: tree.nodes().to_vec(),
        };
        // Serializing plain strings, integers and finite floats cannot fail.
        let bytes = serde_json::to_vec(&document).unwrap_or_default();
        let manifest = ModelManifest {
            name: document.name,
            description: None,
            created_at: None,
            format_version: ARTIFACT_FORMAT_VERSION,
            digest: hex_digest(&bytes),
            size: bytes.len(),
        };
        Self { manifest, tree }
    }

    pub fn manifest(&self) -> &ModelManifest {
        &self.manifest
    }

    pub fn tree(&self) -> &DecisionTree {
        &self.tree
    }
}

fn hex_digest(bytes: &[u8]) -> String {
    sha2::Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}
