//! Structure import collaborator.
//!
//! When a resource declares an import type, the executor hands the
//! substituted import name, the response payload and the resolved
//! metadata to a [`StructureImporter`]. The actual molecule parsing,
//! bond inference and workspace attachment live in the host; this crate
//! only defines the seam.

use crate::models::ImportType;
use std::fmt;

/// Errors an importer can report back to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    /// The file type is configurable but has no importer yet
    /// (`.pdf` and `.nanome`).
    Unsupported(ImportType),

    /// The host failed to import the payload.
    Failed(String),
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::Unsupported(ty) => {
                write!(f, "{} import is not supported yet", ty)
            }
            ImportError::Failed(msg) => write!(f, "import failed: {}", msg),
        }
    }
}

impl std::error::Error for ImportError {}

/// Collaborator that turns a response payload into a structure in the
/// host workspace.
///
/// Implementations accept `.pdb`, `.cif`, `.sdf` and `.json` payloads and
/// reject `.pdf` and `.nanome` with [`ImportError::Unsupported`].
/// `metadata` is an opaque side-channel string (usually JSON) attached to
/// the imported structure; empty means none.
pub trait StructureImporter {
    fn import(
        &self,
        name: &str,
        filetype: ImportType,
        contents: &str,
        metadata: &str,
    ) -> Result<(), ImportError>;
}

/// Importer for hosts without a viewer attached: accepts every supported
/// type without doing anything, and rejects the unsupported ones exactly
/// as a real host would.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullImporter;

impl StructureImporter for NullImporter {
    fn import(
        &self,
        _name: &str,
        filetype: ImportType,
        _contents: &str,
        _metadata: &str,
    ) -> Result<(), ImportError> {
        match filetype {
            ImportType::Pdf | ImportType::Nanome => Err(ImportError::Unsupported(filetype)),
            ImportType::Pdb | ImportType::Cif | ImportType::Sdf | ImportType::Json => Ok(()),
        }
    }
}
