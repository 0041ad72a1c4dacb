//! Document and version entities.

pub mod file_type;
pub mod model;
pub mod version;

pub use file_type::FileType;
pub use model::{
    category_set, ContentUpdate, Document, DocumentPatch, DocumentSort, DocumentSortField,
    NewDocument,
};
pub use version::{DocumentVersion, MetadataAudit, NewVersion};
