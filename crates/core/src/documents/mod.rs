//! Sale, order and quotation documents.
//!
//! All three share one header/lines shape. Totals are always derived from the
//! lines; the stored header totals are a snapshot of this computation.

pub mod error;
pub mod service;
pub mod types;

pub use error::DocumentError;
pub use service::DocumentService;
pub use types::{
    DocumentKind, DocumentStatus, DocumentTotals, LineInput, NewDocumentInput, PricedLine,
    ValidatedDocument,
};
