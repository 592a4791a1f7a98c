pub mod category;
pub mod diagnostic;
pub mod error;
pub mod heading;
pub mod metadata;

pub use category::Category;
pub use diagnostic::{Diagnostic, DiagnosticKind, Severity, count_kind};
pub use error::{Result, ResultExt, WeaveError};
pub use heading::{HeadingRecord, Position};
pub use metadata::Metadata;
