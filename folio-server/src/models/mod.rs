//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod validation;
pub mod slug;
pub mod text;
pub mod technology_ids;
pub mod paragraphs;
pub mod patch;

pub use validation::ValidationError;
pub use slug::Slug;
pub use text::RequiredText;
pub use technology_ids::TechnologyIds;
pub use paragraphs::Paragraphs;
pub use patch::nullable;
