pub mod anthropic;
pub mod google;
pub mod openai;
pub mod registry;
pub mod traits;
pub(crate) mod util;

// Re-exports for convenience.
pub use registry::ProviderRegistry;
pub use traits::{NoteProvider, NoteRequest};
