//! Marker detection over captured page text.
//!
//! Text is first folded by [`normalize::tokenize`] (width, case, whitespace),
//! then matched against declarative rule tables: [`rules::MARKER_RULES`] for
//! the [`FlagSet`](yk_domain::flags::FlagSet) markers and
//! [`lexicon::DRUG_LEXICON`] for the drug classes that drive order profiling.

pub mod detector;
pub mod lexicon;
pub mod normalize;
pub mod rules;

pub use detector::FlagDetector;
pub use lexicon::{classify_order, DrugClass, OrderProfile};
