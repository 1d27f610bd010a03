mod aligner;
mod context;
mod dialogue_act;
mod doc_index;
mod error;
mod ports;
mod serializer;
mod types;

pub use aligner::*;
pub use context::*;
pub use dialogue_act::*;
pub use doc_index::*;
pub use error::*;
pub use ports::*;
pub use serializer::*;
pub use types::*;
