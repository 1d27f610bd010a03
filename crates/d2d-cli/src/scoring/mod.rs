mod sacrebleu;
mod squad;

pub use sacrebleu::*;
pub use squad::*;
