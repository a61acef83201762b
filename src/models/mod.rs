pub mod category;
pub mod evaluation;
pub mod merged;
pub mod utterance;

pub use category::*;
pub use evaluation::*;
pub use merged::*;
pub use utterance::*;
