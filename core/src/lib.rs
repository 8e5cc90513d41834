pub mod catalog;
pub mod completion;
pub mod lint;
pub mod resolver;
pub mod session;
pub mod source;
pub mod symbols;
pub mod token;
pub mod types;

pub use catalog::CandidateKind;
pub use completion::{Candidate, Resolution, ResolutionKey};
pub use lint::{Diagnostic, Severity};
pub use session::{validate, AnalysisSession};
pub use source::{Position, Range};
pub use symbols::{Scope, Symbol, SymbolId, SymbolTable};
pub use types::TypeTag;

#[cfg(test)]
mod completion_test;
#[cfg(test)]
mod resolver_test;
#[cfg(test)]
mod source_test;
#[cfg(test)]
mod token_test;
