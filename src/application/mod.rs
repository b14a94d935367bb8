// Application layer: use cases over the in-memory repository.
// Clients (CLI, a UI layer) hold a LedgerService and re-query it whenever
// the repository revision changes.

pub mod error;
pub mod reporting;
pub mod service;

pub use error::*;
pub use reporting::*;
pub use service::*;
