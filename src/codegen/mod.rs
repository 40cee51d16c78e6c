//! Conversion code synthesis between the domain and wire-schema models.
//!
//! Given a destination struct and the request/response structs of a service
//! interface, [`ConversionSynthesizer`] emits the Go field assignments that
//! copy one shape into the other. Reads go through [`AccessPath`]s, which
//! know which pointers must be checked before a field can be read.
//!
//! ```text
//! TypeModel + Interface ──► request_response_pairs ──► [RequestResponse]
//!                                                          │
//! StructTable(s) ──► StructIndex ──► ConversionSynthesizer::generate
//!                                         │
//!                                         ▼
//!                                  "Name: expr,\n" ...
//! ```

mod alias;
mod error;
mod index;
mod pairing;
mod synthesizer;

pub use alias::{AccessPath, FlatAlias, NilGuard, ShapeAlias};
pub use error::SynthesisError;
pub use index::StructIndex;
pub use pairing::{RequestResponse, request_response_pairs};
pub use synthesizer::ConversionSynthesizer;
