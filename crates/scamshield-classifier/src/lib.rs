//! Text preprocessing and scam/human classification backed by a trained artifact bundle.
//!
//! The pipeline is `normalize` → `vectorize` → `classify`, and every stage is
//! parameterised by the bundle loaded once at startup (see [`bundle::ArtifactBundle`]).

pub mod bundle;
pub mod error;
pub mod model;
pub mod normalize;
pub mod scan;
pub mod stemmer;
pub mod vectorizer;

pub use bundle::ArtifactBundle;
pub use error::ArtifactError;
pub use scan::{Label, ScanResult};
