//! Transformers and the machinery to build and render them.
//!
//! - `Transformer`: the capability shaping a single value
//! - `TransformerRegistry`: constructs transformers from class names and descriptors
//! - `Manager`: default engine rendering items and collections with shaping options

mod engine;
mod projection;
mod registry;
mod transformer;

pub use engine::{Manager, RenderEngine};
pub use projection::{ProjectionParams, ProjectionTransformer};
pub use registry::{Constructor, TransformerFactory, TransformerRegistry};
pub use transformer::{FnTransformer, IdentityTransformer, Transformer};
