//! Mixture orchestration domain
//!
//! Pure pieces of the pipeline: the result combiner and the stage
//! coordinates used in errors and progress events.

pub mod combiner;
pub mod stage;
