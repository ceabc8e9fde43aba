//! Built-in functions and synthetic data.
//!
//! These are ready-made [`EstimateFunction`](crate::EstimateFunction)
//! implementations plus a sampler that generates observations from known
//! coefficients, used by the demos, tests and benchmarks.

pub mod peak;
pub mod synthetic;

pub use peak::SumOfGaussians;
pub use synthetic::{Sample, SyntheticSampler};
