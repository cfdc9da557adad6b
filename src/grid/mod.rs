pub mod builder;
pub mod sampler;
pub mod set;
