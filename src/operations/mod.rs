pub mod approximation;
pub mod modification;
pub mod offset;
pub mod query;
pub mod transform;
