pub mod pool;
pub mod scalar;
pub mod store;
