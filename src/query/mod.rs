pub mod handlers;
pub mod mask;
pub mod queries;
