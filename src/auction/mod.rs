pub mod model;
pub mod outcome;
