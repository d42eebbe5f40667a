pub mod commands;
pub mod eligibility;
pub mod resolver;
