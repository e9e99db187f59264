pub mod balance;
pub mod constants;
pub mod errors;
pub mod models;
pub mod money;
pub mod planner;
pub mod scope;
pub mod services;
