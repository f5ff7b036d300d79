pub mod balance;
pub mod members;
pub mod result;
pub mod stats;
pub mod tiers;
pub mod types;
