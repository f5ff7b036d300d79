pub mod health;
pub mod matches;
pub mod members;
pub mod routes;
pub mod team_balance;
