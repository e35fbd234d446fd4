pub mod jwt;
pub mod schedule;
