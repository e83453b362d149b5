pub mod deal;
pub mod fields;
pub mod scenarios;
