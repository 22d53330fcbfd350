pub mod exchange;
pub mod generator;
pub mod inventory;
pub mod ports;
pub mod transaction;
