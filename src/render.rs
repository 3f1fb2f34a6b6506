pub mod composite;
pub mod label;
