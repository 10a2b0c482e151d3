pub mod catalog;
pub mod declared;
