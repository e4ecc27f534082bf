pub mod memory;
pub mod repository;
pub mod room;
pub mod user;
