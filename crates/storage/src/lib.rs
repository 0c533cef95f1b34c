pub mod repository;
pub mod sqlite;
