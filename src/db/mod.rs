// src/db/mod.rs

pub mod connection;
pub mod migrations;

pub use connection::{
    create_connection_pool, create_connection_pool_at, database_path, ConnectionPool, PooledConn,
};
pub use migrations::{initialize_database, verify_database_integrity};

#[cfg(test)]
pub use connection::create_test_pool;
