//! Table access for the `employees` table.

pub mod mysql;

use async_trait::async_trait;

use crate::model::employee::{EmployeeRow, NewEmployeeRow};

pub use mysql::MySqlEmployeeStore;

#[async_trait]
pub trait EmployeeStore: Send {
    /// Create the table if it does not exist yet.
    async fn ensure_table(&mut self) -> Result<(), sqlx::Error>;

    /// Drop the table (if present) and create it again, empty.
    async fn recreate_table(&mut self) -> Result<(), sqlx::Error>;

    /// Delete every row. Returns the number of rows removed.
    async fn clear(&mut self) -> Result<u64, sqlx::Error>;

    /// Insert all rows inside one transaction, committed once.
    async fn insert_all(&mut self, rows: &[NewEmployeeRow]) -> Result<u64, sqlx::Error>;

    async fn count(&mut self) -> Result<i64, sqlx::Error>;

    async fn list(&mut self) -> Result<Vec<EmployeeRow>, sqlx::Error>;
}
