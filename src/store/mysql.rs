use async_trait::async_trait;
use sqlx::mysql::MySqlConnection;
use sqlx::{Connection, Executor};
use tracing::{debug, error, info};

use super::EmployeeStore;
use crate::model::employee::{EmployeeRow, NewEmployeeRow};

const CREATE_TABLE_BODY: &str = r#"
    emp_id INT AUTO_INCREMENT PRIMARY KEY,
    name TEXT NOT NULL,
    monthly_salary DECIMAL(10, 2) NOT NULL,
    age INT NOT NULL,
    yearly_salary DECIMAL(10, 2) NOT NULL
"#;

/// `EmployeeStore` over one borrowed MySQL connection.
pub struct MySqlEmployeeStore<'c> {
    conn: &'c mut MySqlConnection,
}

impl<'c> MySqlEmployeeStore<'c> {
    pub fn new(conn: &'c mut MySqlConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl<'c> EmployeeStore for MySqlEmployeeStore<'c> {
    async fn ensure_table(&mut self) -> Result<(), sqlx::Error> {
        let sql = format!("CREATE TABLE IF NOT EXISTS employees ({CREATE_TABLE_BODY})");
        (&mut *self.conn).execute(sql.as_str()).await?;
        info!("Employees table created or already exists");
        Ok(())
    }

    async fn recreate_table(&mut self) -> Result<(), sqlx::Error> {
        (&mut *self.conn)
            .execute("DROP TABLE IF EXISTS employees")
            .await?;
        debug!("Dropped old employees table if it existed");

        let sql = format!("CREATE TABLE employees ({CREATE_TABLE_BODY})");
        (&mut *self.conn).execute(sql.as_str()).await?;
        info!("Created new employees table");
        Ok(())
    }

    async fn clear(&mut self) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM employees")
            .execute(&mut *self.conn)
            .await?;

        info!(rows = result.rows_affected(), "Cleared employees table");
        Ok(result.rows_affected())
    }

    async fn insert_all(&mut self, rows: &[NewEmployeeRow]) -> Result<u64, sqlx::Error> {
        let mut tx = self.conn.begin().await?;
        let mut inserted = 0u64;

        for row in rows {
            let result = sqlx::query(
                r#"
                INSERT INTO employees (name, monthly_salary, age, yearly_salary)
                VALUES (?, ?, ?, ?)
                "#,
            )
            .bind(row.name.as_str())
            .bind(row.monthly_salary)
            .bind(row.age)
            .bind(row.yearly_salary)
            .execute(&mut *tx)
            .await
            .inspect_err(|e| error!(error = %e, name = %row.name, "Failed to insert employee"))?;

            inserted += result.rows_affected();
        }

        // dropping tx on error rolls back
        tx.commit().await?;
        info!(inserted, "Inserted employees");
        Ok(inserted)
    }

    async fn count(&mut self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM employees")
            .fetch_one(&mut *self.conn)
            .await
    }

    async fn list(&mut self) -> Result<Vec<EmployeeRow>, sqlx::Error> {
        sqlx::query_as::<_, EmployeeRow>(
            r#"
            SELECT emp_id, name, monthly_salary, age, yearly_salary
            FROM employees
            ORDER BY emp_id
            "#,
        )
        .fetch_all(&mut *self.conn)
        .await
    }
}
