use tracing::{info, instrument};

use crate::model::employee::{Employee, NewEmployeeRow, sample_employees};
use crate::store::EmployeeStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    pub cleared: u64,
    pub inserted: u64,
    /// Row count after the load.
    pub total: i64,
}

/// How the table is prepared before seeding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schema {
    CreateIfMissing,
    DropAndRecreate,
}

/// Ensure the table, optionally clear it, then insert every employee in one
/// transaction. Without `clear`, re-running duplicates rows.
#[instrument(skip(store, employees), fields(records = employees.len()))]
pub async fn bulk_load<S>(
    store: &mut S,
    employees: &[Employee],
    clear: bool,
) -> Result<LoadReport, sqlx::Error>
where
    S: EmployeeStore + ?Sized,
{
    store.ensure_table().await?;

    let cleared = if clear { store.clear().await? } else { 0 };

    let rows: Vec<NewEmployeeRow> = employees.iter().map(NewEmployeeRow::from).collect();
    let inserted = store.insert_all(&rows).await?;
    let total = store.count().await?;

    info!(cleared, inserted, total, "Bulk load finished");
    Ok(LoadReport {
        cleared,
        inserted,
        total,
    })
}

/// Prepare the table and insert the fixed sample employees.
#[instrument(skip(store))]
pub async fn seed_samples<S>(store: &mut S, schema: Schema) -> Result<LoadReport, sqlx::Error>
where
    S: EmployeeStore + ?Sized,
{
    match schema {
        Schema::CreateIfMissing => store.ensure_table().await?,
        Schema::DropAndRecreate => store.recreate_table().await?,
    }

    let inserted = store.insert_all(&sample_employees()).await?;
    let total = store.count().await?;

    Ok(LoadReport {
        cleared: 0,
        inserted,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::employee::EmployeeRow;
    use async_trait::async_trait;

    /// Table stand-in; `None` means the table does not exist.
    #[derive(Default)]
    struct MemoryStore {
        rows: Option<Vec<EmployeeRow>>,
        next_id: i64,
        commits: usize,
    }

    impl MemoryStore {
        fn table(&mut self) -> Result<&mut Vec<EmployeeRow>, sqlx::Error> {
            self.rows
                .as_mut()
                .ok_or_else(|| sqlx::Error::Protocol("table employees doesn't exist".into()))
        }
    }

    #[async_trait]
    impl EmployeeStore for MemoryStore {
        async fn ensure_table(&mut self) -> Result<(), sqlx::Error> {
            self.rows.get_or_insert_with(Vec::new);
            Ok(())
        }

        async fn recreate_table(&mut self) -> Result<(), sqlx::Error> {
            self.rows = Some(Vec::new());
            self.next_id = 0;
            Ok(())
        }

        async fn clear(&mut self) -> Result<u64, sqlx::Error> {
            let table = self.table()?;
            let n = table.len() as u64;
            table.clear();
            Ok(n)
        }

        async fn insert_all(&mut self, rows: &[NewEmployeeRow]) -> Result<u64, sqlx::Error> {
            let mut next_id = self.next_id;
            let table = self.table()?;
            for row in rows {
                next_id += 1;
                table.push(EmployeeRow {
                    emp_id: next_id,
                    name: row.name.clone(),
                    monthly_salary: row.monthly_salary,
                    age: row.age,
                    yearly_salary: row.yearly_salary,
                });
            }
            self.next_id = next_id;
            self.commits += 1;
            Ok(rows.len() as u64)
        }

        async fn count(&mut self) -> Result<i64, sqlx::Error> {
            Ok(self.table()?.len() as i64)
        }

        async fn list(&mut self) -> Result<Vec<EmployeeRow>, sqlx::Error> {
            Ok(self.table()?.clone())
        }
    }

    fn employees(k: usize) -> Vec<Employee> {
        (0..k)
            .map(|i| Employee::new(i as u64 + 1, format!("Employee {i}"), 1000 * (i as i64 + 1), 30))
            .collect()
    }

    #[tokio::test]
    async fn clear_then_insert_leaves_exactly_k_rows() {
        let mut store = MemoryStore::default();
        seed_samples(&mut store, Schema::CreateIfMissing).await.unwrap();

        let report = bulk_load(&mut store, &employees(24), true).await.unwrap();

        assert_eq!(report.cleared, 5);
        assert_eq!(report.inserted, 24);
        assert_eq!(report.total, 24);
    }

    #[tokio::test]
    async fn loading_twice_without_clearing_duplicates_rows() {
        let mut store = MemoryStore::default();
        let batch = employees(3);

        bulk_load(&mut store, &batch, false).await.unwrap();
        let report = bulk_load(&mut store, &batch, false).await.unwrap();

        assert_eq!(report.cleared, 0);
        assert_eq!(report.total, 6);
    }

    #[tokio::test]
    async fn load_creates_missing_table_and_commits_once() {
        let mut store = MemoryStore::default();

        let report = bulk_load(&mut store, &employees(4), true).await.unwrap();

        assert_eq!(report.total, 4);
        assert_eq!(store.commits, 1);
        let rows = store.list().await.unwrap();
        assert_eq!(rows[3].yearly_salary, rows[3].monthly_salary * rust_decimal::Decimal::from(12));
    }

    #[tokio::test]
    async fn recreate_seed_discards_previous_rows() {
        let mut store = MemoryStore::default();
        bulk_load(&mut store, &employees(10), false).await.unwrap();

        let report = seed_samples(&mut store, Schema::DropAndRecreate).await.unwrap();

        assert_eq!(report.inserted, 5);
        assert_eq!(report.total, 5);
        assert_eq!(store.list().await.unwrap()[0].emp_id, 1);
    }

    #[tokio::test]
    async fn create_if_missing_seed_keeps_existing_rows() {
        let mut store = MemoryStore::default();
        bulk_load(&mut store, &employees(2), false).await.unwrap();

        let report = seed_samples(&mut store, Schema::CreateIfMissing).await.unwrap();

        assert_eq!(report.total, 7);
    }
}
