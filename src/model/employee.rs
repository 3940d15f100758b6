use std::fmt;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// An employee decoded from the remote envelope.
///
/// Yearly salary is derived on demand from the monthly figure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employee {
    pub id: u64,
    pub name: String,
    /// Monthly salary, whole currency units.
    pub salary: i64,
    pub age: i64,
}

impl Employee {
    pub fn new(id: u64, name: impl Into<String>, salary: i64, age: i64) -> Self {
        Self {
            id,
            name: name.into(),
            salary,
            age,
        }
    }

    pub fn yearly_salary(&self) -> i64 {
        self.salary * 12
    }

    /// Salary after a flat 10% raise.
    pub fn promotion(&self) -> f64 {
        self.salary as f64 * 1.10
    }
}

impl fmt::Display for Employee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Employee(id={}, name='{}', salary={}, age={})",
            self.id, self.name, self.salary, self.age
        )
    }
}

/// Insert shape for the `employees` table.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEmployeeRow {
    pub name: String,
    pub monthly_salary: Decimal,
    pub age: i64,
    pub yearly_salary: Decimal,
}

impl NewEmployeeRow {
    pub fn new(name: &str, monthly_salary: Decimal, age: i64) -> Self {
        Self {
            name: name.to_string(),
            monthly_salary,
            age,
            yearly_salary: monthly_salary * Decimal::from(12),
        }
    }
}

impl From<&Employee> for NewEmployeeRow {
    fn from(emp: &Employee) -> Self {
        Self {
            name: emp.name.clone(),
            monthly_salary: Decimal::from(emp.salary),
            age: emp.age,
            yearly_salary: Decimal::from(emp.yearly_salary()),
        }
    }
}

/// A row read back from the `employees` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EmployeeRow {
    pub emp_id: i64,
    pub name: String,
    pub monthly_salary: Decimal,
    pub age: i64,
    pub yearly_salary: Decimal,
}

/// The fixed seed set written by `init` and `reset`.
pub fn sample_employees() -> Vec<NewEmployeeRow> {
    vec![
        NewEmployeeRow::new("Tiger Nixon", dec!(320800.00), 61),
        NewEmployeeRow::new("Garrett Winters", dec!(170750.00), 63),
        NewEmployeeRow::new("Ashton Cox", dec!(86000.00), 66),
        NewEmployeeRow::new("Cedric Kelly", dec!(433060.00), 22),
        NewEmployeeRow::new("Airi Satou", dec!(162700.00), 33),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn display_matches_report_format() {
        let emp = Employee::new(1, "Tiger Nixon", 320800, 61);
        assert_eq!(
            emp.to_string(),
            "Employee(id=1, name='Tiger Nixon', salary=320800, age=61)"
        );
    }

    #[test]
    fn row_carries_computed_yearly_salary() {
        let emp = Employee::new(7, "Airi Satou", 162700, 33);
        let row = NewEmployeeRow::from(&emp);

        assert_eq!(row.name, "Airi Satou");
        assert_eq!(row.monthly_salary, dec!(162700));
        assert_eq!(row.yearly_salary, dec!(1952400));
        assert_eq!(row.age, 33);
    }

    #[test]
    fn sample_set_has_consistent_yearly_salaries() {
        let rows = sample_employees();
        assert_eq!(rows.len(), 5);
        for row in &rows {
            assert_eq!(row.yearly_salary, row.monthly_salary * dec!(12));
        }
        assert_eq!(rows[0].yearly_salary, dec!(3849600.00));
    }

    proptest! {
        #[test]
        fn yearly_salary_is_twelve_months(m in -1_000_000_000i64..1_000_000_000) {
            let emp = Employee::new(1, "x", m, 30);
            prop_assert_eq!(emp.yearly_salary(), m * 12);
        }

        #[test]
        fn promotion_is_ten_percent_raise(s in 0i64..10_000_000) {
            let emp = Employee::new(1, "x", s, 30);
            let expected = s as f64 * 1.1;
            let diff = (emp.promotion() - expected).abs();
            prop_assert!(diff <= 1e-6 * expected.max(1.0), "promotion({s}) = {}", emp.promotion());
        }
    }
}
