use std::fmt::Write;

use crate::model::employee::{Employee, EmployeeRow};

/// The per-employee summary printed by `show`.
pub fn employee_summary(employees: &[Employee], limit: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Loaded {} employees from JSON data\n", employees.len());

    for (i, emp) in employees.iter().take(limit).enumerate() {
        let _ = writeln!(out, "Employee {}:", i + 1);
        let _ = writeln!(out, "  {emp}");
        let _ = writeln!(out, "  Yearly Salary: {}", emp.yearly_salary());
        let _ = writeln!(out, "  Promoted Salary: {:.2}\n", emp.promotion());
    }

    if let Some(first) = employees.first() {
        let _ = writeln!(out, "First employee: {}", first.name);
        let _ = writeln!(out, "Yearly salary: {}", first.yearly_salary());
        let _ = writeln!(out, "Promoted salary: {:.2}", first.promotion());
    }

    out
}

/// The sample line printed by `load` before inserting.
pub fn sample_employee(emp: &Employee) -> String {
    format!(
        "Sample employee: {emp}\nSample yearly salary: {}\n",
        emp.yearly_salary()
    )
}

/// Pipe-separated dump of the table, as printed by `list` and `init`.
pub fn table_rows(rows: &[EmployeeRow]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "ID | Name | Monthly Salary | Age | Yearly Salary");
    let _ = writeln!(out, "{}", "-".repeat(50));

    for row in rows {
        let _ = writeln!(
            out,
            "{} | {} | {} | {} | {}",
            row.emp_id, row.name, row.monthly_salary, row.age, row.yearly_salary
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn summary_respects_limit_and_formats_promotion() {
        let employees: Vec<_> = (1..=7)
            .map(|i| Employee::new(i, format!("E{i}"), 1000, 20))
            .collect();

        let out = employee_summary(&employees, 5);

        assert!(out.starts_with("Loaded 7 employees from JSON data"));
        assert!(out.contains("Employee 5:"));
        assert!(!out.contains("Employee 6:"));
        assert!(out.contains("  Yearly Salary: 12000"));
        assert!(out.contains("  Promoted Salary: 1100.00"));
        assert!(out.ends_with("Promoted salary: 1100.00\n"));
    }

    #[test]
    fn empty_list_has_no_first_employee() {
        let out = employee_summary(&[], 5);
        assert_eq!(out, "Loaded 0 employees from JSON data\n\n");
    }

    #[test]
    fn sample_shows_employee_and_yearly_salary() {
        let emp = Employee::new(1, "Tiger Nixon", 320800, 61);
        assert_eq!(
            sample_employee(&emp),
            "Sample employee: Employee(id=1, name='Tiger Nixon', salary=320800, age=61)\n\
             Sample yearly salary: 3849600\n"
        );
    }

    #[test]
    fn table_lists_each_row() {
        let rows = vec![EmployeeRow {
            emp_id: 1,
            name: "Tiger Nixon".to_string(),
            monthly_salary: dec!(320800.00),
            age: 61,
            yearly_salary: dec!(3849600.00),
        }];

        let out = table_rows(&rows);
        assert!(out.ends_with("1 | Tiger Nixon | 320800.00 | 61 | 3849600.00\n"));
    }
}
