use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, de};
use serde_json::Value;
use thiserror::Error;

use super::employee::Employee;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode employees from {path}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Top-level JSON object; the employee list lives under `data`.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub data: Vec<EmployeeRecord>,
}

/// One element of the envelope's `data` array, as sent by the API.
#[derive(Debug, Deserialize)]
pub struct EmployeeRecord {
    pub id: u64,
    pub employee_name: String,
    #[serde(deserialize_with = "monthly_salary")]
    pub employee_salary: i64,
    #[serde(deserialize_with = "integer_like")]
    pub employee_age: i64,
}

impl From<EmployeeRecord> for Employee {
    fn from(rec: EmployeeRecord) -> Self {
        Employee::new(rec.id, rec.employee_name, rec.employee_salary, rec.employee_age)
    }
}

impl Envelope {
    pub fn into_employees(self) -> Vec<Employee> {
        self.data.into_iter().map(Employee::from).collect()
    }
}

/// Number of entries under `data` in an undecoded document.
pub fn record_count(doc: &Value) -> usize {
    doc.get("data")
        .and_then(Value::as_array)
        .map_or(0, Vec::len)
}

pub fn parse_employees(json: &str) -> Result<Vec<Employee>, serde_json::Error> {
    let envelope: Envelope = serde_json::from_str(json)?;
    Ok(envelope.into_employees())
}

pub async fn load_employees_from_json(path: &Path) -> Result<Vec<Employee>, LoadError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    parse_employees(&raw).map_err(|source| LoadError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Largest monthly salary whose yearly figure still fits in an `i64`.
pub const MAX_MONTHLY_SALARY: i64 = i64::MAX / 12;

fn monthly_salary<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let salary = integer_like(deserializer)?;
    if salary.checked_abs().is_none_or(|s| s > MAX_MONTHLY_SALARY) {
        return Err(de::Error::custom(format!(
            "salary {salary} out of range (max {MAX_MONTHLY_SALARY})"
        )));
    }
    Ok(salary)
}

/// Accepts an integer, a float (truncated) or a string holding an integer.
fn integer_like<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Float(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Int(v) => Ok(v),
        Raw::Float(v) if v.is_finite() => Ok(v.trunc() as i64),
        Raw::Float(v) => Err(de::Error::custom(format!("non-finite number {v}"))),
        Raw::Text(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| de::Error::custom(format!("invalid integer {s:?}"))),
    }
}
