use entity::employees;
use serde::{Deserialize, Serialize};

use crate::error::{HrError, HrResult};

/// Employee record as stored, including the store-assigned id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: i32,
    pub full_name: String,
    pub job_title: String,
    pub country: String,
    pub salary: f64,
}

impl From<employees::Model> for Employee {
    fn from(model: employees::Model) -> Self {
        Self {
            id: model.id,
            full_name: model.full_name,
            job_title: model.job_title,
            country: model.country,
            salary: model.salary,
        }
    }
}

/// Unvalidated create/update payload. Every field is required.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EmployeeInput {
    pub full_name: String,
    pub job_title: String,
    pub country: String,
    pub salary: f64,
}

impl EmployeeInput {
    pub fn validate(self) -> HrResult<EmployeeFields> {
        require_text("full_name", &self.full_name)?;
        require_text("job_title", &self.job_title)?;
        require_text("country", &self.country)?;
        if !self.salary.is_finite() || self.salary <= 0.0 {
            return Err(HrError::Validation(
                "salary must be a number greater than zero".into(),
            ));
        }
        Ok(EmployeeFields {
            full_name: self.full_name,
            job_title: self.job_title,
            country: self.country,
            salary: self.salary,
        })
    }
}

fn require_text(field: &str, value: &str) -> HrResult<()> {
    if value.is_empty() {
        return Err(HrError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

/// The four business fields of an employee, known to satisfy the record
/// invariants. Only obtainable through [`EmployeeInput::validate`].
#[derive(Clone, Debug, PartialEq)]
pub struct EmployeeFields {
    full_name: String,
    job_title: String,
    country: String,
    salary: f64,
}

impl EmployeeFields {
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn job_title(&self) -> &str {
        &self.job_title
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn salary(&self) -> f64 {
        self.salary
    }

    pub(crate) fn into_parts(self) -> (String, String, String, f64) {
        (self.full_name, self.job_title, self.country, self.salary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(full_name: &str, job_title: &str, country: &str, salary: f64) -> EmployeeInput {
        EmployeeInput {
            full_name: full_name.into(),
            job_title: job_title.into(),
            country: country.into(),
            salary,
        }
    }

    fn validation_message(result: HrResult<EmployeeFields>) -> String {
        match result {
            Err(HrError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn valid_input_passes_through_unchanged() {
        let fields = input("Jane Doe", "Software Engineer", "India", 50000.0)
            .validate()
            .unwrap();
        assert_eq!(fields.full_name(), "Jane Doe");
        assert_eq!(fields.job_title(), "Software Engineer");
        assert_eq!(fields.country(), "India");
        assert_eq!(fields.salary(), 50000.0);
    }

    #[test]
    fn empty_text_fields_are_rejected() {
        let msg = validation_message(input("", "Dev", "UK", 1.0).validate());
        assert_eq!(msg, "full_name must not be empty");
        let msg = validation_message(input("A", "", "UK", 1.0).validate());
        assert_eq!(msg, "job_title must not be empty");
        let msg = validation_message(input("A", "Dev", "", 1.0).validate());
        assert_eq!(msg, "country must not be empty");
    }

    #[test]
    fn whitespace_text_is_kept_verbatim() {
        let fields = input(" ", "  Dev ", "UK", 1.0).validate().unwrap();
        assert_eq!(fields.full_name(), " ");
        assert_eq!(fields.job_title(), "  Dev ");
    }

    #[test]
    fn salary_must_be_positive_and_finite() {
        for salary in [0.0, -10.0, f64::NAN, f64::INFINITY] {
            let result = input("A", "Dev", "UK", salary).validate();
            assert!(matches!(result, Err(HrError::Validation(_))), "{salary}");
        }
    }

    #[test]
    fn missing_fields_fail_to_deserialize() {
        let parsed = serde_json::from_str::<EmployeeInput>(
            r#"{"full_name": "A", "job_title": "Dev", "country": "UK"}"#,
        );
        assert!(parsed.is_err());
    }
}
