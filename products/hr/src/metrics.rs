//! Turns raw salary aggregates into the metrics payloads.
//!
//! A filter that matched no rows is reported as not found rather than as a
//! zero-valued result.

use sea_orm::{DbErr, FromQueryResult};
use serde::{Deserialize, Serialize};

use crate::error::{HrError, HrResult};

/// One `count/min/max/avg` row over the filtered employees.
#[derive(Clone, Debug, Default, PartialEq, FromQueryResult)]
pub struct SalaryAggregate {
    pub count: i64,
    pub min_salary: Option<f64>,
    pub max_salary: Option<f64>,
    pub avg_salary: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CountryMetrics {
    pub country: String,
    pub count: i64,
    pub min_salary: f64,
    pub max_salary: f64,
    pub avg_salary: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JobMetrics {
    pub job_title: String,
    pub count: i64,
    pub avg_salary: f64,
}

/// `country` is echoed back as given, not normalized.
pub fn country_metrics(country: &str, aggregate: SalaryAggregate) -> HrResult<CountryMetrics> {
    if aggregate.count <= 0 {
        return Err(HrError::NotFound("No data found for this country"));
    }
    Ok(CountryMetrics {
        country: country.to_string(),
        count: aggregate.count,
        min_salary: present(aggregate.min_salary, "min_salary")?,
        max_salary: present(aggregate.max_salary, "max_salary")?,
        avg_salary: present(aggregate.avg_salary, "avg_salary")?,
    })
}

pub fn job_metrics(job_title: &str, aggregate: SalaryAggregate) -> HrResult<JobMetrics> {
    if aggregate.count <= 0 {
        return Err(HrError::NotFound("No data found for this job title"));
    }
    Ok(JobMetrics {
        job_title: job_title.to_string(),
        count: aggregate.count,
        avg_salary: present(aggregate.avg_salary, "avg_salary")?,
    })
}

// Salary is NOT NULL, so a non-empty match always carries every aggregate.
fn present(value: Option<f64>, column: &str) -> HrResult<f64> {
    value.ok_or_else(|| {
        HrError::Storage(DbErr::Custom(format!(
            "aggregate {column} missing for non-empty match"
        )))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aggregate(count: i64, min: f64, max: f64, avg: f64) -> SalaryAggregate {
        SalaryAggregate {
            count,
            min_salary: Some(min),
            max_salary: Some(max),
            avg_salary: Some(avg),
        }
    }

    #[test]
    fn country_metrics_carry_all_statistics() {
        let metrics = country_metrics("India", aggregate(2, 1000.0, 2000.0, 1500.0)).unwrap();
        assert_eq!(
            metrics,
            CountryMetrics {
                country: "India".into(),
                count: 2,
                min_salary: 1000.0,
                max_salary: 2000.0,
                avg_salary: 1500.0,
            }
        );
    }

    #[test]
    fn country_name_is_echoed_verbatim() {
        let metrics = country_metrics("iNdIa", aggregate(1, 5.0, 5.0, 5.0)).unwrap();
        assert_eq!(metrics.country, "iNdIa");
    }

    #[test]
    fn empty_match_is_not_found() {
        let err = country_metrics("Atlantis", SalaryAggregate::default()).unwrap_err();
        assert!(matches!(err, HrError::NotFound("No data found for this country")));
        let err = job_metrics("Astronaut", SalaryAggregate::default()).unwrap_err();
        assert!(matches!(err, HrError::NotFound("No data found for this job title")));
    }

    #[test]
    fn job_metrics_report_count_and_average() {
        let metrics = job_metrics("Specialist", aggregate(2, 3000.0, 4000.0, 3500.0)).unwrap();
        assert_eq!(metrics.job_title, "Specialist");
        assert_eq!(metrics.count, 2);
        assert_eq!(metrics.avg_salary, 3500.0);
    }

    #[test]
    fn null_aggregate_on_non_empty_match_is_a_storage_error() {
        let broken = SalaryAggregate {
            count: 3,
            ..SalaryAggregate::default()
        };
        assert!(matches!(
            country_metrics("India", broken),
            Err(HrError::Storage(_))
        ));
    }
}
