//! HR vertical slice: employee records, salary breakdowns and salary metrics.

use std::sync::Arc;

use platform_db::DbPool;

pub mod error;
pub mod metrics;
pub mod model;
pub mod repository;
pub mod salary;

pub use error::{HrError, HrResult};
pub use metrics::{CountryMetrics, JobMetrics, SalaryAggregate};
pub use model::{Employee, EmployeeFields, EmployeeInput};
pub use repository::EmployeeRepository;
pub use salary::{SalaryBreakdown, SalaryCalculator, TaxTable};

/// Entry point used by the HTTP and GraphQL surfaces.
#[derive(Clone)]
pub struct HrModule {
    pool: DbPool,
    calculator: Arc<SalaryCalculator>,
}

impl HrModule {
    pub fn new(pool: DbPool, calculator: Arc<SalaryCalculator>) -> Self {
        Self { pool, calculator }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    fn employees(&self) -> EmployeeRepository<'_> {
        EmployeeRepository::new(&self.pool)
    }

    pub async fn create_employee(&self, input: EmployeeInput) -> HrResult<Employee> {
        let fields = input.validate()?;
        self.employees().create(fields).await
    }

    pub async fn employee(&self, id: i32) -> HrResult<Employee> {
        self.employees().get(id).await
    }

    pub async fn update_employee(&self, id: i32, input: EmployeeInput) -> HrResult<Employee> {
        let fields = input.validate()?;
        self.employees().update(id, fields).await
    }

    pub async fn delete_employee(&self, id: i32) -> HrResult<()> {
        self.employees().delete(id).await
    }

    pub async fn salary(&self, id: i32) -> HrResult<SalaryBreakdown> {
        let employee = self.employees().get(id).await?;
        Ok(self.calculator.breakdown(&employee))
    }

    pub async fn country_metrics(&self, country: &str) -> HrResult<CountryMetrics> {
        let aggregate = self.employees().salary_aggregate_by_country(country).await?;
        metrics::country_metrics(country, aggregate)
    }

    pub async fn job_metrics(&self, job_title: &str) -> HrResult<JobMetrics> {
        let aggregate = self
            .employees()
            .salary_aggregate_by_job_title(job_title)
            .await?;
        metrics::job_metrics(job_title, aggregate)
    }
}
