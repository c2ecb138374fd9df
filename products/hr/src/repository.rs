//! Employee persistence. Every public call is one transaction: committed on
//! success, rolled back when the transaction is dropped on an error path.

use entity::employees;
use platform_db::{DbPool, begin_session};
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::{NotSet, Set},
    DatabaseTransaction, EntityTrait, QueryFilter, QuerySelect,
    sea_query::{Expr, Func, SimpleExpr},
};
use tracing::instrument;

use crate::{
    error::{HrError, HrResult},
    metrics::SalaryAggregate,
    model::{Employee, EmployeeFields},
};

pub struct EmployeeRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> EmployeeRepository<'a> {
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    #[instrument(name = "hr.employees.create", skip_all)]
    pub async fn create(&self, fields: EmployeeFields) -> HrResult<Employee> {
        let txn = begin_session(self.pool).await?;
        let mut active = employees::ActiveModel {
            id: NotSet,
            ..Default::default()
        };
        apply_fields(&mut active, fields);
        let model = active.insert(&txn).await?;
        txn.commit().await?;
        Ok(model.into())
    }

    #[instrument(name = "hr.employees.get", skip(self))]
    pub async fn get(&self, id: i32) -> HrResult<Employee> {
        let txn = begin_session(self.pool).await?;
        let model = find(&txn, id).await?;
        txn.commit().await?;
        Ok(model.into())
    }

    /// Full replace: every business field is overwritten.
    #[instrument(name = "hr.employees.update", skip(self, fields))]
    pub async fn update(&self, id: i32, fields: EmployeeFields) -> HrResult<Employee> {
        let txn = begin_session(self.pool).await?;
        let mut active: employees::ActiveModel = find(&txn, id).await?.into();
        apply_fields(&mut active, fields);
        let model = active.update(&txn).await?;
        txn.commit().await?;
        Ok(model.into())
    }

    #[instrument(name = "hr.employees.delete", skip(self))]
    pub async fn delete(&self, id: i32) -> HrResult<()> {
        let txn = begin_session(self.pool).await?;
        let result = employees::Entity::delete_by_id(id).exec(&txn).await?;
        if result.rows_affected == 0 {
            return Err(HrError::employee_not_found());
        }
        txn.commit().await?;
        Ok(())
    }

    #[instrument(name = "hr.metrics.country", skip(self))]
    pub async fn salary_aggregate_by_country(&self, country: &str) -> HrResult<SalaryAggregate> {
        self.salary_aggregate(employees::Column::Country, country).await
    }

    #[instrument(name = "hr.metrics.job_title", skip(self))]
    pub async fn salary_aggregate_by_job_title(
        &self,
        job_title: &str,
    ) -> HrResult<SalaryAggregate> {
        self.salary_aggregate(employees::Column::JobTitle, job_title)
            .await
    }

    async fn salary_aggregate(
        &self,
        column: employees::Column,
        value: &str,
    ) -> HrResult<SalaryAggregate> {
        let salary = || Expr::col(employees::Column::Salary);
        let txn = begin_session(self.pool).await?;
        let row = employees::Entity::find()
            .select_only()
            .column_as(Expr::col(employees::Column::Id).count(), "count")
            .column_as(salary().min(), "min_salary")
            .column_as(salary().max(), "max_salary")
            .column_as(SimpleExpr::from(Func::avg(salary())), "avg_salary")
            .filter(
                Expr::expr(Func::lower(Expr::col(column))).eq(Func::lower(Expr::val(value))),
            )
            .into_model::<SalaryAggregate>()
            .one(&txn)
            .await?;
        txn.commit().await?;
        Ok(row.unwrap_or_default())
    }
}

async fn find(txn: &DatabaseTransaction, id: i32) -> HrResult<employees::Model> {
    employees::Entity::find_by_id(id)
        .one(txn)
        .await?
        .ok_or_else(HrError::employee_not_found)
}

fn apply_fields(active: &mut employees::ActiveModel, fields: EmployeeFields) {
    let (full_name, job_title, country, salary) = fields.into_parts();
    active.full_name = Set(full_name);
    active.job_title = Set(job_title);
    active.country = Set(country);
    active.salary = Set(salary);
}
