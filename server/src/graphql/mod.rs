use std::sync::Arc;

use async_graphql::{
    Context, EmptySubscription, ErrorExtensions, InputObject, Object, Schema, SimpleObject,
};
use platform_api::ApiError;
use products_hr::{
    CountryMetrics, Employee, EmployeeInput, HrError, HrModule, JobMetrics, SalaryBreakdown,
};
use tracing::instrument;

use crate::config::AppConfig;

pub type SchemaType = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(hr: HrModule, config: Arc<AppConfig>) -> SchemaType {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(hr)
        .data(config)
        .finish()
}

/// SDL snapshot; resolvers are never run so no context data is attached.
pub fn schema_sdl() -> String {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .finish()
        .sdl()
}

#[derive(Default)]
pub struct QueryRoot;

#[derive(Default)]
pub struct MutationRoot;

#[Object]
impl QueryRoot {
    #[instrument(name = "graphql.version", skip_all)]
    async fn version(&self, ctx: &Context<'_>) -> async_graphql::Result<String> {
        Ok(ctx.data::<Arc<AppConfig>>()?.version.clone())
    }

    #[instrument(name = "graphql.employee", skip(self, ctx))]
    async fn employee(&self, ctx: &Context<'_>, id: i32) -> async_graphql::Result<EmployeeNode> {
        let hr = ctx.data::<HrModule>()?;
        let employee = hr.employee(id).await.map_err(graphql_error)?;
        Ok(employee.into())
    }

    #[instrument(name = "graphql.salary", skip(self, ctx))]
    async fn salary(&self, ctx: &Context<'_>, id: i32) -> async_graphql::Result<SalaryNode> {
        let hr = ctx.data::<HrModule>()?;
        let breakdown = hr.salary(id).await.map_err(graphql_error)?;
        Ok(breakdown.into())
    }

    #[instrument(name = "graphql.countryMetrics", skip(self, ctx))]
    async fn country_metrics(
        &self,
        ctx: &Context<'_>,
        country: String,
    ) -> async_graphql::Result<CountryMetricsNode> {
        let hr = ctx.data::<HrModule>()?;
        let metrics = hr.country_metrics(&country).await.map_err(graphql_error)?;
        Ok(metrics.into())
    }

    #[instrument(name = "graphql.jobTitleMetrics", skip(self, ctx))]
    async fn job_title_metrics(
        &self,
        ctx: &Context<'_>,
        job_title: String,
    ) -> async_graphql::Result<JobMetricsNode> {
        let hr = ctx.data::<HrModule>()?;
        let metrics = hr.job_metrics(&job_title).await.map_err(graphql_error)?;
        Ok(metrics.into())
    }
}

#[Object]
impl MutationRoot {
    #[instrument(name = "graphql.createEmployee", skip_all)]
    async fn create_employee(
        &self,
        ctx: &Context<'_>,
        input: EmployeeInputNode,
    ) -> async_graphql::Result<EmployeeNode> {
        let hr = ctx.data::<HrModule>()?;
        let employee = hr
            .create_employee(input.into())
            .await
            .map_err(graphql_error)?;
        Ok(employee.into())
    }

    #[instrument(name = "graphql.updateEmployee", skip(self, ctx, input))]
    async fn update_employee(
        &self,
        ctx: &Context<'_>,
        id: i32,
        input: EmployeeInputNode,
    ) -> async_graphql::Result<EmployeeNode> {
        let hr = ctx.data::<HrModule>()?;
        let employee = hr
            .update_employee(id, input.into())
            .await
            .map_err(graphql_error)?;
        Ok(employee.into())
    }

    #[instrument(name = "graphql.deleteEmployee", skip(self, ctx))]
    async fn delete_employee(&self, ctx: &Context<'_>, id: i32) -> async_graphql::Result<bool> {
        let hr = ctx.data::<HrModule>()?;
        hr.delete_employee(id).await.map_err(graphql_error)?;
        Ok(true)
    }
}

fn graphql_error(err: HrError) -> async_graphql::Error {
    ApiError::from(err).extend()
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "Employee")]
pub struct EmployeeNode {
    pub id: i32,
    pub full_name: String,
    pub job_title: String,
    pub country: String,
    pub salary: f64,
}

impl From<Employee> for EmployeeNode {
    fn from(employee: Employee) -> Self {
        Self {
            id: employee.id,
            full_name: employee.full_name,
            job_title: employee.job_title,
            country: employee.country,
            salary: employee.salary,
        }
    }
}

#[derive(Clone, Debug, InputObject)]
#[graphql(name = "EmployeeInput")]
pub struct EmployeeInputNode {
    pub full_name: String,
    pub job_title: String,
    pub country: String,
    pub salary: f64,
}

impl From<EmployeeInputNode> for EmployeeInput {
    fn from(node: EmployeeInputNode) -> Self {
        Self {
            full_name: node.full_name,
            job_title: node.job_title,
            country: node.country,
            salary: node.salary,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "SalaryBreakdown")]
pub struct SalaryNode {
    pub gross_salary: f64,
    pub deduction: f64,
    pub net_salary: f64,
}

impl From<SalaryBreakdown> for SalaryNode {
    fn from(breakdown: SalaryBreakdown) -> Self {
        Self {
            gross_salary: breakdown.gross_salary,
            deduction: breakdown.deduction,
            net_salary: breakdown.net_salary,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "CountryMetrics")]
pub struct CountryMetricsNode {
    pub country: String,
    pub count: i64,
    pub min_salary: f64,
    pub max_salary: f64,
    pub avg_salary: f64,
}

impl From<CountryMetrics> for CountryMetricsNode {
    fn from(metrics: CountryMetrics) -> Self {
        Self {
            country: metrics.country,
            count: metrics.count,
            min_salary: metrics.min_salary,
            max_salary: metrics.max_salary,
            avg_salary: metrics.avg_salary,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "JobMetrics")]
pub struct JobMetricsNode {
    pub job_title: String,
    pub count: i64,
    pub avg_salary: f64,
}

impl From<JobMetrics> for JobMetricsNode {
    fn from(metrics: JobMetrics) -> Self {
        Self {
            job_title: metrics.job_title,
            count: metrics.count,
            avg_salary: metrics.avg_salary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_hr;
    use async_graphql::{Request, Value};
    use sea_orm::ConnectionTrait;
    use serde_json::json;

    async fn schema() -> SchemaType {
        build_schema(test_hr().await, Arc::new(AppConfig::default()))
    }

    fn error_code(response: &async_graphql::Response) -> Option<Value> {
        response
            .errors
            .first()
            .and_then(|err| err.extensions.as_ref())
            .and_then(|ext| ext.get("code"))
            .cloned()
    }

    #[tokio::test]
    async fn version_query_reports_config() {
        let schema = schema().await;
        let response = schema.execute(Request::new("{ version }")).await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);
        let body = response.data.into_json().unwrap();
        assert_eq!(body, json!({"version": AppConfig::default().version}));
    }

    #[tokio::test]
    async fn create_then_query_salary() {
        let schema = schema().await;
        let created = schema
            .execute(Request::new(
                r#"mutation {
                    createEmployee(input: {fullName: "Rahul Dravid", jobTitle: "Cricketer", country: "India", salary: 10000.0}) { id fullName }
                }"#,
            ))
            .await;
        assert!(created.errors.is_empty(), "{:?}", created.errors);
        let body = created.data.into_json().unwrap();
        assert_eq!(body["createEmployee"]["fullName"], json!("Rahul Dravid"));
        let id = body["createEmployee"]["id"].as_i64().unwrap();

        let response = schema
            .execute(Request::new(format!(
                "{{ salary(id: {id}) {{ grossSalary deduction netSalary }} }}"
            )))
            .await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);
        assert_eq!(
            response.data.into_json().unwrap(),
            json!({"salary": {"grossSalary": 10000.0, "deduction": 1000.0, "netSalary": 9000.0}})
        );
    }

    #[tokio::test]
    async fn missing_employee_is_tagged_not_found() {
        let schema = schema().await;
        let response = schema
            .execute(Request::new("{ employee(id: 42) { id } }"))
            .await;
        assert_eq!(response.errors[0].message, "Employee not found");
        assert_eq!(error_code(&response), Some(Value::from("NOT_FOUND")));
    }

    #[tokio::test]
    async fn invalid_salary_is_tagged_invalid_input() {
        let schema = schema().await;
        let response = schema
            .execute(Request::new(
                r#"mutation {
                    createEmployee(input: {fullName: "A", jobTitle: "Dev", country: "UK", salary: -1.0}) { id }
                }"#,
            ))
            .await;
        assert_eq!(error_code(&response), Some(Value::from("INVALID_INPUT")));
    }

    #[tokio::test]
    async fn empty_metrics_are_not_found() {
        let schema = schema().await;
        let response = schema
            .execute(Request::new(
                r#"{ countryMetrics(country: "Atlantis") { count } }"#,
            ))
            .await;
        assert_eq!(error_code(&response), Some(Value::from("NOT_FOUND")));
    }

    #[tokio::test]
    async fn storage_failure_is_tagged_internal() {
        let hr = test_hr().await;
        let schema = build_schema(hr.clone(), Arc::new(AppConfig::default()));
        hr.pool()
            .execute_unprepared("DROP TABLE employees")
            .await
            .unwrap();
        let response = schema
            .execute(Request::new("{ employee(id: 1) { id } }"))
            .await;
        assert_eq!(response.errors[0].message, "internal server error");
        assert_eq!(error_code(&response), Some(Value::from("INTERNAL")));
    }

    #[test]
    fn sdl_lists_operations() {
        let sdl = schema_sdl();
        assert!(sdl.contains("countryMetrics"));
        assert!(sdl.contains("jobTitleMetrics"));
        assert!(sdl.contains("deleteEmployee"));
    }
}
