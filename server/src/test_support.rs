use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use platform_db::{DatabaseSettings, connect};
use products_hr::{HrModule, SalaryCalculator, TaxTable};

/// Fresh migrated in-memory store per call.
pub async fn test_hr() -> HrModule {
    let pool = connect(&DatabaseSettings::new("sqlite::memory:"))
        .await
        .unwrap();
    Migrator::up(&pool, None).await.unwrap();
    HrModule::new(pool, Arc::new(SalaryCalculator::new(TaxTable::standard())))
}
