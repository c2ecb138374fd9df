use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Employees {
    Table,
    Id,
    FullName,
    JobTitle,
    Country,
    Salary,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Employees::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Employees::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Employees::FullName).string().not_null())
                    .col(ColumnDef::new(Employees::JobTitle).string().not_null())
                    .col(ColumnDef::new(Employees::Country).string().not_null())
                    .col(ColumnDef::new(Employees::Salary).double().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_employees_full_name")
                    .table(Employees::Table)
                    .col(Employees::FullName)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Employees::Table).if_exists().to_owned())
            .await
    }
}
