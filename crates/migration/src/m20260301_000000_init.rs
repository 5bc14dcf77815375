//! Initial schema migration - creates all tables from scratch.
//!
//! - `cars`: tracked vehicles, including the maintained current odometer
//! - `fuel_logs`: refill events per car
//! - `services`: maintenance events per car, with an optional reminder
//!   threshold (the service-due flag itself is derived, never stored)
//! - `expenses`: miscellaneous costs per car, odometer reading optional

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Cars {
    Table,
    Id,
    Name,
    PlateNumber,
    InitialOdometer,
    CurrentOdometer,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum FuelLogs {
    Table,
    Id,
    CarId,
    Date,
    AmountPaid,
    Quantity,
    Odometer,
    Brand,
    Notes,
    CreatedAt,
}

#[derive(Iden)]
enum Services {
    Table,
    Id,
    CarId,
    Name,
    Price,
    Odometer,
    Description,
    ReminderOdometer,
    CreatedAt,
}

#[derive(Iden)]
enum Expenses {
    Table,
    Id,
    CarId,
    Name,
    Amount,
    Date,
    Odometer,
    Description,
    Category,
    CreatedAt,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Cars
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Cars::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Cars::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Cars::Name).string().not_null())
                    .col(ColumnDef::new(Cars::PlateNumber).string().not_null())
                    .col(ColumnDef::new(Cars::InitialOdometer).double().not_null())
                    .col(ColumnDef::new(Cars::CurrentOdometer).double().not_null())
                    .col(ColumnDef::new(Cars::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Cars::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Fuel logs
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(FuelLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FuelLogs::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FuelLogs::CarId).string().not_null())
                    .col(ColumnDef::new(FuelLogs::Date).timestamp().not_null())
                    .col(ColumnDef::new(FuelLogs::AmountPaid).double().not_null())
                    .col(ColumnDef::new(FuelLogs::Quantity).double().not_null())
                    .col(ColumnDef::new(FuelLogs::Odometer).double().not_null())
                    .col(ColumnDef::new(FuelLogs::Brand).string().not_null())
                    .col(ColumnDef::new(FuelLogs::Notes).string().not_null())
                    .col(ColumnDef::new(FuelLogs::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-fuel_logs-car_id")
                            .from(FuelLogs::Table, FuelLogs::CarId)
                            .to(Cars::Table, Cars::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-fuel_logs-car_id-date")
                    .table(FuelLogs::Table)
                    .col(FuelLogs::CarId)
                    .col(FuelLogs::Date)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Services
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Services::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Services::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Services::CarId).string().not_null())
                    .col(ColumnDef::new(Services::Name).string().not_null())
                    .col(ColumnDef::new(Services::Price).double().not_null())
                    .col(ColumnDef::new(Services::Odometer).double().not_null())
                    .col(ColumnDef::new(Services::Description).string().not_null())
                    .col(
                        ColumnDef::new(Services::ReminderOdometer)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(Services::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-services-car_id")
                            .from(Services::Table, Services::CarId)
                            .to(Cars::Table, Cars::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-services-car_id-created_at")
                    .table(Services::Table)
                    .col(Services::CarId)
                    .col(Services::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Expenses
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Expenses::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Expenses::CarId).string().not_null())
                    .col(ColumnDef::new(Expenses::Name).string().not_null())
                    .col(ColumnDef::new(Expenses::Amount).double().not_null())
                    .col(ColumnDef::new(Expenses::Date).timestamp().not_null())
                    .col(ColumnDef::new(Expenses::Odometer).double())
                    .col(ColumnDef::new(Expenses::Description).string().not_null())
                    .col(
                        ColumnDef::new(Expenses::Category)
                            .string()
                            .not_null()
                            .default("Other"),
                    )
                    .col(ColumnDef::new(Expenses::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-expenses-car_id")
                            .from(Expenses::Table, Expenses::CarId)
                            .to(Cars::Table, Cars::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-expenses-car_id-date")
                    .table(Expenses::Table)
                    .col(Expenses::CarId)
                    .col(Expenses::Date)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Services::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FuelLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Cars::Table).to_owned())
            .await?;
        Ok(())
    }
}
