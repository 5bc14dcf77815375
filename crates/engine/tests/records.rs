use chrono::Utc;
use sea_orm::Database;

use engine::{Engine, EngineError, ExpenseCategory, FuelLogUpdate, ServiceUpdate};
use migration::MigratorTrait;
use uuid::Uuid;

async fn engine_with_db() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

#[tokio::test]
async fn new_car_starts_at_its_initial_odometer() {
    let engine = engine_with_db().await;

    let car_id = engine
        .new_car("Golf", Some("AB 123 CD"), 54_000.0)
        .await
        .unwrap();

    let car = engine.car(car_id).await.unwrap();
    assert_eq!(car.name, "Golf");
    assert_eq!(car.plate_number, "AB 123 CD");
    assert_eq!(car.initial_odometer, 54_000.0);
    assert_eq!(car.current_odometer, 54_000.0);
}

#[tokio::test]
async fn empty_car_name_is_rejected() {
    let engine = engine_with_db().await;

    let err = engine.new_car("   ", None, 0.0).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidName(_)));
}

#[tokio::test]
async fn unknown_car_is_not_found() {
    let engine = engine_with_db().await;

    let err = engine.car(Uuid::new_v4()).await.unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("car not exists".to_string()));
}

#[tokio::test]
async fn fuel_log_write_moves_the_current_odometer() {
    let engine = engine_with_db().await;
    let car_id = engine.new_car("Golf", None, 54_000.0).await.unwrap();

    engine
        .new_fuel_log(car_id, Utc::now(), 50.0, 40.0, 54_400.0, Some("Shell"), None)
        .await
        .unwrap();

    let car = engine.car(car_id).await.unwrap();
    assert_eq!(car.current_odometer, 54_400.0);

    // Last write wins: a lower reading still moves the odometer, it is not
    // clamped to the maximum.
    engine
        .new_fuel_log(car_id, Utc::now(), 30.0, 25.0, 54_200.0, None, None)
        .await
        .unwrap();

    let car = engine.car(car_id).await.unwrap();
    assert_eq!(car.current_odometer, 54_200.0);
}

#[tokio::test]
async fn fuel_log_update_with_reading_moves_the_current_odometer() {
    let engine = engine_with_db().await;
    let car_id = engine.new_car("Golf", None, 54_000.0).await.unwrap();
    let log_id = engine
        .new_fuel_log(car_id, Utc::now(), 50.0, 40.0, 54_400.0, None, None)
        .await
        .unwrap();

    engine
        .update_fuel_log(
            car_id,
            log_id,
            FuelLogUpdate {
                odometer: Some(54_450.0),
                notes: Some("odometer typo fixed".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let car = engine.car(car_id).await.unwrap();
    assert_eq!(car.current_odometer, 54_450.0);

    let logs = engine.list_fuel_logs(car_id).await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].odometer, 54_450.0);
    assert_eq!(logs[0].notes, "odometer typo fixed");
    // Untouched fields survive a partial update.
    assert_eq!(logs[0].quantity, 40.0);
}

#[tokio::test]
async fn service_write_moves_the_current_odometer_and_derives_attention() {
    let engine = engine_with_db().await;
    let car_id = engine.new_car("Golf", None, 54_000.0).await.unwrap();

    engine
        .new_service(car_id, "Oil change", 80.0, 55_000.0, None, 60_000.0)
        .await
        .unwrap();

    let car = engine.car(car_id).await.unwrap();
    assert_eq!(car.current_odometer, 55_000.0);

    let services = engine.list_services(car_id).await.unwrap();
    assert_eq!(services.len(), 1);
    assert!(!services[0].needs_attention);

    // Drive past the reminder threshold via a fuel log; the flag flips on
    // the next read without any service write.
    engine
        .new_fuel_log(car_id, Utc::now(), 50.0, 40.0, 60_000.0, None, None)
        .await
        .unwrap();

    let services = engine.list_services(car_id).await.unwrap();
    assert!(services[0].needs_attention);
}

#[tokio::test]
async fn service_without_reminder_never_needs_attention() {
    let engine = engine_with_db().await;
    let car_id = engine.new_car("Golf", None, 200_000.0).await.unwrap();

    engine
        .new_service(car_id, "Wiper blades", 20.0, 200_000.0, None, 0.0)
        .await
        .unwrap();

    let services = engine.list_services(car_id).await.unwrap();
    assert!(!services[0].needs_attention);
}

#[tokio::test]
async fn reminder_update_is_reflected_on_the_next_read() {
    let engine = engine_with_db().await;
    let car_id = engine.new_car("Golf", None, 54_000.0).await.unwrap();
    let service_id = engine
        .new_service(car_id, "Oil change", 80.0, 54_000.0, None, 60_000.0)
        .await
        .unwrap();

    engine
        .update_service(
            car_id,
            service_id,
            ServiceUpdate {
                reminder_odometer: Some(54_000.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let services = engine.list_services(car_id).await.unwrap();
    assert!(services[0].needs_attention);
}

#[tokio::test]
async fn expense_moves_the_odometer_only_when_it_carries_a_reading() {
    let engine = engine_with_db().await;
    let car_id = engine.new_car("Golf", None, 54_000.0).await.unwrap();

    engine
        .new_expense(
            car_id,
            "Insurance",
            420.0,
            Utc::now(),
            None,
            None,
            ExpenseCategory::Insurance,
        )
        .await
        .unwrap();

    let car = engine.car(car_id).await.unwrap();
    assert_eq!(car.current_odometer, 54_000.0);

    // A zero reading means "no reading taken", same as absent.
    engine
        .new_expense(
            car_id,
            "Parking",
            4.0,
            Utc::now(),
            Some(0.0),
            None,
            ExpenseCategory::Parking,
        )
        .await
        .unwrap();

    let car = engine.car(car_id).await.unwrap();
    assert_eq!(car.current_odometer, 54_000.0);

    engine
        .new_expense(
            car_id,
            "Toll",
            12.0,
            Utc::now(),
            Some(54_600.0),
            None,
            ExpenseCategory::Tolls,
        )
        .await
        .unwrap();

    let car = engine.car(car_id).await.unwrap();
    assert_eq!(car.current_odometer, 54_600.0);

    let expenses = engine.list_expenses(car_id).await.unwrap();
    assert_eq!(expenses.len(), 3);
    assert_eq!(expenses[0].odometer, Some(54_600.0));
}

#[tokio::test]
async fn delete_car_removes_its_records() {
    let engine = engine_with_db().await;
    let car_id = engine.new_car("Golf", None, 54_000.0).await.unwrap();
    engine
        .new_fuel_log(car_id, Utc::now(), 50.0, 40.0, 54_400.0, None, None)
        .await
        .unwrap();
    engine
        .new_service(car_id, "Oil change", 80.0, 54_500.0, None, 0.0)
        .await
        .unwrap();

    engine.delete_car(car_id).await.unwrap();

    let err = engine.car(car_id).await.unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("car not exists".to_string()));
    assert!(engine.list_cars().await.unwrap().is_empty());
    let err = engine.list_fuel_logs(car_id).await.unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("car not exists".to_string()));
}

#[tokio::test]
async fn fuel_statistics_match_the_seeded_history() {
    let engine = engine_with_db().await;
    let car_id = engine.new_car("Golf", None, 1_000.0).await.unwrap();

    engine
        .new_fuel_log(car_id, Utc::now(), 50.0, 40.0, 1_000.0, None, None)
        .await
        .unwrap();
    engine
        .new_fuel_log(car_id, Utc::now(), 48.0, 38.0, 1_500.0, None, None)
        .await
        .unwrap();

    let stats = engine.fuel_statistics(car_id).await.unwrap();
    assert_eq!(stats.total_fill_ups, 2);
    assert_eq!(stats.total_distance, 500.0);
    assert_eq!(stats.total_cost, 98.0);
    assert_eq!(stats.total_liters, 78.0);
    let avg = stats.avg_km_per_liter.unwrap();
    assert!((avg - 500.0 / 38.0).abs() < 1e-9);
    let cost_per_liter = stats.avg_cost_per_liter.unwrap();
    assert!((cost_per_liter - 98.0 / 78.0).abs() < 1e-9);
}

#[tokio::test]
async fn fuel_statistics_for_an_unfueled_car_are_empty() {
    let engine = engine_with_db().await;
    let car_id = engine.new_car("Golf", None, 54_000.0).await.unwrap();

    let stats = engine.fuel_statistics(car_id).await.unwrap();
    assert_eq!(stats.total_fill_ups, 0);
    assert!(stats.avg_km_per_liter.is_none());
    assert!(stats.best_fuel_economy.is_none());
}

#[tokio::test]
async fn fuel_log_pages_walk_newest_to_oldest() {
    let engine = engine_with_db().await;
    let car_id = engine.new_car("Golf", None, 0.0).await.unwrap();

    for i in 0..5 {
        let date = Utc::now() - chrono::Duration::days(5 - i);
        engine
            .new_fuel_log(car_id, date, 50.0, 40.0, 1_000.0 * (i + 1) as f64, None, None)
            .await
            .unwrap();
    }

    let page = engine.list_fuel_logs_page(car_id, 2, None).await.unwrap();
    assert_eq!(page.fuel_logs.len(), 2);
    let cursor = page.next_cursor.expect("more pages expected");
    assert_eq!(page.fuel_logs[0].odometer, 5_000.0);

    let page = engine
        .list_fuel_logs_page(car_id, 2, Some(&cursor))
        .await
        .unwrap();
    assert_eq!(page.fuel_logs.len(), 2);
    let cursor = page.next_cursor.expect("more pages expected");

    let page = engine
        .list_fuel_logs_page(car_id, 2, Some(&cursor))
        .await
        .unwrap();
    assert_eq!(page.fuel_logs.len(), 1);
    assert_eq!(page.fuel_logs[0].odometer, 1_000.0);
    assert!(page.next_cursor.is_none());
}

#[tokio::test]
async fn garbage_cursor_is_rejected() {
    let engine = engine_with_db().await;
    let car_id = engine.new_car("Golf", None, 0.0).await.unwrap();

    let err = engine
        .list_fuel_logs_page(car_id, 10, Some("not-a-cursor"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidCursor(_)));
}

#[tokio::test]
async fn deleting_a_fuel_log_adjusts_statistics_on_the_next_read() {
    let engine = engine_with_db().await;
    let car_id = engine.new_car("Golf", None, 1_000.0).await.unwrap();

    engine
        .new_fuel_log(car_id, Utc::now(), 50.0, 40.0, 1_000.0, None, None)
        .await
        .unwrap();
    let second = engine
        .new_fuel_log(car_id, Utc::now(), 48.0, 38.0, 1_500.0, None, None)
        .await
        .unwrap();

    engine.delete_fuel_log(car_id, second).await.unwrap();

    let stats = engine.fuel_statistics(car_id).await.unwrap();
    assert_eq!(stats.total_fill_ups, 1);
    assert!(stats.avg_km_per_liter.is_none());
}
