use axum::{
    Router,
    routing::{get, post},
};

use std::sync::Arc;

use crate::{cars, expenses, fuel_logs, services, statistics};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/cars", post(cars::create).get(cars::list))
        .route(
            "/cars/{car_id}",
            get(cars::get)
                .patch(cars::update)
                .delete(cars::delete),
        )
        .route(
            "/cars/{car_id}/fuel",
            post(fuel_logs::create).get(fuel_logs::list),
        )
        .route(
            "/cars/{car_id}/fuel/{log_id}",
            axum::routing::patch(fuel_logs::update).delete(fuel_logs::delete),
        )
        .route(
            "/cars/{car_id}/services",
            post(services::create).get(services::list),
        )
        .route(
            "/cars/{car_id}/services/{service_id}",
            axum::routing::patch(services::update).delete(services::delete),
        )
        .route(
            "/cars/{car_id}/expenses",
            post(expenses::create).get(expenses::list),
        )
        .route(
            "/cars/{car_id}/expenses/{expense_id}",
            axum::routing::patch(expenses::update).delete(expenses::delete),
        )
        .route("/cars/{car_id}/stats", get(statistics::get_stats))
        .with_state(state)
}

pub async fn run(engine: Engine) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use sea_orm::Database;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use migration::MigratorTrait;

    async fn test_state() -> ServerState {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        let engine = Engine::builder().database(db).build().await.unwrap();
        ServerState {
            engine: Arc::new(engine),
        }
    }

    async fn request(state: &ServerState, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = match body {
            Some(body) => Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        };

        let response = router(state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn create_and_fetch_a_car() {
        let state = test_state().await;

        let (status, created) = request(
            &state,
            "POST",
            "/cars",
            Some(json!({"name": "Golf", "plate_number": "AB 123 CD", "initial_odometer": 54000.0})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let id = created["id"].as_str().unwrap().to_string();

        let (status, car) = request(&state, "GET", &format!("/cars/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(car["name"], "Golf");
        assert_eq!(car["current_odometer"], 54000.0);
    }

    #[tokio::test]
    async fn unknown_car_is_404() {
        let state = test_state().await;

        let (status, _) = request(
            &state,
            "GET",
            "/cars/00000000-0000-0000-0000-000000000000/stats",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn statistics_follow_the_fuel_history() {
        let state = test_state().await;

        let (_, created) = request(
            &state,
            "POST",
            "/cars",
            Some(json!({"name": "Golf", "initial_odometer": 1000.0})),
        )
        .await;
        let id = created["id"].as_str().unwrap().to_string();

        let (status, stats) = request(&state, "GET", &format!("/cars/{id}/stats"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stats["total_fill_ups"], 0);
        assert!(stats["avg_km_per_liter"].is_null());

        for (odometer, quantity, amount) in [(1000.0, 40.0, 50.0), (1500.0, 38.0, 48.0)] {
            let (status, _) = request(
                &state,
                "POST",
                &format!("/cars/{id}/fuel"),
                Some(json!({"amount_paid": amount, "quantity": quantity, "odometer": odometer})),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }

        let (_, stats) = request(&state, "GET", &format!("/cars/{id}/stats"), None).await;
        assert_eq!(stats["total_fill_ups"], 2);
        assert_eq!(stats["total_distance"], 500.0);
        let avg = stats["avg_km_per_liter"].as_f64().unwrap();
        assert!((avg - 500.0 / 38.0).abs() < 1e-9);

        let (_, car) = request(&state, "GET", &format!("/cars/{id}"), None).await;
        assert_eq!(car["current_odometer"], 1500.0);
    }

    #[tokio::test]
    async fn service_due_flag_flips_when_the_odometer_passes_the_reminder() {
        let state = test_state().await;

        let (_, created) = request(
            &state,
            "POST",
            "/cars",
            Some(json!({"name": "Golf", "initial_odometer": 54000.0})),
        )
        .await;
        let id = created["id"].as_str().unwrap().to_string();

        let (status, _) = request(
            &state,
            "POST",
            &format!("/cars/{id}/services"),
            Some(json!({"name": "Oil change", "price": 80.0, "odometer": 55000.0, "reminder_odometer": 60000.0})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, services) = request(&state, "GET", &format!("/cars/{id}/services"), None).await;
        assert_eq!(services["needs_attention_count"], 0);
        assert_eq!(services["services"][0]["needs_attention"], false);

        let (_, _) = request(
            &state,
            "POST",
            &format!("/cars/{id}/fuel"),
            Some(json!({"amount_paid": 50.0, "quantity": 40.0, "odometer": 60000.0})),
        )
        .await;

        let (_, services) = request(&state, "GET", &format!("/cars/{id}/services"), None).await;
        assert_eq!(services["needs_attention_count"], 1);
        assert_eq!(services["services"][0]["needs_attention"], true);
    }

    #[tokio::test]
    async fn negative_amounts_are_rejected() {
        let state = test_state().await;

        let (_, created) = request(
            &state,
            "POST",
            "/cars",
            Some(json!({"name": "Golf"})),
        )
        .await;
        let id = created["id"].as_str().unwrap().to_string();

        let (status, _) = request(
            &state,
            "POST",
            &format!("/cars/{id}/fuel"),
            Some(json!({"amount_paid": -1.0, "quantity": 40.0, "odometer": 100.0})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
