//! Tests de la superficie HTTP montando el router real sobre el store
//! in-memory.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::util::ServiceExt;

use taller_backend::config::environment::EnvironmentConfig;
use taller_backend::repositories::InMemoryTallerRepository;
use taller_backend::routes::crear_router;
use taller_backend::state::AppState;

fn app_de_prueba() -> axum::Router {
    let store = Arc::new(InMemoryTallerRepository::new());
    let config = EnvironmentConfig {
        environment: "test".to_string(),
        port: 0,
        host: "127.0.0.1".to_string(),
        cors_origins: vec![],
    };
    crear_router(AppState::with_store(store, config))
}

fn peticion(metodo: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method(metodo).uri(uri);
    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn cuerpo_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn alta_mecanico_http(app: &axum::Router, nombre: &str) -> String {
    let response = app
        .clone()
        .oneshot(peticion(
            "POST",
            "/api/mecanico",
            Some(json!({
                "nombre": nombre,
                "telefono": "600111222",
                "especialidad": "motor",
                "fecha_contratacion": "2021-06-15",
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = cuerpo_json(response).await;
    body["data"]["id"].as_str().unwrap().to_string()
}

async fn alta_reserva_http(app: &axum::Router) -> String {
    let response = app
        .clone()
        .oneshot(peticion(
            "POST",
            "/api/reserva",
            Some(json!({
                "cliente_id": uuid::Uuid::new_v4(),
                "vehiculo_id": uuid::Uuid::new_v4(),
                "servicio_id": uuid::Uuid::new_v4(),
                "fecha": "2026-08-20",
                "hora_inicio": "09:00:00",
                "hora_fin": "11:00:00",
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = cuerpo_json(response).await;
    body["data"]["id"].as_str().unwrap().to_string()
}

async fn vincular_http(app: &axum::Router, reserva_id: &str, mecanico_id: &str) -> String {
    let response = app
        .clone()
        .oneshot(peticion(
            "POST",
            "/api/asignacion",
            Some(json!({ "reserva_id": reserva_id, "mecanico_id": mecanico_id })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = cuerpo_json(response).await;
    body["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_endpoint_de_prueba() {
    let app = app_de_prueba();

    let response = app.oneshot(peticion("GET", "/test", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = cuerpo_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_flujo_completo_por_http() {
    let app = app_de_prueba();

    let mecanico_id = alta_mecanico_http(&app, "Luis Pérez").await;
    let reserva_id = alta_reserva_http(&app).await;
    let asignacion_id = vincular_http(&app, &reserva_id, &mecanico_id).await;

    // el listado de mecánicos refleja la ocupación derivada
    let response = app
        .clone()
        .oneshot(peticion("GET", "/api/mecanico", None))
        .await
        .unwrap();
    let listado = cuerpo_json(response).await;
    assert_eq!(listado[0]["disponible"], false);

    // recepción del vehículo
    let uri = format!("/api/asignacion/{}/recepcion", asignacion_id);
    let response = app
        .clone()
        .oneshot(peticion("PATCH", &uri, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // transición a en_proceso y cierre
    let uri = format!("/api/asignacion/{}/estado", asignacion_id);
    let response = app
        .clone()
        .oneshot(peticion("PATCH", &uri, Some(json!({ "estado": "en_proceso" }))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(peticion("PATCH", &uri, Some(json!({ "estado": "completada" }))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cerrada = cuerpo_json(response).await;
    assert_eq!(cerrada["estado"], "completada");

    // el mecánico vuelve a estar disponible y la reserva queda CONFIRMADA
    let response = app
        .clone()
        .oneshot(peticion("GET", "/api/mecanico", None))
        .await
        .unwrap();
    let listado = cuerpo_json(response).await;
    assert_eq!(listado[0]["disponible"], true);

    let uri = format!("/api/reserva/{}", reserva_id);
    let response = app.clone().oneshot(peticion("GET", &uri, None)).await.unwrap();
    let reserva = cuerpo_json(response).await;
    assert_eq!(reserva["estado"], "CONFIRMADA");
}

#[tokio::test]
async fn test_segundo_bind_devuelve_conflicto() {
    let app = app_de_prueba();

    let mecanico_id = alta_mecanico_http(&app, "Luis Pérez").await;
    let primera = alta_reserva_http(&app).await;
    let segunda = alta_reserva_http(&app).await;

    vincular_http(&app, &primera, &mecanico_id).await;

    let response = app
        .clone()
        .oneshot(peticion(
            "POST",
            "/api/asignacion",
            Some(json!({ "reserva_id": segunda, "mecanico_id": mecanico_id })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = cuerpo_json(response).await;
    assert_eq!(body["code"], "MECHANIC_BUSY");
}

#[tokio::test]
async fn test_token_de_estado_desconocido_por_http() {
    let app = app_de_prueba();

    let mecanico_id = alta_mecanico_http(&app, "Luis Pérez").await;
    let reserva_id = alta_reserva_http(&app).await;
    let asignacion_id = vincular_http(&app, &reserva_id, &mecanico_id).await;

    let uri = format!("/api/asignacion/{}/estado", asignacion_id);
    let response = app
        .clone()
        .oneshot(peticion("PATCH", &uri, Some(json!({ "estado": "terminada" }))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = cuerpo_json(response).await;
    assert_eq!(body["code"], "INVALID_STATE");
}

#[tokio::test]
async fn test_en_proceso_sin_recepcion_por_http() {
    let app = app_de_prueba();

    let mecanico_id = alta_mecanico_http(&app, "Luis Pérez").await;
    let reserva_id = alta_reserva_http(&app).await;
    let asignacion_id = vincular_http(&app, &reserva_id, &mecanico_id).await;

    let uri = format!("/api/asignacion/{}/estado", asignacion_id);
    let response = app
        .clone()
        .oneshot(peticion("PATCH", &uri, Some(json!({ "estado": "en_proceso" }))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = cuerpo_json(response).await;
    assert_eq!(body["code"], "RECEPTION_REQUIRED");
}

#[tokio::test]
async fn test_cancelar_reserva_pendiente_por_http() {
    let app = app_de_prueba();

    let reserva_id = alta_reserva_http(&app).await;

    let uri = format!("/api/reserva/{}/cancelar", reserva_id);
    let response = app.clone().oneshot(peticion("PATCH", &uri, None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = cuerpo_json(response).await;
    assert_eq!(body["data"]["estado"], "CANCELADA");

    // una reserva cancelada ya no puede vincularse
    let mecanico_id = alta_mecanico_http(&app, "Luis Pérez").await;
    let response = app
        .clone()
        .oneshot(peticion(
            "POST",
            "/api/asignacion",
            Some(json!({ "reserva_id": reserva_id, "mecanico_id": mecanico_id })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = cuerpo_json(response).await;
    assert_eq!(body["code"], "INVALID_RESERVATION_STATE");
}

#[tokio::test]
async fn test_recurso_inexistente_devuelve_404() {
    let app = app_de_prueba();

    let uri = format!("/api/asignacion/{}", uuid::Uuid::new_v4());
    let response = app.clone().oneshot(peticion("GET", &uri, None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = cuerpo_json(response).await;
    assert_eq!(body["code"], "NOT_FOUND");
}
