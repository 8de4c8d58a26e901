use crate::error::AppError;
use crate::logging::log_request;
use crate::residents::payload::{IdPayload, ResidentPayload, ResidentUpdatePayload};
use crate::AppState;
use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;
use tracing::info;

pub async fn list_records(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    log_request::<()>(&req, None);

    let summaries = state.residents.list_summaries().await?;
    if summaries.is_empty() {
        return Err(AppError::NotFound("No residents found".into()));
    }

    Ok(HttpResponse::Ok().json(summaries))
}

pub async fn register_resident(
    req: HttpRequest,
    body: web::Json<ResidentPayload>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let payload = body.into_inner();
    log_request(
        &req,
        Some(&json!({ "applicationtype": payload.applicationtype, "barangay": payload.barangay })),
    );

    let fields = payload.validate()?;
    let id = state.residents.insert(&fields).await?;
    info!("Registered resident {}", id);

    Ok(HttpResponse::Created().json(json!({
        "message": "Senior information inserted successfully",
        "id": id
    })))
}

pub async fn fetch_resident(
    req: HttpRequest,
    body: web::Json<IdPayload>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    log_request(&req, Some(&json!({ "id": body.id })));

    let id = body.validate()?;
    let resident = state
        .residents
        .find(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Resident not found".into()))?;

    Ok(HttpResponse::Ok().json(vec![resident]))
}

pub async fn update_resident(
    req: HttpRequest,
    body: web::Json<ResidentUpdatePayload>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let payload = body.into_inner();
    log_request(&req, Some(&json!({ "id": payload.id })));

    let (id, fields) = payload.validate()?;
    if !state.residents.update(id, &fields).await? {
        return Err(AppError::NotFound("Resident not found".into()));
    }
    info!("Updated resident {}", id);

    Ok(HttpResponse::Ok().json(json!({ "message": "Senior information updated successfully" })))
}

pub async fn delete_resident(
    req: HttpRequest,
    body: web::Json<IdPayload>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    log_request(&req, Some(&json!({ "id": body.id })));

    let id = body.validate()?;
    if !state.residents.exists(id).await? {
        return Err(AppError::NotFound("Resident not found".into()));
    }

    // A concurrent delete between the two statements still ends in "gone".
    state.residents.delete(id).await?;
    info!("Deleted resident {}", id);

    Ok(HttpResponse::Ok().json(json!({ "message": "Resident deleted successfully" })))
}
