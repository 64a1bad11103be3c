use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::{
    api::payload::Payload,
    error::AppResult,
    models::{ContactInput, ContactView},
    services::contacts::ContactsService,
    AppState,
};

#[derive(Debug, Serialize)]
pub struct SavedContactResponse {
    pub message: String,
    pub data: ContactView,
}

#[derive(Debug, Serialize)]
pub struct ContactListResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<ContactView>,
}

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub success: bool,
    pub data: ContactView,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub success: bool,
    pub message: String,
}

pub async fn create_contact(
    State(state): State<AppState>,
    Payload(req): Payload<ContactInput>,
) -> AppResult<(StatusCode, Json<SavedContactResponse>)> {
    let contacts_service = ContactsService::new(state.store);
    let contact = contacts_service.create_contact(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(SavedContactResponse {
            message: "Message sent successfully".to_string(),
            data: ContactView::summary(contact, &state.timestamps),
        }),
    ))
}

pub async fn get_contacts(State(state): State<AppState>) -> AppResult<Json<ContactListResponse>> {
    let contacts_service = ContactsService::new(state.store);
    let contacts = contacts_service.get_contacts().await?;

    let data: Vec<ContactView> = contacts
        .into_iter()
        .map(|c| ContactView::summary(c, &state.timestamps))
        .collect();

    Ok(Json(ContactListResponse {
        success: true,
        count: data.len(),
        data,
    }))
}

pub async fn get_contact(
    State(state): State<AppState>,
    Path(contact_id): Path<String>,
) -> AppResult<Json<ContactResponse>> {
    let contacts_service = ContactsService::new(state.store);
    let contact = contacts_service.get_contact(&contact_id).await?;

    Ok(Json(ContactResponse {
        success: true,
        data: ContactView::detailed(contact, &state.timestamps),
    }))
}

pub async fn update_contact(
    State(state): State<AppState>,
    Path(contact_id): Path<String>,
    Payload(req): Payload<ContactInput>,
) -> AppResult<Json<SavedContactResponse>> {
    let contacts_service = ContactsService::new(state.store);
    let contact = contacts_service.update_contact(&contact_id, req).await?;

    Ok(Json(SavedContactResponse {
        message: "Contact updated successfully".to_string(),
        data: ContactView::detailed(contact, &state.timestamps),
    }))
}

pub async fn delete_contact(
    State(state): State<AppState>,
    Path(contact_id): Path<String>,
) -> AppResult<Json<StatusResponse>> {
    let contacts_service = ContactsService::new(state.store);
    contacts_service.delete_contact(&contact_id).await?;

    Ok(Json(StatusResponse {
        success: true,
        message: "Contact deleted successfully".to_string(),
    }))
}
