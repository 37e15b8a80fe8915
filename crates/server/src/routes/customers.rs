use std::collections::BTreeMap;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use service::{customers::Customer, errors::ServiceError};
use tracing::info;

use crate::errors::JsonApiError;
use crate::state::ServerState;

/// 解析请求体；不校验 Content-Type，只要求内容能解码为客户记录
fn decode_customer(body: &[u8]) -> Result<Customer, ServiceError> {
    serde_json::from_slice(body).map_err(|e| ServiceError::BadRequest(e.to_string()))
}

/// 列出全部客户（按 id 排序的映射）
#[utoipa::path(
    get, path = "/customers", tag = "customers",
    responses((status = 200, description = "All customers keyed by id"))
)]
pub async fn list_customers(State(state): State<ServerState>) -> Json<BTreeMap<String, Customer>> {
    let all = state.customers.list().await;
    info!(count = all.len(), "list customers");
    Json(all)
}

/// 获取指定客户
#[utoipa::path(
    get, path = "/customers/{id}", tag = "customers",
    params(("id" = String, Path, description = "Customer id")),
    responses(
        (status = 200, description = "Customer", body = crate::openapi::CustomerDoc),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_customer(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Customer>, JsonApiError> {
    let customer = state.customers.get(&id).await?;
    Ok(Json(customer))
}

/// 创建客户：id 为空时由服务端分配
#[utoipa::path(
    post, path = "/customers", tag = "customers",
    request_body = crate::openapi::CustomerDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::CustomerDoc),
        (status = 400, description = "Bad Request"),
        (status = 409, description = "Id taken or allocation exhausted")
    )
)]
pub async fn create_customer(
    State(state): State<ServerState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Customer>), JsonApiError> {
    let input = decode_customer(&body)?;
    let created = state.customers.create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// 更新客户；body 中的 id 与路径不同则改键
#[utoipa::path(
    put, path = "/customers/{id}", tag = "customers",
    params(("id" = String, Path, description = "Customer id")),
    request_body = crate::openapi::CustomerDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::CustomerDoc),
        (status = 400, description = "Bad Request"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Rekey target already in use")
    )
)]
pub async fn update_customer(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Customer>, JsonApiError> {
    let input = decode_customer(&body)?;
    let updated = state.customers.update(&id, input).await?;
    Ok(Json(updated))
}

/// 删除客户，返回剩余客户
#[utoipa::path(
    delete, path = "/customers/{id}", tag = "customers",
    params(("id" = String, Path, description = "Customer id")),
    responses(
        (status = 200, description = "Remaining customers keyed by id"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_customer(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<BTreeMap<String, Customer>>, JsonApiError> {
    let remaining = state.customers.delete(&id).await?;
    Ok(Json(remaining))
}
