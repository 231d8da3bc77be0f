use axum::Json;
use axum::extract::State;
use bruteguard_domain::AccessList;

use crate::dto::{ListEntryRequest, StatusResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn add_to_blacklist_handler(
    State(state): State<AppState>,
    Json(payload): Json<ListEntryRequest>,
) -> ApiResult<Json<StatusResponse>> {
    mutate(state, AccessList::Blacklist, &payload.ip, Mutation::Add).await
}

pub async fn remove_from_blacklist_handler(
    State(state): State<AppState>,
    Json(payload): Json<ListEntryRequest>,
) -> ApiResult<Json<StatusResponse>> {
    mutate(state, AccessList::Blacklist, &payload.ip, Mutation::Remove).await
}

pub async fn add_to_whitelist_handler(
    State(state): State<AppState>,
    Json(payload): Json<ListEntryRequest>,
) -> ApiResult<Json<StatusResponse>> {
    mutate(state, AccessList::Whitelist, &payload.ip, Mutation::Add).await
}

pub async fn remove_from_whitelist_handler(
    State(state): State<AppState>,
    Json(payload): Json<ListEntryRequest>,
) -> ApiResult<Json<StatusResponse>> {
    mutate(state, AccessList::Whitelist, &payload.ip, Mutation::Remove).await
}

enum Mutation {
    Add,
    Remove,
}

async fn mutate(
    state: AppState,
    list: AccessList,
    entry: &str,
    mutation: Mutation,
) -> ApiResult<Json<StatusResponse>> {
    let lists = state.engine.access_lists();
    match mutation {
        Mutation::Add => lists.add_entry(list, entry).await?,
        Mutation::Remove => lists.remove_entry(list, entry).await?,
    }

    Ok(Json(StatusResponse { status: true }))
}
