use crate::interface_adapters::protocol::StatusDto;
use crate::interface_adapters::state::AppState;

use axum::{Json, extract::State};
use std::sync::Arc;

pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusDto> {
    // Copy out of the watch so the borrow is not held across the response.
    let status = *state.status_rx.borrow();
    Json(status.into())
}
