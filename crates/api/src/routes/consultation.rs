use axum::{routing::get, Router};
use std::sync::Arc;

use crate::{handlers, services::scheduling::CONSULTATION_DATES_PATH, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new().route(
        CONSULTATION_DATES_PATH,
        get(handlers::consultation::list_consultation_dates)
            .post(handlers::consultation::create_consultation_date),
    )
}
