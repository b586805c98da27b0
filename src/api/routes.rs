use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use crate::api::handlers::{
    admin::{deactivate_player, import_enhanced, import_players, list_enhanced},
    news::{create_news, delete_all_news, delete_news, get_news, list_news, update_news},
    players::{get_player, list_players},
    require_admin, AppState,
};

pub fn create_router(state: Arc<AppState>) -> Router {
    let admin = Router::new()
        .route("/api/admin/players/import", post(import_players))
        .route("/api/admin/players/import-enhanced", post(import_enhanced))
        .route("/api/admin/players/enhanced", get(list_enhanced))
        .route("/api/admin/players/:id/deactivate", post(deactivate_player))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    Router::new()
        .route("/api/players", get(list_players))
        .route("/api/players/:id", get(get_player))
        .route("/api/news", get(list_news).post(create_news).delete(delete_all_news))
        .route("/api/news/:id", get(get_news).put(update_news).delete(delete_news))
        .merge(admin)
        .with_state(state)
}
