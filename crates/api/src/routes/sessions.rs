//! Route definitions for journey editing sessions.
//!
//! ```text
//! POST   /                                          create_session
//! POST   /load                                      load_session
//! GET    /{id}                                      get_session
//! DELETE /{id}                                      delete_session
//! PUT    /{id}/metadata                             update_metadata
//! POST   /{id}/blocks                               add_block
//! POST   /{id}/blocks/reorder                       reorder_blocks
//! PUT    /{id}/blocks/{block_id}                    rename_block
//! DELETE /{id}/blocks/{block_id}                    remove_block
//! PUT    /{id}/blocks/{block_id}/config             set_block_config
//! PUT    /{id}/blocks/{block_id}/shoot-inspect      set_shoot_inspect
//! GET    /{id}/blocks/{block_id}/shoot-inspect/export
//! POST   /{id}/blocks/{block_id}/shoot-inspect/import
//! POST   /{id}/save                                 save_session
//! GET    /{id}/export                               export_session
//! POST   /{id}/import                               import_session
//! POST   /{id}/duplicate                            duplicate_session
//! ```

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::sessions;
use crate::state::AppState;

/// Session routes — mounted at `/sessions`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(sessions::create_session))
        .route("/load", post(sessions::load_session))
        .route(
            "/{id}",
            get(sessions::get_session).delete(sessions::delete_session),
        )
        .route("/{id}/metadata", put(sessions::update_metadata))
        .route("/{id}/blocks", post(sessions::add_block))
        .route("/{id}/blocks/reorder", post(sessions::reorder_blocks))
        .route(
            "/{id}/blocks/{block_id}",
            put(sessions::rename_block).delete(sessions::remove_block),
        )
        .route(
            "/{id}/blocks/{block_id}/config",
            put(sessions::set_block_config),
        )
        .route(
            "/{id}/blocks/{block_id}/shoot-inspect",
            put(sessions::set_shoot_inspect),
        )
        .route(
            "/{id}/blocks/{block_id}/shoot-inspect/export",
            get(sessions::export_shoot_inspect),
        )
        .route(
            "/{id}/blocks/{block_id}/shoot-inspect/import",
            post(sessions::import_shoot_inspect),
        )
        .route("/{id}/save", post(sessions::save_session))
        .route("/{id}/export", get(sessions::export_session))
        .route("/{id}/import", post(sessions::import_session))
        .route("/{id}/duplicate", post(sessions::duplicate_session))
}
