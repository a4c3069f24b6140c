// Route exports
pub mod error;
pub mod matchings;

use actix_web::web;

pub use error::ApiError;
pub use matchings::AppState;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(matchings::configure),
    );
}
