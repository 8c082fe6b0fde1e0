//! Realtime upgrade route. Registration-level auth happens inside the
//! websocket session, not at upgrade time, so this route carries no
//! middleware.

use actix_web::web;

use crate::ws::session;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("").route(web::get().to(session::upgrade)));
}
