use actix_web::web;

pub mod games;
pub mod health;
pub mod realtime;
pub mod tokens;

/// Configure the full route tree. Used by `main.rs` and by integration
/// tests, so both exercise the same paths and middleware: token issuance
/// and game creation are open, everything under a game id passes through
/// `JwtExtract` (wired inside `games::configure_routes`).
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health check: /health
    cfg.service(web::scope("/health").configure(health::configure_routes));

    // Token issuance: /api/tokens
    cfg.service(web::scope("/api/tokens").configure(tokens::configure_routes));

    // Game tables: /api/games/**
    cfg.service(web::scope("/api/games").configure(games::configure_routes));

    // Realtime: /ws
    cfg.service(web::scope("/ws").configure(realtime::configure_routes));
}
