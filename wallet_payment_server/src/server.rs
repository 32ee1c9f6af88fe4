use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::*;
use wallet_payment_engine::{
    events::{EventHandlers, EventHooks, EventProducers},
    LedgerApi,
    PaymentFlowApi,
    RegistryApi,
    SqliteDatabase,
};

use crate::{
    config::ServerConfig,
    errors::ServerError,
    integrations::EmailApi,
    routes::{balance, confirm_payment, health, initiate_payment, recharge, register},
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let notifier = EmailApi::new(config.email.clone(), config.token_ttl)
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let handlers = EventHandlers::new(16, default_event_hooks());
    let producers = handlers.producers();
    handlers.start_handlers().await;
    let srv = create_server_instance(config, db, notifier, producers)?;
    srv.await.map_err(|e| ServerError::BackendError(e.to_string()))
}

/// The default subscribers: log confirmations and delivery failures. Deployments that need more
/// (alerting, resend queues) replace these hooks before starting the server.
fn default_event_hooks() -> EventHooks {
    let mut hooks = EventHooks::default();
    hooks.on_payment_confirmed(|ev| {
        Box::pin(async move {
            info!("✅️ Payment of {} confirmed on session {}. New balance {}", ev.amount, ev.session_id, ev.new_balance);
        })
    });
    hooks.on_token_delivery_failed(|ev| {
        Box::pin(async move {
            warn!("📧️ Token delivery to {} failed for session {}: {}", ev.email, ev.session_id, ev.reason);
        })
    });
    hooks
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    notifier: EmailApi,
    producers: EventProducers,
) -> Result<Server, ServerError> {
    let token_ttl = config.token_ttl;
    let srv = HttpServer::new(move || {
        let registry_api = RegistryApi::new(db.clone());
        let ledger_api = LedgerApi::new(db.clone());
        let payment_api =
            PaymentFlowApi::new(db.clone(), notifier.clone(), producers.clone()).with_token_ttl(token_ttl);
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("pwg::access_log"))
            .app_data(web::Data::new(registry_api))
            .app_data(web::Data::new(ledger_api))
            .app_data(web::Data::new(payment_api))
            .service(health)
            .service(
                web::scope("/wallet")
                    .route("/register", web::post().to(register::<SqliteDatabase>))
                    .route("/recharge", web::post().to(recharge::<SqliteDatabase>))
                    .route("/payment", web::post().to(initiate_payment::<SqliteDatabase, EmailApi>))
                    .route("/confirm-payment", web::post().to(confirm_payment::<SqliteDatabase, EmailApi>))
                    .route("/balance", web::get().to(balance::<SqliteDatabase>)),
            )
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
