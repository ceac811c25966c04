use sea_orm::Database;
use tracing::{info, warn};

use firmq_auth_types::token::SessionKey;
use firmq_core::config::Config;
use firmq_core::tracing::init_tracing;

use firmq_frontend::config::FrontendConfig;
use firmq_frontend::infra::db::DbAccountRepository;
use firmq_frontend::infra::notify::{
    EMAIL_CHANNEL, LogDelivery, NotificationQueue, Notifier, SMS_CHANNEL, spawn_worker,
};
use firmq_frontend::infra::sms::HttpSmsDelivery;
use firmq_frontend::infra::smtp::SmtpEmailDelivery;
use firmq_frontend::router::build_router;
use firmq_frontend::state::AppState;
use firmq_frontend::usecase::account::BootstrapAdminUseCase;

#[tokio::main]
async fn main() {
    init_tracing("info,sqlx=warn");

    let config = FrontendConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let (email, email_rx) = NotificationQueue::bounded(
        EMAIL_CHANNEL,
        config.email_queue_capacity,
        config.enqueue_timeout(),
    );
    match config.smtp() {
        Some(settings) => {
            let delivery = SmtpEmailDelivery::new(&settings).expect("invalid SMTP configuration");
            spawn_worker(EMAIL_CHANNEL, email_rx, delivery);
        }
        None => {
            warn!("SMTP_HOST not set; email confirmations are logged, not sent");
            spawn_worker(EMAIL_CHANNEL, email_rx, LogDelivery);
        }
    }

    let (sms, sms_rx) = NotificationQueue::bounded(
        SMS_CHANNEL,
        config.sms_queue_capacity,
        config.enqueue_timeout(),
    );
    match config.sms() {
        Some(settings) => {
            let delivery = HttpSmsDelivery::new(
                reqwest::Client::new(),
                settings.url,
                settings.api_key,
                settings.api_secret,
                settings.from,
            );
            spawn_worker(SMS_CHANNEL, sms_rx, delivery);
        }
        None => {
            warn!("SMS provider not configured; sms codes are logged, not sent");
            spawn_worker(SMS_CHANNEL, sms_rx, LogDelivery);
        }
    }

    if let Some(input) = config.bootstrap_admin() {
        let usecase = BootstrapAdminUseCase {
            repo: DbAccountRepository { db: db.clone() },
        };
        match usecase.execute(input).await {
            Ok(true) => info!("bootstrap admin created"),
            Ok(false) => info!("bootstrap admin already present"),
            Err(e) => panic!("failed to bootstrap admin account: {e:?}"),
        }
    }

    let state = AppState {
        db,
        session_key: SessionKey::new(config.jwt_secret.clone()),
        notifier: Notifier { email, sms },
        ttl: config.code_ttl(),
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.frontend_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("frontend service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
