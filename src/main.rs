use axum::{
    routing::{get, post},
    Router,
};
use dotenvy::dotenv;
use sqlx::sqlite::SqlitePoolOptions;
use tower_http::trace::TraceLayer;

use activistdb::config::Config;
use activistdb::database::schema;
use activistdb::services::query::{QueryComposer, QueryRules};
use activistdb::web::routes::activists;
use activistdb::web::AppState;

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::from_env().expect("DATABASE_URL must be set");

    let pool = SqlitePoolOptions::new()
        .connect(&config.database_url)
        .await
        .expect("failed to connect to database");
    schema::init(&pool).await.expect("failed to initialize schema");

    let state = AppState {
        pool,
        composer: QueryComposer::new(QueryRules::default()),
    };

    let app = Router::new()
        .route("/activists/list", post(activists::list_handler))
        .route("/activists", post(activists::create_handler))
        .route("/activists/names", get(activists::names_handler))
        .route("/activists/merge", post(activists::merge_handler))
        .route(
            "/activists/:id",
            get(activists::get_handler).put(activists::update_handler),
        )
        .route("/activists/:id/hide", post(activists::hide_handler))
        .route(
            "/rosters/chapter-members",
            get(activists::chapter_members_handler),
        )
        .route("/rosters/organizers", get(activists::organizers_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("failed to bind listen address");
    tracing::info!("listening on {}", config.bind_addr);
    axum::serve(listener, app).await.expect("server error");
}
