use dotenvy::dotenv;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use caredesk::modules::users::service::UserService;
use caredesk::router::init_router;
use caredesk::state::init_app_state;

#[tokio::main]
async fn main() {
    dotenv().ok();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 && args[1] == "seed-admin" {
        handle_seed_admin(args).await;
        return;
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("{}=debug,tower_http=debug", env!("CARGO_CRATE_NAME")).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let state = init_app_state().await;
    let app = init_router(state);

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .unwrap();
    println!("🚀 Server running on http://localhost:{port}");
    println!("📚 Swagger UI available at http://localhost:{port}/swagger-ui");
    axum::serve(listener, app).await.unwrap();
}

async fn handle_seed_admin(args: Vec<String>) {
    if args.len() != 5 {
        eprintln!("Usage: {} seed-admin <username> <email> <password>", args[0]);
        std::process::exit(1);
    }

    let username = &args[2];
    let email = &args[3];
    let password = &args[4];

    let db = caredesk_db::init_db_pool().await;

    match UserService::seed_admin(&db, username, email, password).await {
        Ok(user) => {
            println!("✅ Admin user created successfully!");
            println!("   Username: {}", user.username);
            println!("   Email: {}", user.email);
            println!("   MRN: {}", user.mrn);
        }
        Err(e) => {
            eprintln!("❌ Error creating admin user: {}", e.error);
            std::process::exit(1);
        }
    }
}
