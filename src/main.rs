use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use mongodb::Client;
use tracing::info;
use tracing_subscriber::EnvFilter;

use godutch::routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let uri = std::env::var("MONGODB_URI").expect("You need to add the MONGODB_URI to the env");
    info!("using the following URI: {uri}");

    let client = Client::with_uri_str(uri).await.expect("failed to connect");
    info!("connected");

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(web::Data::new(client.clone()))
            .configure(routes::configure)
    })
    .bind(("0.0.0.0", 8080))?
    .run()
    .await
}
