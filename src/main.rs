use std::sync::Arc;

use actix_web::web;
use mongodb::Client;
use shuttle_actix_web::ShuttleActixWeb;
use shuttle_runtime::SecretStore;
use shuttle_runtime::__internals::Context;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use staff_directory::config::Config;
use staff_directory::routes::{self, ApiDoc};
use staff_directory::{Directory, MongoStore};

#[shuttle_runtime::main]
async fn main(
    #[shuttle_runtime::Secrets] secrets: SecretStore,
) -> ShuttleActixWeb<impl FnOnce(&mut web::ServiceConfig) + Send + Clone + 'static> {
    let settings = Config::from_secrets(&secrets).context("secret MONGODB_URI was not found")?;
    let client = Client::with_uri_str(&settings.mongodb_uri)
        .await
        .context("connecting to MongoDB")?;

    let store = Arc::new(MongoStore::new(client.database(&settings.database_name)));
    store
        .ensure_indexes()
        .await
        .context("creating unique indexes")?;
    tracing::info!(database = %settings.database_name, "storage ready");

    let directory = Directory::new(store);
    let departments = web::Data::new(directory.departments);
    let staff = web::Data::new(directory.staff);

    let config = move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(departments.clone())
            .app_data(staff.clone())
            .configure(routes::configure)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            );
    };

    Ok(config.into())
}
