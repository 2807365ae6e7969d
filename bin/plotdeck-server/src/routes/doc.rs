use crate::routes::{chat, config_api, datasets, health, plots};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(info(
    title = "plotdeck-server",
    description = "Dataset-grounded chart synthesis and chat API",
    version = "0.1.0",
    contact(name = "plotdeck", url = "https://github.com/plotdeck/plotdeck")
))]
pub struct ApiDoc;

pub fn get_docs() -> utoipa::openapi::OpenApi {
    let mut root = ApiDoc::openapi();
    root.merge(health::HealthApi::openapi());
    root.merge(datasets::DatasetsApi::openapi());
    root.merge(chat::ChatApi::openapi());
    root.merge(plots::PlotsApi::openapi());
    root.merge(config_api::ConfigApi::openapi());
    root
}
