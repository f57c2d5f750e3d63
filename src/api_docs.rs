use crate::api;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::auth::register,
        api::auth::login,
        api::purchases::create_purchase,
        api::sales::create_sale,
        api::reports::dashboard,
        api::reports::profit,
    ),
    tags(
        (name = "farmledger", description = "Farm operations ledger API")
    )
)]
pub struct ApiDoc;
