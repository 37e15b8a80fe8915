use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// Wire shape of a customer. Every field is optional on input; `id` is
/// allocated by the server when empty.
#[derive(ToSchema)]
pub struct CustomerDoc {
    #[schema(example = "023004163")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub role: Option<String>,
    pub email: Option<String>,
    pub phone: Option<u64>,
    pub contacted: Option<bool>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::customers::list_customers,
        crate::routes::customers::get_customer,
        crate::routes::customers::create_customer,
        crate::routes::customers::update_customer,
        crate::routes::customers::delete_customer,
    ),
    components(schemas(HealthResponse, CustomerDoc)),
    tags(
        (name = "health"),
        (name = "customers")
    )
)]
pub struct ApiDoc;
