use crate::api::drinks;
use crate::errors::ErrorResponse;
use crate::models::{
    CreateDrink, DeleteDrinkResponse, Drink, DrinkDetailsResponse, DrinkListResponse, DrinkShort,
    Ingredient, IngredientShort, RecipeInput, UpdateDrink,
};
use crate::state::AppState;
use axum::{routing::get, Json, Router};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_scalar::{Scalar, Servable};

pub(crate) const HEALTH_TAG: &str = "Health API";
pub(crate) const DRINKS_TAG: &str = "Drinks API";

/// Name of the bearer token security scheme referenced by gated operations
pub(crate) const BEARER_AUTH: &str = "bearer_auth";

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            BEARER_AUTH,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        drinks::list_drinks,
        drinks::list_drink_details,
        drinks::create_drink,
        drinks::update_drink,
        drinks::delete_drink,
    ),
    components(schemas(
        Ingredient,
        IngredientShort,
        RecipeInput,
        Drink,
        DrinkShort,
        CreateDrink,
        UpdateDrink,
        DrinkListResponse,
        DrinkDetailsResponse,
        DeleteDrinkResponse,
        ErrorResponse,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = HEALTH_TAG, description = "Health check endpoints"),
        (name = DRINKS_TAG, description = "Drink menu endpoints"),
    ),
    info(
        title = "Coffee Shop API",
        description = "Drink menu service for the coffee shop",
        version = "0.1.0"
    )
)]
pub(crate) struct ApiDoc;

/// Serves the generated document as JSON and through the Scalar UI
pub(crate) fn router(api_doc: utoipa::openapi::OpenApi) -> Router<AppState> {
    let document = Json(api_doc.clone());
    Router::new()
        .route("/openapi.json", get(move || async move { document }))
        .merge(Scalar::with_url("/scalar", api_doc))
}
