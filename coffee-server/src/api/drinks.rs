use crate::api::permission_gate::gated;
use crate::errors::{ApiError, ErrorResponse};
use crate::models::{
    CreateDrink, DeleteDrinkResponse, Drink, DrinkDetailsResponse, DrinkListResponse, NewDrink,
    UpdateDrink,
};
use crate::openapi::DRINKS_TAG;
use crate::state::AppState;
use crate::store::DrinkStore;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Json, Path, State,
    },
    routing::{delete, get, patch, post},
    Extension, Router,
};
use coffee_auth::Claims;
use log::{info, warn};

pub(crate) const GET_DRINKS_DETAILS: &str = "get:drinks-details";
pub(crate) const POST_DRINKS: &str = "post:drinks";
pub(crate) const PATCH_DRINKS: &str = "patch:drinks";
pub(crate) const DELETE_DRINKS: &str = "delete:drinks";

/// Drink routes; every route but the public menu requires its own permission
pub(super) fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/drinks",
            get(list_drinks).merge(gated(post(create_drink), state, POST_DRINKS)),
        )
        .route(
            "/drinks-details",
            gated(get(list_drink_details), state, GET_DRINKS_DETAILS),
        )
        .route(
            "/drinks/{id}",
            gated(patch(update_drink), state, PATCH_DRINKS).merge(gated(
                delete(delete_drink),
                state,
                DELETE_DRINKS,
            )),
        )
}

fn unprocessable(reason: impl std::fmt::Display) -> ApiError {
    warn!("Rejected drink payload: {}", reason);
    ApiError::unprocessable()
}

fn drink_id(id: Result<Path<i64>, PathRejection>) -> Result<i64, ApiError> {
    id.map(|Path(id)| id).map_err(|e| {
        warn!("Invalid drink id: {}", e.body_text());
        ApiError::not_found()
    })
}

/// Public menu: every drink in its short form
#[utoipa::path(
    get,
    path = "/drinks",
    tag = DRINKS_TAG,
    responses(
        (status = 200, description = "All drinks, without ingredient names", body = DrinkListResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
pub(crate) async fn list_drinks(
    State(state): State<AppState>,
) -> Result<Json<DrinkListResponse>, ApiError> {
    let drinks = state.store.find_all().await?;
    Ok(Json(DrinkListResponse {
        success: true,
        drinks: drinks.iter().map(Drink::short).collect(),
    }))
}

/// Every drink with its full recipe
#[utoipa::path(
    get,
    path = "/drinks-details",
    tag = DRINKS_TAG,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All drinks with full recipes", body = DrinkDetailsResponse),
        (status = 400, description = "Token carries no permissions", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Permission get:drinks-details not granted", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
pub(crate) async fn list_drink_details(
    State(state): State<AppState>,
) -> Result<Json<DrinkDetailsResponse>, ApiError> {
    let drinks = state.store.find_all().await?;
    Ok(Json(DrinkDetailsResponse {
        success: true,
        drinks: drinks.iter().map(Drink::long).collect(),
    }))
}

/// Adds a drink to the menu
#[utoipa::path(
    post,
    path = "/drinks",
    tag = DRINKS_TAG,
    security(("bearer_auth" = [])),
    request_body = CreateDrink,
    responses(
        (status = 200, description = "The created drink", body = DrinkDetailsResponse),
        (status = 400, description = "Token carries no permissions", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Permission post:drinks not granted", body = ErrorResponse),
        (status = 422, description = "Invalid payload or duplicate title", body = ErrorResponse)
    )
)]
pub(crate) async fn create_drink(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    body: Result<Json<CreateDrink>, JsonRejection>,
) -> Result<Json<DrinkDetailsResponse>, ApiError> {
    let Json(body) = body.map_err(|e| unprocessable(e.body_text()))?;
    let drink = NewDrink::new(body.title, body.recipe).map_err(unprocessable)?;

    let drink = state.store.insert(drink).await?;
    info!(
        "Subject {} created drink {} '{}'",
        claims.subject(),
        drink.id,
        drink.title
    );

    Ok(Json(DrinkDetailsResponse {
        success: true,
        drinks: vec![drink.long()],
    }))
}

/// Changes the title and/or recipe of a drink.
///
/// The drink is looked up before the body is inspected, so an unknown id is a 404
/// whatever the payload.
#[utoipa::path(
    patch,
    path = "/drinks/{id}",
    tag = DRINKS_TAG,
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Drink id"),
    ),
    request_body = UpdateDrink,
    responses(
        (status = 200, description = "The updated drink", body = DrinkDetailsResponse),
        (status = 400, description = "Token carries no permissions", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Permission patch:drinks not granted", body = ErrorResponse),
        (status = 404, description = "No drink with this id", body = ErrorResponse),
        (status = 422, description = "Invalid payload or duplicate title", body = ErrorResponse)
    )
)]
pub(crate) async fn update_drink(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<UpdateDrink>, JsonRejection>,
) -> Result<Json<DrinkDetailsResponse>, ApiError> {
    let id = drink_id(id)?;
    let mut drink = state
        .store
        .find_by_id(id)
        .await?
        .ok_or_else(ApiError::not_found)?;

    let Json(changes) = body.map_err(|e| unprocessable(e.body_text()))?;
    changes.apply(&mut drink).map_err(unprocessable)?;

    let drink = state.store.update(&drink).await?;
    info!(
        "Subject {} updated drink {} '{}'",
        claims.subject(),
        drink.id,
        drink.title
    );

    Ok(Json(DrinkDetailsResponse {
        success: true,
        drinks: vec![drink.long()],
    }))
}

/// Removes a drink from the menu
#[utoipa::path(
    delete,
    path = "/drinks/{id}",
    tag = DRINKS_TAG,
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Drink id"),
    ),
    responses(
        (status = 200, description = "Id of the deleted drink", body = DeleteDrinkResponse),
        (status = 400, description = "Token carries no permissions", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Permission delete:drinks not granted", body = ErrorResponse),
        (status = 404, description = "No drink with this id", body = ErrorResponse)
    )
)]
pub(crate) async fn delete_drink(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<DeleteDrinkResponse>, ApiError> {
    let id = drink_id(id)?;
    state.store.delete(id).await?;
    info!("Subject {} deleted drink {}", claims.subject(), id);

    Ok(Json(DeleteDrinkResponse {
        success: true,
        delete: id,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Ingredient, NewDrink};
    use crate::test_utils::TestFixture;
    use http::StatusCode;
    use serde_json::json;

    const ALL_PERMISSIONS: &[&str] = &[GET_DRINKS_DETAILS, POST_DRINKS, PATCH_DRINKS, DELETE_DRINKS];

    async fn seed_latte(fixture: &TestFixture) -> Drink {
        fixture
            .state
            .store
            .insert(NewDrink {
                title: "latte".to_string(),
                recipe: vec![
                    Ingredient {
                        color: "brown".to_string(),
                        name: "espresso".to_string(),
                        parts: 1,
                    },
                    Ingredient {
                        color: "white".to_string(),
                        name: "milk".to_string(),
                        parts: 3,
                    },
                ],
            })
            .await
            .expect("seed drink")
    }

    #[tokio::test]
    async fn test_index_greets() {
        let fixture = TestFixture::new().await;
        let response = fixture.get("/").await;
        response.assert_ok();
        assert_eq!(
            response.json,
            json!({"success": true, "message": "hello-coffee"})
        );
    }

    #[tokio::test]
    async fn test_list_drinks_is_public_and_short() {
        let fixture = TestFixture::new().await;
        let latte = seed_latte(&fixture).await;

        let response = fixture.get("/drinks").await;
        response.assert_ok();
        assert_eq!(
            response.json,
            json!({
                "success": true,
                "drinks": [{
                    "id": latte.id,
                    "title": "latte",
                    "recipe": [
                        {"color": "brown", "parts": 1},
                        {"color": "white", "parts": 3},
                    ]
                }]
            })
        );
    }

    #[tokio::test]
    async fn test_list_drink_details_shows_names() {
        let fixture = TestFixture::new().await;
        seed_latte(&fixture).await;
        let token = fixture.token(&[GET_DRINKS_DETAILS]);

        let response = fixture.get_with_token("/drinks-details", &token).await;
        response.assert_ok();
        let recipe = response.json["drinks"][0]["recipe"].as_array().unwrap();
        assert_eq!(recipe[0]["name"], "espresso");
        assert_eq!(recipe[1]["name"], "milk");
    }

    #[tokio::test]
    async fn test_list_drink_details_requires_token() {
        let fixture = TestFixture::new().await;
        let response = fixture.get("/drinks-details").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(response.json["success"], false);
        assert_eq!(response.json["error"], 401);
        assert_eq!(response.json["code"], "missing_or_malformed_header");
    }

    #[tokio::test]
    async fn test_list_drink_details_requires_permission() {
        let fixture = TestFixture::new().await;
        let token = fixture.token(&[POST_DRINKS]);
        let response = fixture.get_with_token("/drinks-details", &token).await;
        response.assert_status(StatusCode::FORBIDDEN);
        assert_eq!(response.json["code"], "unauthorized");
    }

    #[tokio::test]
    async fn test_create_drink_normalizes_single_ingredient() {
        let fixture = TestFixture::new().await;
        let token = fixture.token(&[POST_DRINKS]);

        let response = fixture
            .post(
                "/drinks",
                &json!({
                    "title": "water",
                    "recipe": {"color": "blue", "name": "water", "parts": 1}
                }),
                Some(&token),
            )
            .await;
        response.assert_ok();
        assert_eq!(response.json["success"], true);

        let drinks = response.json["drinks"].as_array().unwrap();
        assert_eq!(drinks.len(), 1);
        assert_eq!(
            drinks[0]["recipe"],
            json!([{"color": "blue", "name": "water", "parts": 1}])
        );

        let stored = fixture.state.store.find_all().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].recipe.len(), 1);

        let details = fixture
            .get_with_token("/drinks-details", &fixture.token(&[GET_DRINKS_DETAILS]))
            .await;
        details.assert_ok();
        assert_eq!(
            details.json["drinks"],
            json!([{
                "id": stored[0].id,
                "title": "water",
                "recipe": [{"color": "blue", "name": "water", "parts": 1}]
            }])
        );
    }

    #[tokio::test]
    async fn test_create_drink_without_title_is_unprocessable() {
        let fixture = TestFixture::new().await;
        let token = fixture.token(&[POST_DRINKS]);

        let response = fixture
            .post(
                "/drinks",
                &json!({"recipe": [{"color": "blue", "name": "water", "parts": 1}]}),
                Some(&token),
            )
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.json["error"], 422);
        assert!(fixture.state.store.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_drink_with_duplicate_title_is_unprocessable() {
        let fixture = TestFixture::new().await;
        seed_latte(&fixture).await;
        let token = fixture.token(&[POST_DRINKS]);

        let response = fixture
            .post(
                "/drinks",
                &json!({"title": "latte", "recipe": []}),
                Some(&token),
            )
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(fixture.state.store.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_authorization_has_no_side_effects() {
        let fixture = TestFixture::new().await;
        let token = fixture.token(&[GET_DRINKS_DETAILS]);

        let response = fixture
            .post(
                "/drinks",
                &json!({"title": "mocha", "recipe": []}),
                Some(&token),
            )
            .await;
        response.assert_status(StatusCode::FORBIDDEN);
        assert!(fixture.state.store.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_drink_changes_title_only() {
        let fixture = TestFixture::new().await;
        let latte = seed_latte(&fixture).await;
        let token = fixture.token(&[PATCH_DRINKS]);

        let response = fixture
            .patch(
                format!("/drinks/{}", latte.id),
                &json!({"title": "caffe latte"}),
                Some(&token),
            )
            .await;
        response.assert_ok();
        let body = response.json_as::<DrinkDetailsResponse>();
        assert_eq!(body.drinks[0].id, latte.id);
        assert_eq!(body.drinks[0].title, "caffe latte");
        assert_eq!(body.drinks[0].recipe, latte.recipe);
    }

    #[tokio::test]
    async fn test_update_drink_normalizes_recipe() {
        let fixture = TestFixture::new().await;
        let latte = seed_latte(&fixture).await;
        let token = fixture.token(&[PATCH_DRINKS]);

        let response = fixture
            .patch(
                format!("/drinks/{}", latte.id),
                &json!({"recipe": {"color": "black", "name": "coffee", "parts": 2}}),
                Some(&token),
            )
            .await;
        response.assert_ok();

        let stored = fixture.state.store.find_by_id(latte.id).await.unwrap().unwrap();
        assert_eq!(stored.title, "latte");
        assert_eq!(stored.recipe.len(), 1);
        assert_eq!(stored.recipe[0].name, "coffee");
    }

    #[tokio::test]
    async fn test_update_unknown_drink_is_not_found_whatever_the_body() {
        let fixture = TestFixture::new().await;
        let token = fixture.token(&[PATCH_DRINKS]);

        for body in [json!({"title": "ghost"}), json!({"recipe": "nonsense"}), json!([])] {
            let response = fixture.patch("/drinks/9999", &body, Some(&token)).await;
            response.assert_status(StatusCode::NOT_FOUND);
            assert_eq!(response.json["message"], "resource not found");
        }
    }

    #[tokio::test]
    async fn test_update_with_invalid_body_is_unprocessable() {
        let fixture = TestFixture::new().await;
        let latte = seed_latte(&fixture).await;
        let token = fixture.token(&[PATCH_DRINKS]);

        let response = fixture
            .patch(
                format!("/drinks/{}", latte.id),
                &json!({"recipe": {"color": "blue", "name": "water", "parts": 0}}),
                Some(&token),
            )
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

        let stored = fixture.state.store.find_by_id(latte.id).await.unwrap().unwrap();
        assert_eq!(stored, latte);
    }

    #[tokio::test]
    async fn test_update_with_null_field_is_unprocessable() {
        let fixture = TestFixture::new().await;
        let latte = seed_latte(&fixture).await;
        let token = fixture.token(&[PATCH_DRINKS]);

        for body in [json!({"title": null}), json!({"recipe": null})] {
            let response = fixture
                .patch(format!("/drinks/{}", latte.id), &body, Some(&token))
                .await;
            response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
            assert_eq!(response.json["error"], 422);
        }

        let stored = fixture.state.store.find_by_id(latte.id).await.unwrap().unwrap();
        assert_eq!(stored, latte);
    }

    #[tokio::test]
    async fn test_unsupported_method_is_json_method_not_allowed() {
        let fixture = TestFixture::new().await;
        let latte = seed_latte(&fixture).await;
        let token = fixture.token(ALL_PERMISSIONS);

        let response = fixture
            .send_json(
                http::Method::PUT,
                format!("/drinks/{}", latte.id),
                &json!({"title": "flat white"}),
                Some(&token),
            )
            .await;
        response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.json["success"], false);
        assert_eq!(response.json["error"], 405);
        assert_eq!(
            fixture.state.store.find_by_id(latte.id).await.unwrap().unwrap(),
            latte
        );
    }

    #[tokio::test]
    async fn test_non_integer_id_is_not_found() {
        let fixture = TestFixture::new().await;
        let token = fixture.token(ALL_PERMISSIONS);

        let response = fixture.delete("/drinks/latte", Some(&token)).await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_drink() {
        let fixture = TestFixture::new().await;
        let latte = seed_latte(&fixture).await;
        let token = fixture.token(&[DELETE_DRINKS]);

        let response = fixture
            .delete(format!("/drinks/{}", latte.id), Some(&token))
            .await;
        response.assert_ok();
        assert_eq!(response.json, json!({"success": true, "delete": latte.id}));

        let listing = fixture.get("/drinks").await;
        listing.assert_ok();
        assert_eq!(listing.json["drinks"], json!([]));

        let again = fixture
            .delete(format!("/drinks/{}", latte.id), Some(&token))
            .await;
        again.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_requires_its_own_permission() {
        let fixture = TestFixture::new().await;
        let latte = seed_latte(&fixture).await;
        let token = fixture.token(&[PATCH_DRINKS]);

        let response = fixture
            .delete(format!("/drinks/{}", latte.id), Some(&token))
            .await;
        response.assert_status(StatusCode::FORBIDDEN);
        assert!(fixture.state.store.find_by_id(latte.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_not_found() {
        let fixture = TestFixture::new().await;
        let response = fixture.get("/teapot").await;
        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json["success"], false);
        assert_eq!(response.json["error"], 404);
    }
}
