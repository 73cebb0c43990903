use axum::http::{StatusCode, header};
use recipebox_recipe::TagInput;
use serde_json::{Value, json};

mod common;

struct Catalog {
    flour: String,
    sugar: String,
    milk_ml: String,
    milk_l: String,
    lunch: String,
    dessert: String,
}

async fn seed_catalog(app: &common::TestApp) -> Catalog {
    let recipe = recipebox_recipe::Command::new(app.state.clone());
    let ingredient = |name: &'static str, unit: &'static str| {
        let recipe = recipe.clone();
        async move { recipe.ingredient.create(name, unit).await.unwrap().id }
    };
    let tag = |name: &'static str, color: &'static str| {
        let recipe = recipe.clone();
        async move {
            recipe
                .tag
                .create(TagInput {
                    name: name.to_owned(),
                    slug: name.to_lowercase(),
                    color: color.to_owned(),
                })
                .await
                .unwrap()
                .id
        }
    };

    Catalog {
        flour: ingredient("Flour", "g").await,
        sugar: ingredient("Sugar", "g").await,
        milk_ml: ingredient("Milk", "ml").await,
        milk_l: ingredient("Milk", "l").await,
        lunch: tag("Lunch", "#00FF00").await,
        dessert: tag("Dessert", "#FF0000").await,
    }
}

fn recipe_body(name: &str, ingredients: &[(&str, i64)], tags: &[&str]) -> Value {
    json!({
        "name": name,
        "text": format!("How to cook {name}"),
        "cooking_time": 20,
        "ingredients": ingredients
            .iter()
            .map(|(id, amount)| json!({"id": id, "amount": amount}))
            .collect::<Vec<_>>(),
        "tags": tags,
    })
}

async fn create_recipe(app: &common::TestApp, user: &str, body: Value) -> String {
    let (status, recipe) = app.json("POST", "/api/recipes", Some(user), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{recipe}");

    recipe["id"].as_str().unwrap().to_owned()
}

#[tokio::test]
async fn test_health() {
    let app = common::setup_app().await;

    let (status, body) = app.json("GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = app.json("GET", "/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_authentication() {
    let app = common::setup_app().await;
    let catalog = seed_catalog(&app).await;

    let (status, body) = app
        .json(
            "POST",
            "/api/recipes",
            None,
            Some(recipe_body("Bread", &[(&catalog.flour, 500)], &[&catalog.lunch])),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["errors"].is_string());

    let (status, _) = app
        .json("GET", "/api/recipes", Some("unknown-user"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app.json("GET", "/api/recipes", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let response = app
        .send("GET", "/api/recipes/download_shopping_cart", None, None)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_errors() {
    let app = common::setup_app().await;
    app.register("john").await;

    let (status, body) = app
        .json(
            "POST",
            "/api/users",
            None,
            Some(json!({
                "email": "other@recipebox.localhost",
                "username": "john",
                "first_name": "John",
                "last_name": "Doe",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"], "A user with that username already exists");

    let (status, _) = app
        .json(
            "POST",
            "/api/users",
            None,
            Some(json!({
                "email": "not-an-email",
                "username": "albert",
                "first_name": "Albert",
                "last_name": "Doe",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_catalog_routes() {
    let app = common::setup_app().await;
    let catalog = seed_catalog(&app).await;

    let (status, body) = app.json("GET", "/api/ingredients?name=mi", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let units = body
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["measurement_unit"].as_str().unwrap().to_owned())
        .collect::<Vec<_>>();
    assert_eq!(units, vec!["l", "ml"]);

    let uri = format!("/api/ingredients/{}", catalog.sugar);
    let (status, body) = app.json("GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Sugar");

    let (status, body) = app.json("GET", "/api/ingredients/unknown", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["errors"], "Ingredient not found");

    let (status, body) = app.json("GET", "/api/tags", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["slug"], "dessert");
    assert_eq!(body[1]["slug"], "lunch");

    let uri = format!("/api/tags/{}", catalog.lunch);
    let (status, body) = app.json("GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["color"], "#00FF00");
}

#[tokio::test]
async fn test_recipe_lifecycle() {
    let app = common::setup_app().await;
    let catalog = seed_catalog(&app).await;
    let john = app.register("john").await;
    let albert = app.register("albert").await;

    let id = create_recipe(
        &app,
        &john,
        recipe_body("Bread", &[(&catalog.flour, 500)], &[&catalog.lunch]),
    )
    .await;

    let uri = format!("/api/recipes/{id}");
    let (status, body) = app.json("GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["author"]["username"], "john");
    assert_eq!(body["ingredients"][0]["amount"], 500);
    assert_eq!(body["is_favorited"], false);

    let update = recipe_body("Sweet bread", &[(&catalog.sugar, 50)], &[&catalog.dessert]);
    let (status, _) = app
        .json("PATCH", &uri, Some(&albert), Some(update.clone()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.json("PATCH", &uri, Some(&john), Some(update)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Sweet bread");
    assert_eq!(body["tags"][0]["slug"], "dessert");

    let (status, body) = app
        .json(
            "POST",
            "/api/recipes",
            Some(&john),
            Some(recipe_body("Empty", &[], &[&catalog.lunch])),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"].is_string());

    let (status, _) = app.json("DELETE", &uri, Some(&albert), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.json("DELETE", &uri, Some(&john), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.json("GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_favorites_and_filters() {
    let app = common::setup_app().await;
    let catalog = seed_catalog(&app).await;
    let john = app.register("john").await;

    let bread = create_recipe(
        &app,
        &john,
        recipe_body("Bread", &[(&catalog.flour, 500)], &[&catalog.lunch]),
    )
    .await;
    let cake = create_recipe(
        &app,
        &john,
        recipe_body("Cake", &[(&catalog.sugar, 100)], &[&catalog.dessert]),
    )
    .await;

    let uri = format!("/api/recipes/{bread}/favorite");
    let (status, body) = app.json("POST", &uri, Some(&john), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["is_favorited"], true);

    let (status, body) = app.json("POST", &uri, Some(&john), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"], "Recipe is already in favorites");

    let (_, body) = app
        .json("GET", "/api/recipes?is_favorited=1", Some(&john), None)
        .await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["id"], bread.as_str());

    let (_, body) = app
        .json("GET", "/api/recipes?tags=dessert&tags=lunch", None, None)
        .await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (_, body) = app.json("GET", "/api/recipes?tags=dessert", None, None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["id"], cake.as_str());

    let (status, _) = app.json("DELETE", &uri, Some(&john), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app.json("DELETE", &uri, Some(&john), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"], "Recipe is not in favorites");

    let (status, _) = app
        .json("POST", "/api/recipes/unknown/favorite", Some(&john), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_subscriptions() {
    let app = common::setup_app().await;
    let catalog = seed_catalog(&app).await;
    let john = app.register("john").await;
    let albert = app.register("albert").await;

    for name in ["Bread", "Soup", "Salad"] {
        create_recipe(
            &app,
            &john,
            recipe_body(name, &[(&catalog.flour, 500)], &[&catalog.lunch]),
        )
        .await;
    }

    let uri = format!("/api/users/{john}/subscribe");
    let (status, body) = app
        .json("POST", &format!("{uri}?recipes_limit=1"), Some(&albert), None)
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["username"], "john");
    assert_eq!(body["is_subscribed"], true);
    assert_eq!(body["recipes_count"], 3);
    assert_eq!(body["recipes"].as_array().unwrap().len(), 1);
    assert_eq!(body["recipes"][0]["cooking_time"], 20);

    let (status, body) = app.json("POST", &uri, Some(&john), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"], "You cannot subscribe to yourself");

    let (status, body) = app
        .json("GET", "/api/users/subscriptions", Some(&albert), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["username"], "john");
    assert_eq!(body[0]["recipes_count"], 3);
    assert_eq!(body[0]["recipes"].as_array().unwrap().len(), 3);

    let (status, body) = app
        .json(
            "GET",
            "/api/users/subscriptions?recipes_limit=2",
            Some(&albert),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["recipes"].as_array().unwrap().len(), 2);
    assert_eq!(body[0]["recipes_count"], 3);

    let (status, _) = app
        .json(
            "GET",
            "/api/users/subscriptions?recipes_limit=many",
            Some(&albert),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.json("DELETE", &uri, Some(&albert), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app.json("DELETE", &uri, Some(&albert), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"], "You are not subscribed to this author");
}

#[tokio::test]
async fn test_user_routes() {
    let app = common::setup_app().await;
    let john = app.register("john").await;
    let albert = app.register("albert").await;

    let (status, _) = app
        .json("POST", &format!("/api/users/{john}/subscribe"), Some(&albert), None)
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app.json("GET", "/api/users", Some(&albert), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["username"], "albert");
    assert_eq!(body[0]["is_subscribed"], false);
    assert_eq!(body[1]["username"], "john");
    assert_eq!(body[1]["is_subscribed"], true);

    let (status, body) = app.json("GET", "/api/users", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[1]["is_subscribed"], false);

    let (status, body) = app
        .json("GET", &format!("/api/users/{john}"), Some(&albert), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], john.as_str());
    assert_eq!(body["email"], "john@recipebox.localhost");
    assert_eq!(body["is_subscribed"], true);

    let (status, body) = app
        .json("GET", "/api/users/01ARZ3NDEKTSV4RRFFQ69G5FAV", None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["errors"], "User not found");

    let (status, body) = app.json("GET", "/api/users/me", Some(&john), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "john");
    assert_eq!(body["is_subscribed"], false);

    let (status, _) = app.json("GET", "/api/users/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_download_shopping_cart() {
    let app = common::setup_app().await;
    let catalog = seed_catalog(&app).await;
    let john = app.register("john").await;

    let response = app
        .send("GET", "/api/recipes/download_shopping_cart", Some(&john), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(common::body_text(response).await, "");

    let a = create_recipe(
        &app,
        &john,
        recipe_body(
            "A",
            &[(&catalog.flour, 200), (&catalog.milk_ml, 250)],
            &[&catalog.lunch],
        ),
    )
    .await;
    let b = create_recipe(
        &app,
        &john,
        recipe_body(
            "B",
            &[(&catalog.flour, 150), (&catalog.sugar, 50), (&catalog.milk_l, 1)],
            &[&catalog.dessert],
        ),
    )
    .await;

    for id in [&a, &b] {
        let uri = format!("/api/recipes/{id}/shopping_cart");
        let (status, body) = app.json("POST", &uri, Some(&john), None).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["is_in_shopping_cart"], true);
    }

    let uri = format!("/api/recipes/{a}/shopping_cart");
    let (status, body) = app.json("POST", &uri, Some(&john), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"], "Recipe is already in the shopping cart");

    let response = app
        .send("GET", "/api/recipes/download_shopping_cart", Some(&john), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/plain; charset=utf-8"
    );
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"shoplist.txt\""
    );
    assert_eq!(
        common::body_text(response).await,
        "Flour - 350 g\nMilk - 1 l\nMilk - 250 ml\nSugar - 50 g"
    );

    let (status, _) = app.json("DELETE", &uri, Some(&john), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let response = app
        .send("GET", "/api/recipes/download_shopping_cart", Some(&john), None)
        .await;
    assert_eq!(
        common::body_text(response).await,
        "Flour - 150 g\nMilk - 1 l\nSugar - 50 g"
    );

    let (status, body) = app.json("DELETE", &uri, Some(&john), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"], "Recipe is not in the shopping cart");
}
