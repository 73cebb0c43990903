use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode},
};
use http_body_util::BodyExt;
use recipebox::{
    AppState,
    config::{
        Config, DatabaseConfig, ObservabilityConfig, RecipeConfig, ServerConfig, ShoppingConfig,
    },
};
use serde_json::Value;
use temp_dir::TempDir;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub state: recipebox_shared::State,
    _dir: TempDir,
}

pub fn test_config(url: String) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8000,
        },
        database: DatabaseConfig {
            url,
            max_connections: 1,
        },
        observability: ObservabilityConfig::default(),
        recipe: RecipeConfig::default(),
        shopping: ShoppingConfig::default(),
    }
}

pub async fn setup_app() -> TestApp {
    let dir = TempDir::new().unwrap();
    let url = format!("sqlite:{}", dir.child("db.sqlite3").to_str().unwrap());
    let pool = recipebox::db::create_pool(&url, 1).await.unwrap();
    recipebox::cli::run_migrations(&pool).await.unwrap();

    let state = recipebox_shared::State::single(pool);
    let router = recipebox::routes::router(AppState::new(test_config(url), state.clone()));

    TestApp {
        router,
        state,
        _dir: dir,
    }
}

impl TestApp {
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        user_id: Option<&str>,
        body: Option<Value>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(user_id) = user_id {
            builder = builder.header("X-User-Id", user_id);
        }

        let request = match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn json(
        &self,
        method: &str,
        uri: &str,
        user_id: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let response = self.send(method, uri, user_id, body).await;
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, value)
    }

    pub async fn register(&self, name: &str) -> String {
        let (status, body) = self
            .json(
                "POST",
                "/api/users",
                None,
                Some(serde_json::json!({
                    "email": format!("{name}@recipebox.localhost"),
                    "username": name,
                    "first_name": "John",
                    "last_name": "Doe",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);

        body["id"].as_str().unwrap().to_owned()
    }
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();

    String::from_utf8(bytes.to_vec()).unwrap()
}
