//! End-to-end tests against a live server on an ephemeral port, backed by an
//! in-memory SQLite database and a stub predictor.

use std::sync::Arc;

use anyhow::Result;
use reqwest::{header, redirect, Client, StatusCode};
use serde::Deserialize;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

use event_advisor::{
    routes, schema, AdvisoryCatalog, AppContext, EventPredictor, GatewayError, PredictionRequest,
};

/// Fixed location -> label table. "Springfield" yields a label the catalog
/// does not know.
struct StubPredictor {
    locations: Vec<String>,
}

impl StubPredictor {
    fn new() -> Self {
        Self {
            locations: vec!["Chennai".into(), "Delhi".into(), "Springfield".into()],
        }
    }
}

impl EventPredictor for StubPredictor {
    fn locations(&self) -> &[String] {
        &self.locations
    }

    fn predict(&self, request: &PredictionRequest) -> Result<String, GatewayError> {
        match request.location() {
            "Chennai" => Ok("cyclone".into()),
            "Delhi" => Ok("protest".into()),
            "Springfield" => Ok("meteor shower".into()),
            other => Err(GatewayError::UnknownLocation(other.into())),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PredictionBody {
    prediction: String,
    recommendation: Vec<String>,
    emergency_number: String,
    severity: String,
    precaution: String,
    locations: Vec<String>,
}

struct TestApp {
    base: String,
    client: Client,
    pool: SqlitePool,
}

async fn spawn_app() -> Result<TestApp> {
    // ---
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;
    schema::create_schema(&pool).await?;

    let ctx = AppContext::new(pool.clone(), Arc::new(StubPredictor::new()));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        axum::serve(listener, routes::router(ctx)).await.ok();
    });

    let client = Client::builder().redirect(redirect::Policy::none()).build()?;
    Ok(TestApp {
        base: format!("http://{}", addr),
        client,
        pool,
    })
}

impl TestApp {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn signup(&self, username: &str, password: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(self.url("/signup"))
            .form(&[("username", username), ("password", password)])
            .send()
            .await?)
    }

    async fn login(&self, username: &str, password: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(self.url("/login"))
            .form(&[("username", username), ("password", password)])
            .send()
            .await?)
    }

    /// Sign up and log in, returning the `Cookie` header value to send.
    async fn session(&self, username: &str, password: &str) -> Result<String> {
        // ---
        self.signup(username, password).await?;
        let resp = self.login(username, password).await?;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);

        let set_cookie = resp
            .headers()
            .get(header::SET_COOKIE)
            .expect("login should set a cookie")
            .to_str()?;
        Ok(set_cookie.split(';').next().unwrap_or_default().to_string())
    }

    async fn predict_form(&self, cookie: &str, date: &str, location: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(self.url("/index"))
            .header(header::COOKIE, cookie)
            .form(&[("date", date), ("location", location)])
            .send()
            .await?)
    }
}

fn location_of(resp: &reqwest::Response) -> Option<&str> {
    resp.headers().get(header::LOCATION)?.to_str().ok()
}

// ---

#[tokio::test]
async fn index_requires_login() -> Result<()> {
    // ---
    let app = spawn_app().await?;

    let resp = app.client.get(app.url("/index")).send().await?;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location_of(&resp), Some("/login"));

    let resp = app
        .client
        .get(app.url("/index"))
        .header(header::COOKIE, "session=forged-token")
        .send()
        .await?;
    assert_eq!(location_of(&resp), Some("/login"));

    Ok(())
}

#[tokio::test]
async fn signup_then_login_then_predict() -> Result<()> {
    // ---
    let app = spawn_app().await?;

    let resp = app.signup("asha", "secret").await?;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location_of(&resp), Some("/login?registered=1"));

    let page = app
        .client
        .get(app.url("/login?registered=1"))
        .send()
        .await?
        .text()
        .await?;
    assert!(page.contains("Signup successful! Please login."));

    let resp = app.login("asha", "secret").await?;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location_of(&resp), Some("/index"));
    let cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .expect("session cookie")
        .to_str()?
        .split(';')
        .next()
        .unwrap_or_default()
        .to_string();

    let form = app
        .client
        .get(app.url("/index"))
        .header(header::COOKIE, &cookie)
        .send()
        .await?;
    assert_eq!(form.status(), StatusCode::OK);
    let form = form.text().await?;
    assert!(form.contains(r#"<option value="Chennai">Chennai</option>"#));
    assert!(form.contains("Signed in as asha"));

    let resp = app.predict_form(&cookie, "2024-06-15", "Chennai").await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let page = resp.text().await?;

    let catalog = AdvisoryCatalog::new();
    let cyclone = catalog.get("cyclone").expect("cyclone is catalogued");
    assert!(page.contains(r#"<span id="prediction">cyclone</span>"#));
    for rec in cyclone.recommendations {
        assert!(page.contains(&format!("<li>{}</li>", rec)), "missing '{}'", rec);
    }
    assert!(page.contains(&format!(
        r#"<span id="emergency_number">{}</span>"#,
        cyclone.emergency_number
    )));
    assert!(page.contains(&format!(r#"<span id="severity">{}</span>"#, cyclone.severity)));
    assert!(page.contains(&format!(r#"<span id="precaution">{}</span>"#, cyclone.precaution)));

    Ok(())
}

#[tokio::test]
async fn duplicate_signup_is_reported_and_not_stored() -> Result<()> {
    // ---
    let app = spawn_app().await?;

    app.signup("ravi", "one").await?;
    let resp = app.signup("ravi", "two").await?;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert!(resp.text().await?.contains("Username already exists. Try another."));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ?")
        .bind("ravi")
        .fetch_one(&app.pool)
        .await?;
    assert_eq!(count, 1);

    // The first password still works
    assert_eq!(app.login("ravi", "one").await?.status(), StatusCode::SEE_OTHER);

    Ok(())
}

#[tokio::test]
async fn bad_credentials_give_one_generic_message() -> Result<()> {
    // ---
    let app = spawn_app().await?;
    app.signup("meera", "right").await?;

    let wrong_password = app.login("meera", "wrong").await?;
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert!(wrong_password.headers().get(header::SET_COOKIE).is_none());
    let wrong_password = wrong_password.text().await?;

    let wrong_user = app.login("nobody", "right").await?;
    assert_eq!(wrong_user.status(), StatusCode::UNAUTHORIZED);
    let wrong_user = wrong_user.text().await?;

    assert!(wrong_password.contains("Invalid credentials. Try again."));
    assert_eq!(wrong_password, wrong_user);

    Ok(())
}

#[tokio::test]
async fn unknown_label_renders_fallback() -> Result<()> {
    // ---
    let app = spawn_app().await?;
    let cookie = app.session("lee", "pw").await?;

    let resp = app.predict_form(&cookie, "2024-06-15", "Springfield").await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let page = resp.text().await?;

    assert!(page.contains(r#"<span id="prediction">meteor shower</span>"#));
    assert!(page.contains("<li>No recommendation available.</li>"));
    assert!(page.contains(r#"<span id="emergency_number">N/A</span>"#));
    assert!(page.contains(r#"<span id="severity">N/A</span>"#));
    assert!(page.contains(r#"<span id="precaution">N/A</span>"#));

    Ok(())
}

#[tokio::test]
async fn invalid_input_is_a_bad_request() -> Result<()> {
    // ---
    let app = spawn_app().await?;
    let cookie = app.session("kim", "pw").await?;

    for (date, location) in [
        ("2024-02-30", "Chennai"),
        ("15/06/2024", "Chennai"),
        ("2024-06-15", "Atlantis"),
    ] {
        let resp = app.predict_form(&cookie, date, location).await?;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{} {}", date, location);
        let page = resp.text().await?;
        assert!(page.contains("Unsupported input"));
        assert!(!page.contains("id=\"result\""));
    }

    Ok(())
}

#[tokio::test]
async fn json_api_matches_rendering_boundary() -> Result<()> {
    // ---
    let app = spawn_app().await?;
    let body = serde_json::json!({ "date": "2024-06-15", "location": "Delhi" });

    let resp = app.client.post(app.url("/api/predict")).json(&body).send().await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let cookie = app.session("zoe", "pw").await?;
    let resp = app
        .client
        .post(app.url("/api/predict"))
        .header(header::COOKIE, &cookie)
        .json(&body)
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let got: PredictionBody = resp.json().await?;

    assert_eq!(got.prediction, "protest");
    assert_eq!(got.recommendation.len(), 5);
    assert_eq!(got.recommendation[0], "Avoid participating if unsafe.");
    assert_eq!(got.emergency_number, "100");
    assert_eq!(got.severity, "Medium");
    assert_eq!(
        got.precaution,
        "Stay informed about protest plans and traffic diversions."
    );
    assert_eq!(got.locations, vec!["Chennai", "Delhi", "Springfield"]);

    let bad = serde_json::json!({ "date": "2024-13-01", "location": "Delhi" });
    let resp = app
        .client
        .post(app.url("/api/predict"))
        .header(header::COOKIE, &cookie)
        .json(&bad)
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn malformed_json_body_is_checked_after_login() -> Result<()> {
    // ---
    let app = spawn_app().await?;
    let missing_location = serde_json::json!({ "date": "2024-06-15" });

    // No session: 401 even though the body is broken
    let resp = app
        .client
        .post(app.url("/api/predict"))
        .json(&missing_location)
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let cookie = app.session("ana", "pw").await?;
    let resp = app
        .client
        .post(app.url("/api/predict"))
        .header(header::COOKIE, &cookie)
        .json(&missing_location)
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = resp.json().await?;
    assert!(body["error"].is_string());

    let resp = app
        .client
        .post(app.url("/api/predict"))
        .header(header::COOKIE, &cookie)
        .header(header::CONTENT_TYPE, "application/json")
        .body("not json")
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = resp.json().await?;
    assert!(body["error"].is_string());

    Ok(())
}

#[tokio::test]
async fn form_missing_location_rerenders_index() -> Result<()> {
    // ---
    let app = spawn_app().await?;
    let cookie = app.session("omar", "pw").await?;

    let resp = app
        .client
        .post(app.url("/index"))
        .header(header::COOKIE, &cookie)
        .form(&[("date", "2024-06-15")])
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("text/html")));

    let page = resp.text().await?;
    assert!(page.contains("Unsupported input"));
    assert!(page.contains(r#"<option value="Chennai">Chennai</option>"#));
    assert!(!page.contains("id=\"result\""));

    Ok(())
}

#[tokio::test]
async fn logout_ends_the_session() -> Result<()> {
    // ---
    let app = spawn_app().await?;
    let cookie = app.session("sam", "pw").await?;

    let resp = app
        .client
        .get(app.url("/logout"))
        .header(header::COOKIE, &cookie)
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location_of(&resp), Some("/"));

    let resp = app
        .client
        .get(app.url("/index"))
        .header(header::COOKIE, &cookie)
        .send()
        .await?;
    assert_eq!(location_of(&resp), Some("/login"));

    Ok(())
}

#[tokio::test]
async fn health_and_locations() -> Result<()> {
    // ---
    let app = spawn_app().await?;

    let health: serde_json::Value = app.client.get(app.url("/health")).send().await?.json().await?;
    assert_eq!(health["status"], "ok");
    assert_eq!(health["locations"], 3);
    assert_eq!(health["advisories"], 20);

    let locations: Vec<String> = app
        .client
        .get(app.url("/api/locations"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(locations, vec!["Chennai", "Delhi", "Springfield"]);

    Ok(())
}
