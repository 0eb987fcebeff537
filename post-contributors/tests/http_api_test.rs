//! HTTP API tests against a server bound to an ephemeral port.

use post_contributors::{ContributorsConfig, ContributorsServer};
use serde_json::{json, Value};
use tokio::net::TcpListener;

const USERS: &str = r#"
[token]
secret = "http-test-secret"

[display]
site_url = "https://blog.example.com"
heading = "Contributors:"

[storage]
in_memory = true

[[users]]
id = 1
display_name = "Root"
email = "root@example.com"
capabilities = ["editor"]

[[users]]
id = 3
display_name = "Ada"
email = "ada@example.com"
capabilities = ["author"]

[[users]]
id = 7
display_name = "Grace"
email = "grace@example.com"
capabilities = ["author"]

[[users]]
id = 9
display_name = "Sub"
capabilities = ["subscriber"]
"#;

/// Starts a server and returns its base URL.
async fn spawn_server(extra: &str) -> String {
    let config = ContributorsConfig::from_toml_str(&format!("{extra}\n{USERS}")).unwrap();
    let server = ContributorsServer::new(config).unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { server.serve(listener).await });

    format!("http://{addr}")
}

async fn form_token(client: &reqwest::Client, base: &str, item: &str, identity: &str) -> String {
    let form: Value = client
        .get(format!("{base}/content/{item}/contributors/form"))
        .header("x-identity-id", identity)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    form["form"]["token"].as_str().unwrap().to_string()
}

async fn submit(
    client: &reqwest::Client,
    base: &str,
    item: &str,
    identity: &str,
    body: Value,
) -> reqwest::Response {
    client
        .post(format!("{base}/content/{item}/contributors"))
        .header("x-identity-id", identity)
        .json(&body)
        .send()
        .await
        .unwrap()
}

async fn stored_ids(client: &reqwest::Client, base: &str, item: &str) -> Value {
    let body: Value = client
        .get(format!("{base}/content/{item}/contributors"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    body["contributor_ids"].clone()
}

#[tokio::test]
async fn test_health() {
    let base = spawn_server("").await;
    let body = reqwest::get(format!("{base}/health"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn test_list_eligible_contributors() {
    let base = spawn_server("").await;
    let body: Value = reqwest::get(format!("{base}/contributors"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(
        body,
        json!([
            { "id": 3, "display_name": "Ada" },
            { "id": 7, "display_name": "Grace" }
        ])
    );
}

#[tokio::test]
async fn test_edit_and_clear_flow() {
    let base = spawn_server("").await;
    let client = reqwest::Client::new();
    let token = form_token(&client, &base, "42", "1").await;

    let body = json!({ "token": token, "author": ["3", "7"] });
    let resp = submit(&client, &base, "42", "1", body).await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["outcome"], "stored");
    assert_eq!(stored_ids(&client, &base, "42").await, json!([3, 7]));

    // omitted field leaves the association alone
    let resp = submit(&client, &base, "42", "1", json!({ "token": token })).await;
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["outcome"], "no_submission");
    assert_eq!(stored_ids(&client, &base, "42").await, json!([3, 7]));

    // empty list clears
    let resp = submit(&client, &base, "42", "1", json!({ "token": token, "author": [] })).await;
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["outcome"], "stored");
    assert_eq!(stored_ids(&client, &base, "42").await, json!([]));
}

#[tokio::test]
async fn test_form_marks_current_contributors() {
    let base = spawn_server("").await;
    let client = reqwest::Client::new();
    let token = form_token(&client, &base, "5", "1").await;
    submit(&client, &base, "5", "1", json!({ "token": token, "author": ["7"] })).await;

    let form: Value = client
        .get(format!("{base}/content/5/contributors/form"))
        .header("x-identity-id", "1")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let options = form["form"]["options"].as_array().unwrap();
    assert_eq!(options.len(), 2);
    assert_eq!(options[0]["checked"], false);
    assert_eq!(options[1]["checked"], true);
    assert!(form["html"]
        .as_str()
        .unwrap()
        .contains("name=\"contributor_checkbox_nonce\""));
}

#[tokio::test]
async fn test_invalid_token_is_silently_ignored() {
    let base = spawn_server("").await;
    let client = reqwest::Client::new();
    let token = form_token(&client, &base, "42", "1").await;
    submit(&client, &base, "42", "1", json!({ "token": token, "author": ["3", "7"] })).await;

    let body = json!({ "token": "forged", "author": ["7"] });
    let resp = submit(&client, &base, "42", "1", body).await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["outcome"], "stored");
    assert!(body.get("error").is_none());
    assert_eq!(body["contributor_ids"], json!([3, 7]));
    assert_eq!(stored_ids(&client, &base, "42").await, json!([3, 7]));
}

#[tokio::test]
async fn test_explicit_denial_policy_returns_forbidden() {
    let base = spawn_server("[association]\non_denied = \"explicit_error\"\n").await;
    let client = reqwest::Client::new();

    let resp = submit(&client, &base, "42", "1", json!({ "author": ["3"] })).await;
    assert_eq!(resp.status(), 403);
    assert_eq!(stored_ids(&client, &base, "42").await, json!([]));
}

#[tokio::test]
async fn test_unknown_identity_is_unauthorized() {
    let base = spawn_server("").await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{base}/content/42/contributors/form"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);

    let resp = client
        .get(format!("{base}/content/42/contributors/form"))
        .header("x-identity-id", "404")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn test_owner_may_edit_own_item() {
    let base = spawn_server("").await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{base}/content/77/contributors/form"))
        .header("x-identity-id", "3")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);

    // only editors assign owners
    let resp = client
        .put(format!("{base}/content/77/owner"))
        .header("x-identity-id", "3")
        .json(&json!({ "owner": 3 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);

    let resp = client
        .put(format!("{base}/content/77/owner"))
        .header("x-identity-id", "1")
        .json(&json!({ "owner": 3 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 204);

    let token = form_token(&client, &base, "77", "3").await;
    let resp = submit(&client, &base, "77", "3", json!({ "token": token, "author": ["3"] })).await;
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["outcome"], "stored");
    assert_eq!(stored_ids(&client, &base, "77").await, json!([3]));
}

#[tokio::test]
async fn test_view_and_render() {
    let base = spawn_server("").await;
    let client = reqwest::Client::new();
    let token = form_token(&client, &base, "42", "1").await;
    submit(&client, &base, "42", "1", json!({ "token": token, "author": ["7", "3"] })).await;

    let views: Value = client
        .get(format!("{base}/content/42/contributors/view"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(views[0]["display_name"], "Grace");
    assert_eq!(views[0]["profile_url"], "https://blog.example.com/author/7");
    assert_eq!(views[1]["display_name"], "Ada");

    let rendered: Value = client
        .post(format!("{base}/content/42/render"))
        .json(&json!({ "content": "<p>Body</p>", "singular": true }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let content = rendered["content"].as_str().unwrap();
    assert!(content.starts_with("<p>Body</p><p><span>Contributors:</span></p>"));
    assert!(content.contains("Grace"));

    let listing: Value = client
        .post(format!("{base}/content/42/render"))
        .json(&json!({ "content": "<p>Body</p>", "singular": false }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listing["content"], "<p>Body</p>");

    let empty: Value = client
        .post(format!("{base}/content/43/render"))
        .json(&json!({ "content": "<p>Other</p>", "singular": true }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(empty["content"], "<p>Other</p>");
}
