use anyhow::{anyhow, Result};
use budget_analyzer::stat::{Budget, Dashboard};
use reqwest::{Client, Response, Url};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResp {
    pub token: String,
    pub username: String,
}

#[derive(Debug, Deserialize)]
struct PresetList {
    presets: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ServerError {
    error: String,
}

fn endpoint(base_url: &str, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(base_url)?;
    url.path_segments_mut()
        .map_err(|_| anyhow!("{base_url} cannot be a base URL"))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Turn a non-2xx response into an error carrying the server's message.
async fn check(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let text = resp.text().await.unwrap_or_default();
    let msg = serde_json::from_str::<ServerError>(&text)
        .map(|e| e.error)
        .unwrap_or(text);
    if msg.is_empty() {
        Err(anyhow!("server returned {status}"))
    } else {
        Err(anyhow!("{msg}"))
    }
}

pub async fn register(base_url: &str, username: &str, password: &str) -> Result<()> {
    let resp = Client::new()
        .post(endpoint(base_url, &["auth", "register"])?)
        .json(&Credentials { username, password })
        .send()
        .await?;
    check(resp).await?;
    Ok(())
}

pub async fn login(base_url: &str, username: &str, password: &str) -> Result<LoginResp> {
    let resp = Client::new()
        .post(endpoint(base_url, &["auth", "login"])?)
        .json(&Credentials { username, password })
        .send()
        .await?;
    Ok(check(resp).await?.json().await?)
}

pub async fn download_budget(base_url: &str, token: &str) -> Result<Budget> {
    let resp = Client::new()
        .get(endpoint(base_url, &["budget"])?)
        .bearer_auth(token)
        .send()
        .await?;
    Ok(check(resp).await?.json().await?)
}

pub async fn upload_budget(base_url: &str, token: &str, budget: &Budget) -> Result<Budget> {
    let resp = Client::new()
        .put(endpoint(base_url, &["budget"])?)
        .bearer_auth(token)
        .json(budget)
        .send()
        .await?;
    Ok(check(resp).await?.json().await?)
}

pub async fn reset_budget(base_url: &str, token: &str) -> Result<Budget> {
    let resp = Client::new()
        .post(endpoint(base_url, &["budget", "reset"])?)
        .bearer_auth(token)
        .send()
        .await?;
    Ok(check(resp).await?.json().await?)
}

pub async fn download_dashboard(base_url: &str, token: &str) -> Result<Dashboard> {
    let resp = Client::new()
        .get(endpoint(base_url, &["dashboard"])?)
        .bearer_auth(token)
        .send()
        .await?;
    Ok(check(resp).await?.json().await?)
}

pub async fn list_presets(base_url: &str, token: &str) -> Result<Vec<String>> {
    let resp = Client::new()
        .get(endpoint(base_url, &["presets"])?)
        .bearer_auth(token)
        .send()
        .await?;
    let list: PresetList = check(resp).await?.json().await?;
    Ok(list.presets)
}

pub async fn save_preset(base_url: &str, token: &str, name: &str, budget: &Budget) -> Result<()> {
    let resp = Client::new()
        .put(endpoint(base_url, &["presets", name])?)
        .bearer_auth(token)
        .json(budget)
        .send()
        .await?;
    check(resp).await?;
    Ok(())
}

pub async fn load_preset(base_url: &str, token: &str, name: &str) -> Result<Budget> {
    let resp = Client::new()
        .post(endpoint(base_url, &["presets", name, "load"])?)
        .bearer_auth(token)
        .send()
        .await?;
    Ok(check(resp).await?.json().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_and_escapes_segments() {
        let url = endpoint("http://127.0.0.1:8080", &["presets", "My Plan", "load"]).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/presets/My%20Plan/load");

        let url = endpoint("http://host/api/", &["budget"]).unwrap();
        assert_eq!(url.as_str(), "http://host/api/budget");

        let url = endpoint("http://host", &["presets", "a/b"]).unwrap();
        assert_eq!(url.as_str(), "http://host/presets/a%2Fb");
    }

    #[test]
    fn endpoint_rejects_bad_base() {
        assert!(endpoint("not a url", &["budget"]).is_err());
        assert!(endpoint("mailto:me@example.com", &["budget"]).is_err());
    }
}
