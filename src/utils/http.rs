// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::{AppError, Result};
use crate::models::{AuthContext, ClientConfig};

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &ClientConfig) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder().user_agent(&config.user_agent);
    if config.timeout_secs > 0 {
        builder = builder.timeout(Duration::from_secs(config.timeout_secs));
    }
    Ok(builder.build()?)
}

/// Attach the bearer token, send, and classify the status.
///
/// 404 becomes [`AppError::NotFound`], any other non-success status
/// becomes [`AppError::Status`].
pub async fn send_authorized(request: RequestBuilder, auth: &AuthContext) -> Result<Response> {
    let response = request
        .header(reqwest::header::AUTHORIZATION, auth.bearer())
        .send()
        .await?;
    check_status(response)
}

/// Send and decode a JSON body.
pub async fn fetch_json<T: DeserializeOwned>(
    request: RequestBuilder,
    auth: &AuthContext,
) -> Result<T> {
    let response = send_authorized(request, auth).await?;
    Ok(response.json::<T>().await?)
}

fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(AppError::not_found(response.url().path()));
    }
    if !status.is_success() {
        return Err(AppError::status(status.as_u16(), response.url()));
    }
    Ok(response)
}
