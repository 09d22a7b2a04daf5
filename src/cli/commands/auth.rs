use crate::cli::client::ApiClient;
use crate::cli::utils::{output_failure, output_success};
use crate::cli::OutputFormat;

pub async fn login(
    client: &ApiClient,
    username: &str,
    password: &str,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let response = client.login(username, password).await?;

    if response["success"].as_bool().unwrap_or(false) {
        let user = &response["user"];
        let message = format!(
            "Logged in as {} (mandal: {}, role: {})",
            user["username"].as_str().unwrap_or(username),
            user["mandal"].as_str().unwrap_or_default(),
            user["role"].as_str().unwrap_or_default(),
        );
        output_success(&output_format, &message, Some(response.clone()))
    } else {
        let message = response["message"].as_str().unwrap_or("Login failed");
        Err(output_failure(&output_format, message, "LOGIN_FAILED"))
    }
}
