//! Google OAuth session: installed-app loopback flow, token storage and
//! refresh-on-expiry.
//!
//! Tokens live in ~/.config/classcal/session.toml (owner-only). The core
//! importer never sees any of this; it only receives a sink that already
//! holds a valid access token.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;

use crate::config::{self, GoogleConfig};

const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const SCOPE: &str = "https://www.googleapis.com/auth/calendar";
const REDIRECT_PORT: u16 = 8286;
const REDIRECT_URI: &str = "http://localhost:8286/callback";

pub struct Session {
    data: SessionData,
}

#[derive(Serialize, Deserialize, Clone)]
struct SessionData {
    access_token: String,
    refresh_token: String,
    expires_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: String,
    expires_in: i64,
}

impl From<TokenResponse> for SessionData {
    fn from(tokens: TokenResponse) -> Self {
        SessionData {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_at: Utc::now() + Duration::seconds(tokens.expires_in),
        }
    }
}

impl Session {
    pub fn access_token(&self) -> &str {
        &self.data.access_token
    }

    /// Load the stored session, refreshing once if the access token has
    /// expired. Fails (before any row is processed) when no session exists.
    pub async fn load_valid(google: &GoogleConfig) -> Result<Self> {
        let mut session = Self::load()?;

        if session.is_expired() {
            log::debug!("access token expired, refreshing");
            session.refresh(google).await?;
        }

        Ok(session)
    }

    fn load() -> Result<Self> {
        let path = config::session_path()?;

        if !path.exists() {
            anyhow::bail!(
                "No Google session found at {}\n\
                Run `classcal auth` first.",
                path.display()
            );
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read session from {}", path.display()))?;

        let data: SessionData = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse session from {}", path.display()))?;

        Ok(Session { data })
    }

    fn save(&self) -> Result<()> {
        let contents = toml::to_string_pretty(&self.data).context("Failed to serialize session")?;

        let path = config::session_path()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write session to {}", path.display()))?;

        // Set to owner-only (0600) since the file contains OAuth tokens:
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("Failed to set permissions on {}", path.display()))?;
        }

        Ok(())
    }

    fn is_expired(&self) -> bool {
        Utc::now() >= self.data.expires_at
    }

    async fn refresh(&mut self, google: &GoogleConfig) -> Result<()> {
        let client = reqwest::Client::new();

        let response = client
            .post(TOKEN_URL)
            .form(&[
                ("client_id", google.client_id.as_str()),
                ("client_secret", google.client_secret.as_str()),
                ("refresh_token", self.data.refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .context("Failed to send token refresh request")?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!(
                "Failed to refresh token: {}\n\
                Run `classcal auth` to re-authenticate.",
                error_text
            );
        }

        let tokens: TokenResponse = response
            .json()
            .await
            .context("Failed to parse token refresh response")?;

        // Google typically doesn't return a new refresh_token on refresh
        let refresh_token = if tokens.refresh_token.is_empty() {
            self.data.refresh_token.clone()
        } else {
            tokens.refresh_token.clone()
        };

        self.data = SessionData::from(tokens);
        self.data.refresh_token = refresh_token;
        self.save()?;

        Ok(())
    }
}

/// Run the full OAuth consent flow and store the resulting session.
pub async fn authenticate(google: &GoogleConfig) -> Result<()> {
    let auth_url = url::Url::parse_with_params(
        AUTH_URL,
        &[
            ("client_id", google.client_id.as_str()),
            ("redirect_uri", REDIRECT_URI),
            ("response_type", "code"),
            ("scope", SCOPE),
            ("access_type", "offline"),
            ("prompt", "consent"),
        ],
    )
    .context("Failed to build consent URL")?;

    eprintln!("\nOpen this URL in your browser to authenticate:\n");
    eprintln!("{}\n", auth_url);

    // Try to open the browser automatically
    if open::that(auth_url.as_str()).is_err() {
        eprintln!("(Could not open browser automatically, please copy the URL above)");
    }

    let code = wait_for_callback()?;

    eprintln!("\nReceived authorization code, exchanging for tokens...");

    let client = reqwest::Client::new();
    let response = client
        .post(TOKEN_URL)
        .form(&[
            ("client_id", google.client_id.as_str()),
            ("client_secret", google.client_secret.as_str()),
            ("code", code.as_str()),
            ("redirect_uri", REDIRECT_URI),
            ("grant_type", "authorization_code"),
        ])
        .send()
        .await
        .context("Failed to exchange code for tokens")?;

    if !response.status().is_success() {
        let error_text = response.text().await.unwrap_or_default();
        anyhow::bail!("Token exchange failed: {}", error_text);
    }

    let tokens: TokenResponse = response
        .json()
        .await
        .context("Failed to parse token response")?;

    if tokens.refresh_token.is_empty() {
        anyhow::bail!(
            "Google did not return a refresh token.\n\
            Revoke access at https://myaccount.google.com/permissions and retry."
        );
    }

    let session = Session {
        data: SessionData::from(tokens),
    };
    session.save()?;

    eprintln!("Authentication successful!");

    Ok(())
}

/// Start a local HTTP server to receive the OAuth callback
fn wait_for_callback() -> Result<String> {
    let listener = TcpListener::bind(format!("127.0.0.1:{}", REDIRECT_PORT))
        .with_context(|| format!("Failed to bind to port {}", REDIRECT_PORT))?;

    eprintln!("Waiting for OAuth callback on port {}...", REDIRECT_PORT);

    let (mut stream, _) = listener.accept().context("Failed to accept connection")?;

    let mut reader = BufReader::new(&stream);
    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;

    // Parse the request to get the authorization code
    let url_part = request_line
        .split_whitespace()
        .nth(1)
        .context("Invalid request")?;

    let url = url::Url::parse(&format!("http://localhost{}", url_part))?;

    let code = url
        .query_pairs()
        .find(|(k, _)| k == "code")
        .map(|(_, v)| v.to_string())
        .context("No code in callback")?;

    // Send a response to the browser
    let response = "HTTP/1.1 200 OK\r\n\
        Content-Type: text/html\r\n\
        Connection: close\r\n\
        \r\n\
        <html><body>\
        <h1>Authentication successful!</h1>\
        <p>You can close this window and return to the terminal.</p>\
        </body></html>";

    stream.write_all(response.as_bytes())?;
    stream.flush()?;

    Ok(code)
}
