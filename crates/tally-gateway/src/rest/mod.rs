//! Platform client over the HTTP API (v10)
//!
//! Every call is a single request; failures are mapped onto
//! [`PlatformError`] and never retried here.

mod wire;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use tally_common::DiscordConfig;
use tally_core::{
    FetchedImage, GuildInfo, GuildMember, GuildRole, MessageBody, Platform, PlatformError,
    PlatformResult, ProfileUpdate, Snowflake,
};

use wire::{
    WireApplicationUpdate, WireCreated, WireMember, WireMessage, WireMessageAuthor, WireRateLimit,
    WireUserUpdate,
};

/// REST client settings
#[derive(Clone)]
pub struct RestConfig {
    pub token: String,
    /// Base URL without a trailing slash, e.g. `https://discord.com/api/v10`
    pub api_base: String,
    pub timeout: Duration,
}

impl From<&DiscordConfig> for RestConfig {
    fn from(config: &DiscordConfig) -> Self {
        Self {
            token: config.token.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(config.request_timeout_secs),
        }
    }
}

impl std::fmt::Debug for RestConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestConfig")
            .field("api_base", &self.api_base)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// [`Platform`] implementation backed by reqwest
#[derive(Clone)]
pub struct RestPlatform {
    client: Client,
    api_base: String,
    authorization: String,
}

impl RestPlatform {
    /// Build the client
    ///
    /// # Errors
    /// Returns `PlatformError::Request` if the HTTP client cannot be built
    pub fn new(config: RestConfig) -> PlatformResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("DiscordBot (tally, ", env!("CARGO_PKG_VERSION"), ")"))
            .build()
            .map_err(|e| PlatformError::Request(e.to_string()))?;

        Ok(Self {
            client,
            api_base: config.api_base,
            authorization: format!("Bot {}", config.token),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{path}", self.api_base))
            .header(reqwest::header::AUTHORIZATION, &self.authorization)
    }

    async fn send(&self, request: RequestBuilder) -> PlatformResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| PlatformError::Request(e.to_string()))?;
        check(response).await
    }

    async fn json<T: DeserializeOwned>(&self, request: RequestBuilder) -> PlatformResult<T> {
        self.send(request)
            .await?
            .json::<T>()
            .await
            .map_err(|e| PlatformError::Decode(e.to_string()))
    }
}

impl std::fmt::Debug for RestPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestPlatform")
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

/// Map a non-success status onto a platform error
async fn check(response: Response) -> PlatformResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().path().to_string();
    match status {
        StatusCode::NOT_FOUND => Err(PlatformError::NotFound(url)),
        StatusCode::FORBIDDEN | StatusCode::UNAUTHORIZED => Err(PlatformError::Forbidden(url)),
        StatusCode::TOO_MANY_REQUESTS => {
            let retry_after_ms = response
                .json::<WireRateLimit>()
                .await
                .map(|body| (body.retry_after * 1000.0).ceil() as u64)
                .unwrap_or_default();
            Err(PlatformError::RateLimited { retry_after_ms })
        }
        _ => {
            let body = response.text().await.unwrap_or_default();
            Err(PlatformError::Request(format!("{status} on {url}: {body}")))
        }
    }
}

#[async_trait]
impl Platform for RestPlatform {
    #[instrument(skip(self, body))]
    async fn create_message(&self, channel_id: Snowflake, body: &MessageBody) -> PlatformResult<Snowflake> {
        let created: WireCreated = self
            .json(
                self.request(Method::POST, &format!("/channels/{channel_id}/messages"))
                    .json(&WireMessage::from(body)),
            )
            .await?;
        debug!(channel_id = %channel_id, message_id = %created.id, "Message created");
        Ok(created.id)
    }

    #[instrument(skip(self, body))]
    async fn edit_message(&self, channel_id: Snowflake, message_id: Snowflake, body: &MessageBody) -> PlatformResult<()> {
        self.send(
            self.request(Method::PATCH, &format!("/channels/{channel_id}/messages/{message_id}"))
                .json(&WireMessage::from(body)),
        )
        .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_message(&self, channel_id: Snowflake, message_id: Snowflake) -> PlatformResult<()> {
        self.send(self.request(Method::DELETE, &format!("/channels/{channel_id}/messages/{message_id}")))
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn message_author(&self, channel_id: Snowflake, message_id: Snowflake) -> PlatformResult<Snowflake> {
        let message: WireMessageAuthor = self
            .json(self.request(Method::GET, &format!("/channels/{channel_id}/messages/{message_id}")))
            .await?;
        Ok(message.author.id)
    }

    #[instrument(skip(self))]
    async fn get_roles(&self, guild_id: Snowflake) -> PlatformResult<Vec<GuildRole>> {
        self.json(self.request(Method::GET, &format!("/guilds/{guild_id}/roles")))
            .await
    }

    #[instrument(skip(self))]
    async fn get_member(&self, guild_id: Snowflake, user_id: Snowflake) -> PlatformResult<GuildMember> {
        let member: WireMember = self
            .json(self.request(Method::GET, &format!("/guilds/{guild_id}/members/{user_id}")))
            .await?;
        Ok(member.into())
    }

    #[instrument(skip(self))]
    async fn get_guild(&self, guild_id: Snowflake) -> PlatformResult<GuildInfo> {
        self.json(self.request(Method::GET, &format!("/guilds/{guild_id}")))
            .await
    }

    #[instrument(skip(self))]
    async fn get_emoji(&self, guild_id: Snowflake, emoji_id: Snowflake) -> PlatformResult<()> {
        self.send(self.request(Method::GET, &format!("/guilds/{guild_id}/emojis/{emoji_id}")))
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn add_member_role(&self, guild_id: Snowflake, user_id: Snowflake, role_id: Snowflake) -> PlatformResult<()> {
        self.send(self.request(
            Method::PUT,
            &format!("/guilds/{guild_id}/members/{user_id}/roles/{role_id}"),
        ))
        .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove_member_role(&self, guild_id: Snowflake, user_id: Snowflake, role_id: Snowflake) -> PlatformResult<()> {
        self.send(self.request(
            Method::DELETE,
            &format!("/guilds/{guild_id}/members/{user_id}/roles/{role_id}"),
        ))
        .await?;
        Ok(())
    }

    /// Plain GET outside the API; the bot token never leaves for other hosts
    #[instrument(skip(self))]
    async fn fetch_image(&self, url: &str) -> PlatformResult<FetchedImage> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PlatformError::Request(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(PlatformError::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let data = response
            .bytes()
            .await
            .map_err(|e| PlatformError::Request(e.to_string()))?;
        debug!(bytes = data.len(), content_type = ?content_type, "Image fetched");
        Ok(FetchedImage {
            data: data.to_vec(),
            content_type,
        })
    }

    #[instrument(skip(self))]
    async fn update_current_user(&self, update: &ProfileUpdate) -> PlatformResult<()> {
        self.send(
            self.request(Method::PATCH, "/users/@me")
                .json(&WireUserUpdate::from(update)),
        )
        .await?;
        Ok(())
    }

    #[instrument(skip(self, description))]
    async fn update_application_description(&self, description: &str) -> PlatformResult<()> {
        self.send(
            self.request(Method::PATCH, "/applications/@me")
                .json(&WireApplicationUpdate { description }),
        )
        .await?;
        Ok(())
    }
}
