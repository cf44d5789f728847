//! Typed HTTP client for the duel API.

use crate::http::{ErrorBody, GuessRequest, GuessResponse, NewGameResponse, RawPlayerId, RoundSummary};
use anyhow::{Context, Result, bail};
use number_duel_core::PlayerView;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument};

/// Client for a running duel server.
#[derive(Debug, Clone)]
pub struct DuelClient {
    base_url: String,
    client: reqwest::Client,
}

impl DuelClient {
    /// Creates a client for the server at `base_url`.
    #[instrument(skip_all, fields(base_url = %base_url))]
    pub fn new(base_url: String) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        debug!("Creating duel client");
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// Base URL without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Decodes a success body, or turns an error body into an error.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return response
                .json::<T>()
                .await
                .context("Failed to decode server response");
        }
        match response.json::<ErrorBody>().await {
            Ok(body) => bail!("{} ({}): {}", status, body.reason, body.error),
            Err(_) => bail!("Server returned {}", status),
        }
    }

    /// Fetches `player`'s view of the current round.
    #[instrument(skip(self))]
    pub async fn state(&self, player: i64) -> Result<PlayerView> {
        let response = self
            .client
            .get(format!("{}/api/state?player={}", self.base_url, player))
            .send()
            .await
            .context("Failed to reach server")?;
        Self::decode(response).await
    }

    /// Submits a guess.
    #[instrument(skip(self))]
    pub async fn guess(&self, player: i64, value: &str) -> Result<GuessResponse> {
        let request = GuessRequest {
            player_id: Some(RawPlayerId::Number(player)),
            value: Some(value.to_string()),
        };
        let response = self
            .client
            .post(format!("{}/api/guess", self.base_url))
            .json(&request)
            .send()
            .await
            .context("Failed to reach server")?;
        let reply: GuessResponse = Self::decode(response).await?;
        info!(game_over = reply.game_over, feedback = %reply.guess.feedback(), "Guess submitted");
        Ok(reply)
    }

    /// Force-starts a new round.
    #[instrument(skip(self))]
    pub async fn new_round(&self) -> Result<()> {
        let response = self
            .client
            .post(format!("{}/api/new-game", self.base_url))
            .send()
            .await
            .context("Failed to reach server")?;
        let _: NewGameResponse = Self::decode(response).await?;
        info!("New round started");
        Ok(())
    }

    /// Fetches the public round summary, creating a round if none exists.
    #[instrument(skip(self))]
    pub async fn round(&self) -> Result<RoundSummary> {
        let response = self
            .client
            .get(format!("{}/api/round", self.base_url))
            .send()
            .await
            .context("Failed to reach server")?;
        Self::decode(response).await
    }
}
