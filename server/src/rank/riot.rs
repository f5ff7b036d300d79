//! Riot account-v1 / league-v4 client.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use url::Url;

use super::{RankError, RankResolver, ResolvedAccount};
use crate::config::Settings;

const SOLO_QUEUE: &str = "RANKED_SOLO_5x5";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Account {
    puuid: String,
    game_name: String,
    tag_line: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LeagueEntry {
    queue_type: String,
    tier: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RiotClient {
    client: Client,
    api_key: String,
    account_base: Url,
    league_base: Url,
}

impl RiotClient {
    pub fn new(api_key: &str, account_base: &str, league_base: &str) -> Result<Self, RankError> {
        Ok(Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            account_base: parse_base(account_base)?,
            league_base: parse_base(league_base)?,
        })
    }

    pub fn from_settings(s: &Settings) -> Result<Self, RankError> {
        Self::new(
            &s.riot_api_key,
            &s.riot_account_base_url,
            &s.riot_league_base_url,
        )
    }

    /// `base` + percent-encoded `segments`.
    fn endpoint(base: &Url, segments: &[&str]) -> Url {
        let mut url = base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get(&self, url: Url) -> Result<Response, RankError> {
        log::debug!("GET {url}");
        let resp = self
            .client
            .get(url)
            .header("X-Riot-Token", &self.api_key)
            .send()
            .await?;
        Ok(resp)
    }

    async fn json<T: DeserializeOwned>(resp: Response) -> Result<T, RankError> {
        let status = resp.status();
        if !status.is_success() {
            let url = resp.url().to_string();
            tracing::error!(%status, %url, "rank service request failed");
            return Err(RankError::Status { status, url });
        }
        Ok(resp.json().await?)
    }

    async fn account(&self, game_name: &str, tag_line: &str) -> Result<Account, RankError> {
        let url = Self::endpoint(
            &self.account_base,
            &["riot", "account", "v1", "accounts", "by-riot-id", game_name, tag_line],
        );
        let resp = self.get(url).await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Err(RankError::AccountNotFound(format!("{game_name}#{tag_line}")));
        }
        Self::json(resp).await
    }

    async fn solo_tier(&self, puuid: &str) -> Result<Option<String>, RankError> {
        let url = Self::endpoint(
            &self.league_base,
            &["lol", "league", "v4", "entries", "by-puuid", puuid],
        );
        let entries: Vec<LeagueEntry> = Self::json(self.get(url).await?).await?;
        Ok(entries
            .into_iter()
            .find(|e| e.queue_type == SOLO_QUEUE)
            .and_then(|e| e.tier))
    }
}

fn parse_base(raw: &str) -> Result<Url, RankError> {
    match Url::parse(raw) {
        Ok(url) if !url.cannot_be_a_base() => Ok(url),
        _ => Err(RankError::BadBaseUrl(raw.to_string())),
    }
}

#[async_trait]
impl RankResolver for RiotClient {
    async fn resolve(
        &self,
        game_name: &str,
        tag_line: &str,
    ) -> Result<ResolvedAccount, RankError> {
        let account = self.account(game_name, tag_line).await?;
        let tier = self.solo_tier(&account.puuid).await?;
        Ok(ResolvedAccount {
            riot_id: format!("{}#{}", account.game_name, account.tag_line),
            puuid: account.puuid,
            tier,
        })
    }
}
