/// Advisory text for the coin on the order screen.
///
/// A source turns a coin into one short verdict line. Sources never fail
/// outward: transport and decode problems collapse into fixed fallback
/// strings, and the error goes to the log.
///
/// `AdvisoryService` runs requests on its own tokio runtime and hands
/// finished verdicts back over a channel that the UI loop drains without
/// blocking.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::config::AdvisoryConfig;
use crate::domain::coin::Coin;
use crate::error::AppError;

pub const SIGNAL_LOST: &str = "SIGNAL_LOST.";
pub const CONNECTION_SEVERED: &str = "CONNECTION_SEVERED. RETRY.";

#[async_trait]
pub trait AdvisorySource: Send + Sync {
    async fn analyze(&self, coin: &Coin) -> String;
}

fn prompt(coin: &Coin) -> String {
    format!(
        "You are \"The Operator\" in a cyberpunk/matrix world. The user is jacked in.\n\
         Target Code: {} ({}).\n\
         Current Value: {}.\n\
         Flux (24h): {}%.\n\
         Provide a tactical assessment. Is this a glitch to exploit (Buy), a system crash (Sell), \
         or static noise (Hold)?\n\
         Use techno-babble, be cryptic but clear on the action. Max 25 words.\n\
         Format: \"STATUS: [Verdict]. [Reasoning].\"",
        coin.symbol, coin.name, coin.price, coin.change_24h
    )
}

// ── Remote source ──

#[derive(Deserialize, Default)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Default)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

#[derive(Deserialize, Default)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize, Default)]
struct Part {
    #[serde(default)]
    text: String,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate, trimmed. None if blank.
    fn text(&self) -> Option<String> {
        let first = self.candidates.first()?;
        let joined: String = first.content.parts.iter().map(|p| p.text.as_str()).collect();
        let trimmed = joined.trim();
        if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
    }
}

/// Generative-language HTTP backend.
pub struct GeminiAdvisor {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl GeminiAdvisor {
    pub fn new(cfg: &AdvisoryConfig, api_key: String) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;
        let url = format!(
            "{}/models/{}:generateContent",
            cfg.endpoint.trim_end_matches('/'),
            cfg.model
        );
        Ok(GeminiAdvisor { client, url, api_key })
    }

    async fn request(&self, coin: &Coin) -> Result<Option<String>, reqwest::Error> {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt(coin) }] }]
        });
        let resp: GenerateResponse = self
            .client
            .post(&self.url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(resp.text())
    }
}

#[async_trait]
impl AdvisorySource for GeminiAdvisor {
    async fn analyze(&self, coin: &Coin) -> String {
        match self.request(coin).await {
            Ok(Some(text)) => text,
            Ok(None) => {
                warn!(symbol = coin.symbol, "advisory response had no text");
                SIGNAL_LOST.to_string()
            }
            Err(e) => {
                warn!(symbol = coin.symbol, error = %e, "advisory request failed");
                CONNECTION_SEVERED.to_string()
            }
        }
    }
}

// ── Offline source ──

/// Canned verdicts keyed on the 24h change. Used when no API key is set.
pub struct OfflineAdvisor;

pub fn offline_verdict(coin: &Coin) -> String {
    let c = coin.change_24h;
    if c >= 3.0 {
        format!("STATUS: BUY. {} surge of {:+.1}% reads as a glitch in the grid. Exploit before patch.", coin.symbol, c)
    } else if c <= -3.0 {
        format!("STATUS: SELL. {} flux {:+.1}% signals cascade failure. Extract now.", coin.symbol, c)
    } else {
        format!("STATUS: HOLD. {} drifting {:+.1}%. Static noise only.", coin.symbol, c)
    }
}

#[async_trait]
impl AdvisorySource for OfflineAdvisor {
    async fn analyze(&self, coin: &Coin) -> String {
        offline_verdict(coin)
    }
}

// ── Service ──

#[derive(Clone, Debug, PartialEq)]
pub struct AdvisoryReply {
    pub visit: u64,
    pub text: String,
}

pub struct AdvisoryService {
    runtime: tokio::runtime::Runtime,
    source: Arc<dyn AdvisorySource>,
    tx: async_channel::Sender<AdvisoryReply>,
    rx: async_channel::Receiver<AdvisoryReply>,
}

impl AdvisoryService {
    pub fn new(source: Arc<dyn AdvisorySource>) -> Result<Self, AppError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("advisory")
            .enable_all()
            .build()
            .map_err(AppError::Runtime)?;
        let (tx, rx) = async_channel::unbounded();
        Ok(AdvisoryService { runtime, source, tx, rx })
    }

    /// Pick the remote source when enabled and a key is present in the
    /// configured environment variable, otherwise the offline one.
    pub fn from_config(cfg: &AdvisoryConfig) -> Result<Self, AppError> {
        let key = std::env::var(&cfg.api_key_env).ok().filter(|k| !k.trim().is_empty());
        let source: Arc<dyn AdvisorySource> = match key {
            Some(key) if cfg.enabled => {
                info!(model = %cfg.model, "advisory: remote source");
                Arc::new(GeminiAdvisor::new(cfg, key)?)
            }
            _ => {
                info!("advisory: offline source");
                Arc::new(OfflineAdvisor)
            }
        };
        Self::new(source)
    }

    /// Start a request in the background. The reply arrives via `drain`.
    pub fn request(&self, visit: u64, coin: Coin) {
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        debug!(visit, symbol = coin.symbol, "advisory requested");
        self.runtime.spawn(async move {
            let text = source.analyze(&coin).await;
            if tx.send(AdvisoryReply { visit, text }).await.is_err() {
                debug!(visit, "advisory receiver closed");
            }
        });
    }

    /// All replies that have arrived so far.
    pub fn drain(&self) -> Vec<AdvisoryReply> {
        let mut out = Vec::new();
        while let Ok(reply) = self.rx.try_recv() {
            out.push(reply);
        }
        out
    }
}
