// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt::Write as _;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::aggregate::{self, Period};
use crate::error::{LedgerError, Result};
use crate::models::{Category, LedgerView};
use crate::utils::http_client;

/// Shown in place of advice when no generator is configured or it fails.
pub const ADVICE_UNAVAILABLE: &str = "Financial advice is currently unavailable.";

const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
const RECENT_LIMIT: usize = 10;

#[async_trait]
pub trait AdviceGenerator: Send + Sync {
    async fn summarize(&self, view: &LedgerView, categories: &[Category]) -> Result<String>;
}

/// Returns the generator's text, or [`ADVICE_UNAVAILABLE`] if there is no
/// generator or the call fails.
pub async fn request_summary(
    generator: Option<&dyn AdviceGenerator>,
    view: &LedgerView,
    categories: &[Category],
) -> String {
    let Some(generator) = generator else {
        return ADVICE_UNAVAILABLE.to_string();
    };
    match generator.summarize(view, categories).await {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => ADVICE_UNAVAILABLE.to_string(),
        Err(err) => {
            warn!(error = %err, "advice request failed");
            ADVICE_UNAVAILABLE.to_string()
        }
    }
}

/// Plain-text digest of the ledger handed to the generator.
pub fn render_prompt(view: &LedgerView, categories: &[Category], period: Period) -> String {
    let board = aggregate::dashboard(view, categories, period);
    let mut out = String::from(
        "You are a personal finance assistant. Based on the data below, give three short, \
         practical suggestions to improve this person's finances.\n\n",
    );
    let _ = writeln!(out, "Total assets: {:.2}", board.total_assets);
    let _ = writeln!(out, "Income in {}: {:.2}", period, board.income);
    let _ = writeln!(out, "Expenses in {}: {:.2}", period, board.expense);
    out.push_str("\nAccounts:\n");
    for a in &view.accounts {
        let _ = writeln!(
            out,
            "- {} ({}, {}): {:.2}",
            a.name, a.institution, a.kind, a.balance
        );
    }
    if !board.by_category.is_empty() {
        out.push_str("\nSpending by category:\n");
        for spend in &board.by_category {
            let _ = writeln!(out, "- {}: {:.2}", spend.category.name, spend.total);
        }
    }
    if !view.transactions.is_empty() {
        out.push_str("\nRecent transactions:\n");
        for t in view.transactions.iter().take(RECENT_LIMIT) {
            let category = categories
                .iter()
                .find(|c| c.id == t.category_id)
                .map(|c| c.name.as_str())
                .unwrap_or("Uncategorized");
            let _ = writeln!(
                out,
                "- {} {} {:.2} {} {}",
                t.date, t.kind, t.amount, category, t.note
            );
        }
    }
    out
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

/// Generator backed by a `generateContent` style HTTP API.
pub struct HttpAdvisor {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl HttpAdvisor {
    pub fn new(api_key: &str, model: &str, endpoint: Option<&str>) -> Result<Self> {
        Ok(Self {
            client: http_client().map_err(LedgerError::backend)?,
            endpoint: endpoint
                .unwrap_or(DEFAULT_ENDPOINT)
                .trim_end_matches('/')
                .to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Builds an advisor only if a non-empty credential is configured.
    pub fn from_key(api_key: Option<&str>, model: &str, endpoint: Option<&str>) -> Option<Self> {
        let key = api_key.map(str::trim).filter(|k| !k.is_empty())?;
        match Self::new(key, model, endpoint) {
            Ok(advisor) => Some(advisor),
            Err(err) => {
                warn!(error = %err, "could not build advice client");
                None
            }
        }
    }
}

#[async_trait]
impl AdviceGenerator for HttpAdvisor {
    async fn summarize(&self, view: &LedgerView, categories: &[Category]) -> Result<String> {
        let prompt = render_prompt(view, categories, Period::current());
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: &prompt }],
            }],
        };
        let url = format!("{}/models/{}:generateContent", self.endpoint, self.model);
        let resp: GenerateResponse = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(LedgerError::backend)?
            .json()
            .await
            .map_err(LedgerError::backend)?;
        let text = resp
            .candidates
            .into_iter()
            .next()
            .map(|c| {
                c.content
                    .parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();
        Ok(text)
    }
}
