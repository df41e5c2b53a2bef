//! HTTP client for the diary server's sector and statistics endpoints.
//!
//! This module provides:
//! - `GET /api/sector/{id}` decoded into prepared [`SectorData`]
//! - `GET /api/route/latlon/sector/{sector}` for the map card
//! - `PUT /api/diary/statistics` for batched diary edits
//!
//! Failures are returned to the caller as [`SectorError`]; nothing is retried.

use futures::future::join;
use log::{debug, info, warn};
use reqwest::{header, Client, Response};
use std::time::Instant;

use crate::config::ClientConfig;
use crate::error::{Result, SectorError};
use crate::journal::SectorData;
use crate::route::SectorRoute;
use crate::writer::Statistics;

/// Client for the diary server REST API.
#[derive(Debug, Clone)]
pub struct SectorClient {
    client: Client,
    config: ClientConfig,
}

impl SectorClient {
    /// Create a new client for the configured server
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| SectorError::ConfigError {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fetch the comparison payload for a sector.
    pub async fn fetch_sector(&self, id: &str) -> Result<SectorData> {
        let start = Instant::now();
        let body = self.get_text(&format!("/api/sector/{}", id)).await?;
        let data = SectorData::from_json(&body)?;
        info!(
            "[SectorClient] Sector {}: {} journals in {:.2}s",
            id,
            data.sector_journals.len(),
            start.elapsed().as_secs_f64()
        );
        Ok(data)
    }

    /// Fetch the polyline for a sector.
    pub async fn fetch_sector_route(&self, sector: &str) -> Result<SectorRoute> {
        let body = self
            .get_text(&format!("/api/route/latlon/sector/{}", sector))
            .await?;
        let route: SectorRoute = serde_json::from_str(&body)?;
        debug!(
            "[SectorClient] Sector {} route has {} points",
            sector,
            route.latlon.len()
        );
        Ok(route)
    }

    /// Fetch the sector payload and its route concurrently.
    ///
    /// Only a sector failure fails the page; the route result is handed back
    /// as-is so the journals can still be shown without a map.
    pub async fn fetch_sector_page(
        &self,
        id: &str,
    ) -> Result<(SectorData, Result<SectorRoute>)> {
        let (data, route) = join(self.fetch_sector(id), self.fetch_sector_route(id)).await;
        if let Err(e) = &route {
            warn!("[SectorClient] Sector {} route unavailable: {}", id, e);
        }
        Ok((data?, route))
    }

    /// Write a batch of diary statistics in one request.
    pub async fn put_statistics(&self, batch: &Statistics) -> Result<()> {
        let url = self.config.url("/api/diary/statistics");
        let response = self
            .client
            .put(&url)
            .header(header::ACCEPT, "application/json")
            .json(batch)
            .send()
            .await?;
        check(response).await?;
        debug!("[SectorClient] Wrote {} statistics", batch.len());
        Ok(())
    }

    async fn get_text(&self, path: &str) -> Result<String> {
        let url = self.config.url(path);
        debug!("[SectorClient] GET {}", url);
        let response = self
            .client
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;
        Ok(check(response).await?.text().await?)
    }
}

/// Turn a non-success response into an error carrying the server's message.
async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        body
    };
    warn!("[SectorClient] HTTP {}: {}", status, message);
    Err(SectorError::HttpError {
        message,
        status_code: Some(status.as_u16()),
    })
}
