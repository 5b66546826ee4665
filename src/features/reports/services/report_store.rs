use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::reports::models::{NewReport, Report};
use crate::modules::storage::{keys, BlobStore};
use crate::shared::persisted::{try_read_collection, write_collection, ReadFailure};

/// Owns the report collection and keeps it in step with storage.
///
/// Every mutation writes the whole collection before returning. When the
/// write fails the in-memory change is undone, so memory never runs ahead
/// of what a restart would restore.
///
/// A load that cannot reach storage leaves the store detached: it reads as
/// empty, and each mutation first retries the load, failing with
/// `Persistence` until storage answers. A corrupt record is discarded and
/// the next write replaces it.
pub struct ReportStore {
    blobs: Arc<dyn BlobStore>,
    reports: Vec<Report>,
    detached: bool,
}

impl ReportStore {
    pub async fn load(blobs: Arc<dyn BlobStore>) -> Self {
        let mut store = Self {
            blobs,
            reports: Vec::new(),
            detached: false,
        };
        store.reload().await;
        store
    }

    /// Replace memory with whatever storage holds. Unreadable data yields an
    /// empty collection.
    pub async fn reload(&mut self) {
        let loaded = try_read_collection::<Report>(self.blobs.as_ref(), keys::REPORTS).await;
        self.detached = false;
        self.reports = match loaded {
            Ok(reports) => reports.unwrap_or_default(),
            Err(ReadFailure::Format(e)) => {
                tracing::warn!("Discarding corrupt reports record: {}", e);
                Vec::new()
            }
            Err(ReadFailure::Unavailable(e)) => {
                tracing::error!("Reports unreadable, holding writes until storage answers: {}", e);
                self.detached = true;
                Vec::new()
            }
        };

        let repaired = self
            .reports
            .iter_mut()
            .map(|report| report.repair_resolution())
            .filter(|changed| *changed)
            .count();
        if repaired > 0 {
            tracing::warn!("Repaired resolution timestamps on {} reports", repaired);
        }

        tracing::info!("Loaded {} reports", self.reports.len());
    }

    /// Retry a load that could not reach storage
    async fn attach(&mut self) -> Result<()> {
        if self.detached {
            self.reload().await;
            if self.detached {
                return Err(AppError::Persistence(
                    "Report storage is unreachable".to_string(),
                ));
            }
        }
        Ok(())
    }

    pub async fn save(&self) -> Result<()> {
        write_collection(self.blobs.as_ref(), keys::REPORTS, &self.reports).await
    }

    pub fn all(&self) -> &[Report] {
        &self.reports
    }

    pub fn get(&self, id: Uuid) -> Option<&Report> {
        self.reports.iter().find(|r| r.id == id)
    }

    pub async fn create(&mut self, new_report: NewReport) -> Result<Report> {
        let report = new_report.into_report(Utc::now())?;
        self.attach().await?;
        self.reports.push(report.clone());

        if let Err(e) = self.save().await {
            self.reports.pop();
            return Err(e);
        }

        tracing::info!(
            "Report {} created: label={}, severity={}",
            report.id,
            report.label,
            report.severity
        );
        Ok(report)
    }

    /// Delete a report if present. The collection is written either way.
    pub async fn remove(&mut self, id: Uuid) -> Result<()> {
        self.attach().await?;
        let position = self.reports.iter().position(|r| r.id == id);
        let removed = position.map(|index| (index, self.reports.remove(index)));

        if let Err(e) = self.save().await {
            if let Some((index, report)) = removed {
                self.reports.insert(index, report);
            }
            return Err(e);
        }

        if removed.is_some() {
            tracing::info!("Report {} removed", id);
        }
        Ok(())
    }

    pub async fn remove_all(&mut self) -> Result<()> {
        self.attach().await?;
        let previous = std::mem::take(&mut self.reports);

        if let Err(e) = self.save().await {
            self.reports = previous;
            return Err(e);
        }

        tracing::warn!("All {} reports removed", previous.len());
        Ok(())
    }

    /// Returns `false` without touching storage when no report has `id`
    pub async fn update_status(&mut self, id: Uuid, is_resolved: bool) -> Result<bool> {
        self.attach().await?;
        let Some(report) = self.reports.iter_mut().find(|r| r.id == id) else {
            return Ok(false);
        };

        let previous = report.clone();
        report.set_resolved(is_resolved, Utc::now());

        if let Err(e) = self.save().await {
            if let Some(report) = self.reports.iter_mut().find(|r| r.id == id) {
                *report = previous;
            }
            return Err(e);
        }

        tracing::info!("Report {} marked resolved={}", id, is_resolved);
        Ok(true)
    }
}
