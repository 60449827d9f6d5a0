//! Application state: the on-disk session store
//!
//! One session is a `<id>.pdf` document plus a `<id>.json` sidecar in the
//! upload directory. Nothing is cached in memory between requests.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;

use crate::error::ApiError;
use crate::models::SessionMeta;

/// Session ids are v4 UUIDs in simple (dashless) form.
const SESSION_ID_LEN: usize = 32;

#[derive(Clone)]
pub struct AppState {
    /// Directory holding session documents and sidecars
    pub upload_dir: PathBuf,
    /// Sessions older than this are expired and removed
    pub session_ttl_hours: i64,
    /// Upload cap in megabytes; enforced by the body limit layer, carried
    /// here for error messages
    pub max_upload_mb: u64,
}

impl AppState {
    pub fn new(upload_dir: PathBuf, session_ttl_hours: i64, max_upload_mb: u64) -> Result<Self> {
        std::fs::create_dir_all(&upload_dir)
            .with_context(|| format!("Failed to create upload dir {}", upload_dir.display()))?;
        Ok(Self {
            upload_dir,
            session_ttl_hours,
            max_upload_mb,
        })
    }

    pub fn new_session_id() -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }

    /// Validate a client-supplied session id before it touches the
    /// filesystem.
    pub fn check_session_id(id: &str) -> Result<(), ApiError> {
        let well_formed = id.len() == SESSION_ID_LEN
            && id.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));
        if well_formed {
            Ok(())
        } else {
            Err(ApiError::InvalidRequest("Malformed session id".to_string()))
        }
    }

    pub fn pdf_path(&self, id: &str) -> PathBuf {
        self.upload_dir.join(format!("{}.pdf", id))
    }

    pub fn meta_path(&self, id: &str) -> PathBuf {
        self.upload_dir.join(format!("{}.json", id))
    }

    /// Read the sidecar, falling back to position labels when it is
    /// missing, unreadable, or no longer matches the document.
    pub async fn load_meta(&self, id: &str, page_count: u32) -> SessionMeta {
        let meta = match tokio::fs::read(self.meta_path(id)).await {
            Ok(bytes) => serde_json::from_slice::<SessionMeta>(&bytes).ok(),
            Err(_) => None,
        };
        match meta {
            Some(meta) if meta.pages.len() == page_count as usize => meta,
            _ => SessionMeta::fallback(page_count),
        }
    }

    pub async fn save_meta(&self, id: &str, meta: &SessionMeta) -> Result<(), ApiError> {
        let bytes = serde_json::to_vec(meta).map_err(|e| anyhow::Error::from(e))?;
        tokio::fs::write(self.meta_path(id), bytes).await?;
        Ok(())
    }

    /// Remove a session's document and sidecar; missing files are fine.
    pub async fn remove_session(&self, id: &str) {
        let _ = tokio::fs::remove_file(self.pdf_path(id)).await;
        let _ = tokio::fs::remove_file(self.meta_path(id)).await;
    }

    pub fn is_expired(&self, meta: &SessionMeta) -> bool {
        Utc::now() - meta.uploaded_at > chrono::Duration::hours(self.session_ttl_hours)
    }

    /// Remove files left behind by previous runs once their TTL has
    /// lapsed, judged by filesystem mtime so orphans without a sidecar are
    /// caught too. Returns the number of files removed.
    pub async fn sweep_expired(&self) -> Result<usize> {
        let ttl = Duration::from_secs(self.session_ttl_hours as u64 * 3600);
        let mut removed = 0;

        let mut entries = tokio::fs::read_dir(&self.upload_dir)
            .await
            .context("Failed to read upload dir")?;
        while let Some(entry) = entries.next_entry().await? {
            let metadata = match entry.metadata().await {
                Ok(m) if m.is_file() => m,
                _ => continue,
            };
            let stale = metadata
                .modified()
                .ok()
                .and_then(|mtime| mtime.elapsed().ok())
                .map(|age| age > ttl)
                .unwrap_or(false);
            if stale {
                tokio::fs::remove_file(entry.path()).await?;
                removed += 1;
            }
        }

        Ok(removed)
    }
}
