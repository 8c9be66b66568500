use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use tracing::info;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::assets;
use crate::campaign::ExportCampaign;
use crate::errors::ExportError;

pub const AD_COPY_ASSET: &str = "ad_copy_ab.csv";
pub const SOCIAL_POSTS_ASSET: &str = "social_posts.csv";
pub const EMAIL_ASSET: &str = "email_campaign.md";
pub const STORYBOARD_ASSET: &str = "storyboard.json";
pub const THUMBNAIL_ASSET: &str = "thumbnail_brief.md";
pub const ROLLOUT_ASSET: &str = "rollout_plan.csv";
pub const CITATIONS_ASSET: &str = "citations.json";
pub const METADATA_ENTRY: &str = "metadata.json";

/// Bundled assets in archive order; `metadata.json` lists these and follows them.
pub const ASSET_NAMES: [&str; 7] = [
    AD_COPY_ASSET,
    SOCIAL_POSTS_ASSET,
    EMAIL_ASSET,
    STORYBOARD_ASSET,
    THUMBNAIL_ASSET,
    ROLLOUT_ASSET,
    CITATIONS_ASSET,
];

#[derive(Debug, Serialize)]
struct PackMetadata {
    title: String,
    generated_at: String,
    assets: [&'static str; 7],
}

/// Zips the creative assets of one campaign. Entries carry a fixed timestamp,
/// so the same campaign and clock always produce the same bytes.
#[derive(Clone, Debug)]
pub struct ExportPackBuilder {
    campaign: ExportCampaign,
    now: DateTime<Utc>,
}

impl ExportPackBuilder {
    pub fn new(campaign: ExportCampaign) -> Self {
        Self { campaign, now: Utc::now() }
    }

    /// Pins the clock used for release-window CTAs and the fallback `generated_at`.
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    pub fn build_bytes(&self) -> Result<Vec<u8>, ExportError> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(zip::DateTime::default());

        for (name, contents) in self.entries()? {
            writer.start_file(name, options)?;
            writer.write_all(&contents)?;
        }

        Ok(writer.finish()?.into_inner())
    }

    /// Writes the archive to `output_path`, creating parent directories.
    pub fn build(&self, output_path: impl AsRef<Path>) -> Result<PathBuf, ExportError> {
        let output_path = output_path.as_ref();
        if let Some(parent) = output_path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|source| ExportError::CreateDir { path: parent.to_path_buf(), source })?;
        }

        let bytes = self.build_bytes()?;
        fs::write(output_path, &bytes)?;

        info!(
            event_name = "export.archive.written",
            path = %output_path.display(),
            bytes = bytes.len(),
            title = %self.campaign.sanitized_title(),
            "export pack written"
        );

        Ok(output_path.to_path_buf())
    }

    fn entries(&self) -> Result<Vec<(&'static str, Vec<u8>)>, ExportError> {
        let campaign = &self.campaign;
        Ok(vec![
            (AD_COPY_ASSET, assets::ad_copy_csv(campaign)?),
            (SOCIAL_POSTS_ASSET, assets::social_posts_csv(campaign)?),
            (EMAIL_ASSET, assets::email_markdown(campaign, self.now).into_bytes()),
            (STORYBOARD_ASSET, assets::storyboard_json(campaign)?),
            (THUMBNAIL_ASSET, assets::thumbnail_brief_markdown(campaign, self.now).into_bytes()),
            (ROLLOUT_ASSET, assets::rollout_csv(campaign)?),
            (CITATIONS_ASSET, assets::citations_json(campaign)?),
            (METADATA_ENTRY, serde_json::to_vec_pretty(&self.metadata())?),
        ])
    }

    fn metadata(&self) -> PackMetadata {
        let generated_at = self
            .campaign
            .generated_at
            .clone()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| self.now.to_rfc3339_opts(SecondsFormat::Secs, true));

        PackMetadata { title: self.campaign.sanitized_title(), generated_at, assets: ASSET_NAMES }
    }
}

/// `<title>_export.zip`, using the sanitized title.
pub fn default_file_name(campaign: &ExportCampaign) -> String {
    format!("{}_export.zip", campaign.sanitized_title())
}
