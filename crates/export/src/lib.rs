//! Packs a generated campaign into a shareable zip of creative assets.

pub mod archive;
pub mod assets;
pub mod campaign;
pub mod errors;

pub use archive::{default_file_name, ExportPackBuilder, ASSET_NAMES, METADATA_ENTRY};
pub use campaign::{AdCopy, AdVariant, ExportCampaign, RegionalAnalysis};
pub use errors::ExportError;
