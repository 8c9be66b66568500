use rollout_core::config::AppConfig;
use rollout_core::ApplicationError;
use rollout_export::{default_file_name, ExportCampaign, ExportPackBuilder};

use super::{parse_now, read_json, CommandResult};
use crate::ExportArgs;

const COMMAND: &str = "export";

pub fn run(args: &ExportArgs, config: &AppConfig) -> CommandResult {
    match write_pack(args, config) {
        Ok(message) => CommandResult::success(COMMAND, message),
        Err(error) => CommandResult::from_error(COMMAND, error),
    }
}

fn write_pack(args: &ExportArgs, config: &AppConfig) -> Result<String, ApplicationError> {
    let campaign: ExportCampaign = read_json(&args.input)?;
    let now = parse_now(args.now.as_deref())?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| config.export.output_dir.join(default_file_name(&campaign)));

    let written = ExportPackBuilder::new(campaign).with_now(now).build(&output)?;
    Ok(format!("export pack written to {}", written.display()))
}
