use chrono::{DateTime, Utc};
use rollout_core::config::AppConfig;
use rollout_core::{ApplicationError, PlanRequest, PrecomputedRanker, RolloutPlanner};
use serde_json::Value;

use super::{parse_now, read_json, CommandResult};
use crate::PlanArgs;

const COMMAND: &str = "plan";

/// Prints the plan document itself on success; failures print an outcome.
pub fn run(args: &PlanArgs, config: &AppConfig) -> CommandResult {
    let (request, now) = match load_request(args) {
        Ok(loaded) => loaded,
        Err(error) => return CommandResult::from_error(COMMAND, error),
    };

    let planner = RolloutPlanner::new(PrecomputedRanker::default(), &config.planner);
    let plan = planner.create_rollout_plan(&request, now.naive_utc());

    match serde_json::to_string_pretty(&plan) {
        Ok(output) => CommandResult { exit_code: 0, output },
        Err(error) => CommandResult::failure(COMMAND, "serialization", error.to_string(), 1),
    }
}

fn load_request(args: &PlanArgs) -> Result<(PlanRequest, DateTime<Utc>), ApplicationError> {
    let mut request: PlanRequest = read_json(&args.input)?;
    let now = parse_now(args.now.as_deref())?;

    if let Some(budget) = args.budget {
        request.budget_total = Some(Value::from(budget));
    }
    if let Some(weeks) = args.weeks {
        request.campaign_weeks = Some(Value::from(weeks));
    }

    Ok((request, now))
}
