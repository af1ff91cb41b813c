//! Deploy command - reconcile an app's environment groups.

use tracing::info;

use crate::cli::{open_store, output, parse_pairs};
use crate::core::reconcile::{reconcile, AppEnvironmentRequest};
use crate::error::Result;

/// Arguments of `envgroup deploy`.
pub struct Args {
    pub app: String,
    pub target: String,
    pub namespace: String,
    pub preview: bool,
    pub groups: Vec<String>,
    pub vars: Vec<String>,
    pub secrets: Vec<String>,
    pub hard: bool,
    pub json: bool,
}

/// Reconcile the app's default group and re-sync the groups it uses.
pub fn execute(args: Args) -> Result<()> {
    let (config, store) = open_store()?;

    let request = AppEnvironmentRequest {
        app_name: args.app,
        deployment_target_id: args.target,
        cluster_id: config.cluster.id,
        namespace: args.namespace,
        is_preview: args.preview,
        variables: parse_pairs(&args.vars)?,
        secrets: parse_pairs(&args.secrets)?,
        hard_update: args.hard,
        env_groups: args.groups,
    };

    let reconciled = reconcile(store.as_ref(), &request)?;
    info!(
        app = %request.app_name,
        default = %reconciled.default_group,
        created = reconciled.created,
        "reconciled"
    );

    if args.json {
        let result = serde_json::json!({
            "env_groups": reconciled.env_groups,
            "default_group": reconciled.default_group,
            "created": reconciled.created,
        });
        output::data(&serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if reconciled.created {
        output::success(&format!(
            "{} updated",
            output::name(&reconciled.default_group)
        ));
    } else {
        output::dimmed(&format!("{} unchanged", reconciled.default_group));
    }
    output::section(&format!("linked into {}", request.namespace));
    for group in &reconciled.env_groups {
        output::list_item(&group.to_string());
    }

    Ok(())
}
