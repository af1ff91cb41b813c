//! Consumer reconciliation.
//!
//! Brings an app's environment into line with a deploy request: updates the
//! app's default group for one deployment target, then re-syncs every other
//! group the app references into the target namespace.

use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::core::constants::{
    LABEL_APP_NAME, LABEL_DEFAULT_APP_ENVIRONMENT, LABEL_DEPLOYMENT_TARGET_ID, LABEL_MANAGED,
};
use crate::core::domain::{ChangeSet, GroupRef, Proposal, SyncedEnvironmentGroup};
use crate::core::groups::Groups;
use crate::core::store::VersionedStore;
use crate::core::sync::NamespaceSync;
use crate::core::types::{Labels, Variables};
use crate::core::validation::{require, validate_group_name, validate_namespace};
use crate::error::Result;

/// Hex characters of the target digest kept in a default group name.
const TARGET_HASH_LEN: usize = 8;

/// An app's desired environment on one deployment target.
#[derive(Debug, Clone, Default)]
pub struct AppEnvironmentRequest {
    pub app_name: String,
    pub deployment_target_id: String,
    pub cluster_id: u64,
    pub namespace: String,
    /// Preview targets seed a missing default group from the app's template
    pub is_preview: bool,
    pub variables: Variables,
    /// Secret values; the masking sentinel leaves a secret unchanged
    pub secrets: Variables,
    pub hard_update: bool,
    /// Every group the app references. The default and template groups are
    /// ignored if listed.
    pub env_groups: Vec<String>,
}

/// Outcome of [`reconcile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    /// The other groups first, in request order, then the default group
    pub env_groups: Vec<GroupRef>,
    pub default_group: GroupRef,
    /// Whether a new default group version was written
    pub created: bool,
}

/// Name of the default group for an app on a deployment target.
pub fn default_group_name(app_name: &str, deployment_target_id: &str, cluster_id: u64) -> String {
    let digest = Sha256::digest(deployment_target_id.as_bytes());
    let hash: String = digest
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<String>()
        .chars()
        .take(TARGET_HASH_LEN)
        .collect();
    format!("{app_name}-{cluster_id}-{hash}")
}

/// Name of the group preview targets seed their default group from.
pub fn template_group_name(app_name: &str, cluster_id: u64) -> String {
    format!("{app_name}-{cluster_id}-template")
}

/// Reconcile an app's environment groups for one deploy.
///
/// # Returns
///
/// The versions now linked into the namespace, the default group last.
///
/// # Errors
///
/// Returns `ValidationError` for an empty target or namespace, or an app
/// name that does not yield valid group names. Nothing is written then.
/// Returns `Error::Batch` if one of the other groups cannot be synced.
/// Returns `StoreError::Conflict` if the default group changed concurrently.
pub fn reconcile(store: &dyn VersionedStore, request: &AppEnvironmentRequest) -> Result<Reconciled> {
    require("app name", &request.app_name)?;
    require("deployment target id", &request.deployment_target_id)?;
    validate_namespace(&request.namespace)?;

    let groups = Groups::new(store);
    let sync = NamespaceSync::new(store);

    let default_name = default_group_name(
        &request.app_name,
        &request.deployment_target_id,
        request.cluster_id,
    );
    let template_name = template_group_name(&request.app_name, request.cluster_id);
    validate_group_name(&default_name)?;
    validate_group_name(&template_name)?;

    let mut others: Vec<&str> = Vec::new();
    for name in &request.env_groups {
        if name != &default_name && name != &template_name && !others.contains(&name.as_str()) {
            others.push(name);
        }
    }

    let proposal = Proposal {
        variables: request.variables.clone(),
        secrets: request.secrets.clone(),
        hard_update: request.hard_update,
    };
    let other_labels = consumer_labels(request, false);

    let latest = store.latest(&default_name)?;
    let changes = ChangeSet::compute(latest.as_ref(), &proposal);

    if let Some(latest) = latest.as_ref().filter(|_| changes.is_noop()) {
        debug!(
            app = %request.app_name,
            group = %default_name,
            version = latest.version(),
            "default group unchanged"
        );
        let synced = sync.many(&others, &request.namespace, &other_labels)?;
        return Ok(finish(synced, latest.group_ref(), false));
    }

    let template = match (&latest, request.is_preview) {
        (None, true) => store.latest(&template_name)?,
        _ => None,
    };
    if let Some(template) = &template {
        info!(
            app = %request.app_name,
            group = %default_name,
            template = %template.versioned_name(),
            "seeding preview environment from template"
        );
    }

    let base = latest.as_ref().or(template.as_ref());
    let expected = latest.as_ref().map(|g| g.version());
    let default_labels = consumer_labels(request, true);
    let version = groups.write(&default_name, base, &proposal, expected, &default_labels)?;

    info!(
        app = %request.app_name,
        group = %default_name,
        version,
        "updated default environment group"
    );

    let default = sync.version_to_namespace(
        &default_name,
        version,
        &request.namespace,
        &default_labels,
    )?;
    let synced = sync.many(&others, &request.namespace, &other_labels)?;

    Ok(finish(synced, default.group_ref(), true))
}

fn consumer_labels(request: &AppEnvironmentRequest, default: bool) -> Labels {
    let mut labels = Labels::new();
    labels.insert(LABEL_APP_NAME.to_string(), request.app_name.clone());
    labels.insert(
        LABEL_DEPLOYMENT_TARGET_ID.to_string(),
        request.deployment_target_id.clone(),
    );
    if default {
        labels.insert(LABEL_DEFAULT_APP_ENVIRONMENT.to_string(), "true".to_string());
    }
    labels.insert(LABEL_MANAGED.to_string(), "true".to_string());
    labels
}

fn finish(synced: Vec<SyncedEnvironmentGroup>, default_group: GroupRef, created: bool) -> Reconciled {
    let mut env_groups: Vec<GroupRef> = synced.iter().map(SyncedEnvironmentGroup::group_ref).collect();
    env_groups.push(default_group.clone());
    Reconciled {
        env_groups,
        default_group,
        created,
    }
}
