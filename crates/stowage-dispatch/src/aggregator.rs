// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-scope fetch, composite assembly, and queue submission.

use std::sync::Arc;

use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};

use stowage_config::DispatchConfig;
use stowage_core::{StowageError, TaskId};
use stowage_queue::{NewQueueItem, QueueService};

use crate::composite::{
    company_section, ensure_base64, machine_connection_fields, normalize_bundle, param_list,
    param_str, storage_env_map, CompositeJobVault,
};
use crate::intent::JobIntent;
use crate::policy::{OnError, PolicyTable, Scope, ScopePolicy};
use crate::requirements::{requirements_for, FunctionRequirements};
use crate::source::ScopeSource;

type Bundle = Map<String, Value>;

/// Assembles composite job vaults from per-scope sources and submits them.
pub struct VaultAggregator {
    source: Arc<dyn ScopeSource>,
    queue: Arc<QueueService>,
    config: DispatchConfig,
}

impl VaultAggregator {
    pub fn new(
        source: Arc<dyn ScopeSource>,
        queue: Arc<QueueService>,
        config: DispatchConfig,
    ) -> Self {
        Self {
            source,
            queue,
            config,
        }
    }

    /// Assemble and enqueue in one step; the composite vault crosses the
    /// queue boundary as an opaque minified JSON string.
    pub async fn submit(&self, intent: JobIntent) -> Result<TaskId, StowageError> {
        let policies = PolicyTable::for_requirements(&requirements_for(&intent.function_name));
        self.submit_with(intent, &policies).await
    }

    pub async fn submit_with(
        &self,
        intent: JobIntent,
        policies: &PolicyTable,
    ) -> Result<TaskId, StowageError> {
        let vault = self.assemble_with(&intent, policies).await?;
        let vault_content = serde_json::to_string(&vault)
            .map_err(|err| StowageError::Internal(format!("composite vault serialization: {err}")))?;

        let task_id = self
            .queue
            .create(NewQueueItem {
                function_name: intent.function_name,
                team_name: intent.team_name,
                machine_name: intent.machine_name,
                bridge_name: intent.bridge_name,
                vault_content,
                priority: intent.priority,
            })
            .await?;
        info!(task_id = %task_id, "job submitted with composite vault");
        Ok(task_id)
    }

    /// Assemble the composite vault with the function's default policies.
    pub async fn assemble(&self, intent: &JobIntent) -> Result<CompositeJobVault, StowageError> {
        let policies = PolicyTable::for_requirements(&requirements_for(&intent.function_name));
        self.assemble_with(intent, &policies).await
    }

    pub async fn assemble_with(
        &self,
        intent: &JobIntent,
        policies: &PolicyTable,
    ) -> Result<CompositeJobVault, StowageError> {
        let requirements = requirements_for(&intent.function_name);

        let company = resolve(
            Scope::Company,
            policies.get(Scope::Company),
            self.source.company_vault().await,
        )?;
        let team = resolve(
            Scope::Team,
            policies.get(Scope::Team),
            self.source.team_vault(&intent.team_name).await,
        )?;
        let machine = match &intent.machine_name {
            Some(name) => resolve(
                Scope::Machine,
                policies.get(Scope::Machine),
                self.source.machine_vault(name).await,
            )?,
            None => unnamed(Scope::Machine, policies.get(Scope::Machine))?,
        };
        let repository = match &intent.repository_guid {
            Some(guid) => resolve(
                Scope::Repository,
                policies.get(Scope::Repository),
                self.source.repository_vault(guid).await,
            )?,
            None => unnamed(Scope::Repository, policies.get(Scope::Repository))?,
        };
        let storage = match &intent.storage_name {
            Some(name) => resolve(
                Scope::Storage,
                policies.get(Scope::Storage),
                self.source.storage_vault(name).await,
            )?,
            None => unnamed(Scope::Storage, policies.get(Scope::Storage))?,
        };
        let bridge = match &intent.bridge_name {
            Some(name) => resolve(
                Scope::Bridge,
                policies.get(Scope::Bridge),
                self.source.bridge_vault(name).await,
            )?,
            None => unnamed(Scope::Bridge, policies.get(Scope::Bridge))?,
        };

        let mut context = Map::new();
        context.insert(
            "GENERAL_SETTINGS".to_string(),
            Value::Object(self.general_settings(intent, company.as_ref(), team.as_ref())),
        );

        let machines = self.collect_machines(intent, &requirements, machine.as_ref()).await;
        if !machines.is_empty() {
            context.insert("MACHINES".to_string(), Value::Object(machines));
        }

        let storage_systems = self.collect_storage_systems(intent).await;
        if !storage_systems.is_empty() {
            context.insert("STORAGE_SYSTEMS".to_string(), Value::Object(storage_systems));
        }

        if requirements.repository {
            if let (Some(guid), Some(repo)) = (&intent.repository_guid, &repository) {
                if let Some(credential) = repo.get("credential") {
                    let mut credentials = Map::new();
                    credentials.insert(guid.clone(), credential.clone());
                    context.insert("REPO_CREDENTIALS".to_string(), Value::Object(credentials));
                }
            }
            if let Some(network_id) = intent.repository_network_id {
                context.insert("REPO_NETWORK_ID".to_string(), json!(network_id));
            }
            if let Some(mode) = &intent.repository_network_mode {
                context.insert("REPO_NETWORK_MODE".to_string(), json!(mode));
            }
            if let Some(tag) = &intent.repository_tag {
                context.insert("REPO_TAG".to_string(), json!(tag));
            }
        }

        // Plugin-driven functions carry the company plugin definitions at
        // the top of contextData as well as in the plugins section.
        if matches!(
            intent.function_name.as_str(),
            "mount" | "unmount" | "new" | "up"
        ) {
            if let Some(plugins) = company.as_ref().and_then(|c| c.get("PLUGINS")) {
                context.insert("PLUGINS".to_string(), plugins.clone());
            }
        }

        if requirements.company {
            if let Some(bundle) = &company {
                context.insert(
                    "company".to_string(),
                    Value::Object(company_section(bundle)),
                );
            }
        }
        if requirements.repository {
            if let Some(guid) = &intent.repository_guid {
                context.insert(
                    "repository".to_string(),
                    Value::Object(repository_section(guid, repository.as_ref(), intent)),
                );
            }
        }
        if requirements.storage {
            if let Some(name) = &intent.storage_name {
                context.insert(
                    "storage".to_string(),
                    Value::Object(named_section(name, storage.as_ref())),
                );
            }
        }
        if requirements.bridge {
            if let Some(name) = &intent.bridge_name {
                context.insert(
                    "bridge".to_string(),
                    Value::Object(named_section(name, bridge.as_ref())),
                );
            }
        }
        if requirements.plugin {
            let plugins = company
                .as_ref()
                .and_then(|c| c.get("PLUGINS"))
                .cloned()
                .unwrap_or_else(|| json!({}));
            context.insert("plugins".to_string(), plugins);
        }

        debug!(
            function = %intent.function_name,
            scopes = context.len(),
            "composite vault assembled"
        );

        Ok(CompositeJobVault {
            schema_version: self.config.schema_version,
            function: intent.function_name.clone(),
            machine: intent.machine_name.clone().unwrap_or_default(),
            team: intent.team_name.clone(),
            params: intent.params.clone(),
            context_data: context,
        })
    }

    fn general_settings(
        &self,
        intent: &JobIntent,
        company: Option<&Bundle>,
        team: Option<&Bundle>,
    ) -> Bundle {
        let mut settings = Map::new();
        settings.insert(
            "SYSTEM_API_URL".to_string(),
            json!(self.config.api_url.clone()),
        );
        settings.insert("TEAM_NAME".to_string(), json!(intent.team_name.clone()));
        if let Some(machine) = &intent.machine_name {
            settings.insert("MACHINE_NAME".to_string(), json!(machine.clone()));
        }

        if let Some(bundle) = company {
            for key in [
                "UNIVERSAL_USER_ID",
                "UNIVERSAL_USER_NAME",
                "DOCKER_JSON_CONF",
                "PLUGINS",
            ] {
                if let Some(value) = bundle.get(key) {
                    settings.insert(key.to_string(), value.clone());
                }
            }
        }

        if let Some(bundle) = team {
            for key in ["SSH_PRIVATE_KEY", "SSH_PUBLIC_KEY"] {
                if let Some(Value::String(raw)) = bundle.get(key) {
                    settings.insert(key.to_string(), json!(ensure_base64(raw)));
                }
            }
        }
        settings
    }

    /// MACHINES entries: the target machine, plus function-specific extras
    /// (deploy destination, list/pull sources) fetched best-effort.
    async fn collect_machines(
        &self,
        intent: &JobIntent,
        requirements: &FunctionRequirements,
        machine: Option<&Bundle>,
    ) -> Bundle {
        let mut machines = Map::new();

        if requirements.machine {
            if let (Some(name), Some(bundle)) = (&intent.machine_name, machine) {
                machines.insert(
                    name.clone(),
                    Value::Object(machine_connection_fields(bundle)),
                );
            }
        }

        match intent.function_name.as_str() {
            "deploy" => {
                if let Some(destination) = param_str(&intent.params, "to") {
                    if Some(destination) != intent.machine_name.as_deref() {
                        if let Some(bundle) = self.auxiliary_machine(destination).await {
                            machines.insert(
                                destination.to_string(),
                                Value::Object(machine_connection_fields(&bundle)),
                            );
                        }
                    }
                }
            }
            "list" => {
                if let Some(source) = param_str(&intent.params, "from") {
                    if let Some(bundle) = self.auxiliary_machine(source).await {
                        machines.insert(
                            source.to_string(),
                            Value::Object(machine_connection_fields(&bundle)),
                        );
                    }
                }
            }
            "pull" => {
                if param_str(&intent.params, "sourceType") == Some("machine") {
                    if let Some(source) = param_str(&intent.params, "from") {
                        if let Some(bundle) = self.auxiliary_machine(source).await {
                            machines.insert(
                                source.to_string(),
                                Value::Object(machine_connection_fields(&bundle)),
                            );
                        }
                    }
                }
            }
            _ => {}
        }
        machines
    }

    /// STORAGE_SYSTEMS entries: backup targets, list sources, and
    /// storage-sourced pulls, each shaped into an rclone env map.
    async fn collect_storage_systems(&self, intent: &JobIntent) -> Bundle {
        let mut targets: Vec<String> = Vec::new();
        match intent.function_name.as_str() {
            "backup" => {
                targets = param_list(&intent.params, "storages");
                if targets.is_empty() {
                    if let Some(fallback) = param_str(&intent.params, "to") {
                        targets.push(fallback.to_string());
                    }
                }
            }
            "list" => {
                if let Some(source) = param_str(&intent.params, "from") {
                    targets.push(source.to_string());
                }
            }
            "pull" => {
                if param_str(&intent.params, "sourceType") == Some("storage") {
                    if let Some(source) = param_str(&intent.params, "from") {
                        targets.push(source.to_string());
                    }
                }
            }
            _ => {}
        }

        let mut systems = Map::new();
        for target in targets {
            let Some(bundle) = self.auxiliary_storage(&target).await else {
                continue;
            };
            match storage_env_map(&bundle) {
                Ok(env) => {
                    systems.insert(target, Value::Object(env));
                }
                Err(err) => {
                    warn!(storage = %target, error = %err, "skipping unusable storage bundle");
                }
            }
        }
        systems
    }

    /// Best-effort fetch of a machine named only in params.
    async fn auxiliary_machine(&self, name: &str) -> Option<Bundle> {
        match self.source.machine_vault(name).await {
            Ok(value) => value.and_then(normalize_bundle),
            Err(err) => {
                warn!(machine = %name, error = %err, "auxiliary machine vault fetch failed");
                None
            }
        }
    }

    async fn auxiliary_storage(&self, name: &str) -> Option<Bundle> {
        match self.source.storage_vault(name).await {
            Ok(value) => value.and_then(normalize_bundle),
            Err(err) => {
                warn!(storage = %name, error = %err, "auxiliary storage vault fetch failed");
                None
            }
        }
    }
}

/// Apply a scope's policy to its fetch outcome.
fn resolve(
    scope: Scope,
    policy: ScopePolicy,
    fetched: Result<Option<Value>, StowageError>,
) -> Result<Option<Bundle>, StowageError> {
    match fetched {
        Err(err) => {
            if policy.required || policy.on_error == OnError::Abort {
                Err(StowageError::Vault(format!(
                    "{} vault fetch failed: {err}",
                    scope.label()
                )))
            } else {
                warn!(scope = scope.label(), error = %err, "scope fetch failed; omitting from composite vault");
                Ok(None)
            }
        }
        Ok(value) => {
            let bundle = value.and_then(normalize_bundle);
            if bundle.is_none() && policy.required {
                return Err(StowageError::Vault(format!(
                    "required {} vault is absent or not an object",
                    scope.label()
                )));
            }
            Ok(bundle)
        }
    }
}

/// A scope whose selector (machine name, guid, ...) was never supplied.
fn unnamed(scope: Scope, policy: ScopePolicy) -> Result<Option<Bundle>, StowageError> {
    if policy.required {
        Err(StowageError::Vault(format!(
            "{} scope is required but no {} was named in the request",
            scope.label(),
            scope.label()
        )))
    } else {
        Ok(None)
    }
}

fn repository_section(guid: &str, bundle: Option<&Bundle>, intent: &JobIntent) -> Bundle {
    let mut section = Map::new();
    section.insert("guid".to_string(), json!(guid));
    if let Some(repo) = bundle {
        for key in ["size", "credential"] {
            if let Some(value) = repo.get(key) {
                section.insert(key.to_string(), value.clone());
            }
        }
    }
    if let Some(network_id) = intent.repository_network_id {
        section.insert("networkId".to_string(), json!(network_id));
    }
    if let Some(mode) = &intent.repository_network_mode {
        section.insert("networkMode".to_string(), json!(mode));
    }
    section
}

/// Storage and bridge sections are the bundle with the resolved name
/// stamped in; name wins over any same-named bundle field.
fn named_section(name: &str, bundle: Option<&Bundle>) -> Bundle {
    let mut section = bundle.cloned().unwrap_or_default();
    section.insert("name".to_string(), json!(name));
    section
}
