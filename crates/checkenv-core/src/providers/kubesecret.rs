//! Kubernetes Secret Provider
//!
//! Reads variables from the data of Kubernetes secrets. Arguments are
//! `+`-separated `key:value` pairs, all optional:
//!
//! ```text
//! kubesecret+kubeconfig:/path/to/config+namespace:prod+secret:app-env
//! ```
//!
//! - `kubeconfig` defaults to `~/.kube/config`
//! - `namespace` defaults to the kubeconfig context namespace when a secret is
//!   named, and to all namespaces otherwise
//! - without `secret`, the data of every listed secret is merged, later
//!   secrets overriding earlier keys
//!
//! The cluster client is only compiled with the `kubernetes` feature.

use super::traits::{ProviderError, ProviderResult, Variables, VariableProvider};
use std::path::{Path, PathBuf};

/// Parsed `kubesecret` arguments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KubeSecretArgs {
    pub kubeconfig: Option<PathBuf>,
    pub namespace: Option<String>,
    pub secret: Option<String>,
}

impl KubeSecretArgs {
    /// Parse the provider argument string; unknown keys are ignored
    pub fn parse(args: &str) -> Self {
        let mut parsed = Self::default();

        for part in args.split('+').filter(|p| !p.is_empty()) {
            let (key, value) = part.split_once(':').unwrap_or((part, ""));
            if value.is_empty() {
                continue;
            }
            match key {
                "kubeconfig" => parsed.kubeconfig = Some(PathBuf::from(value)),
                "namespace" => parsed.namespace = Some(value.to_string()),
                "secret" => parsed.secret = Some(value.to_string()),
                other => tracing::warn!(key = other, "Ignoring unknown kubesecret argument"),
            }
        }

        parsed
    }

    /// The kubeconfig to use, falling back to `<home>/.kube/config`
    pub fn resolve_kubeconfig(&self, home: Option<&Path>) -> ProviderResult<PathBuf> {
        if let Some(path) = &self.kubeconfig {
            return Ok(path.clone());
        }

        let home = home.ok_or_else(|| {
            ProviderError::ConfigurationError(
                "kubeconfig not provided and home directory is unknown".to_string(),
            )
        })?;
        let default_config = home.join(".kube").join("config");
        if default_config.is_file() {
            Ok(default_config)
        } else {
            Err(ProviderError::ConfigurationError(format!(
                "kubeconfig not provided and default kubeconfig ({}) not found",
                default_config.display()
            )))
        }
    }
}

/// Provider for Kubernetes secrets
#[derive(Debug, Default)]
pub struct KubeSecretProvider;

impl KubeSecretProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl VariableProvider for KubeSecretProvider {
    fn name(&self) -> &str {
        "kubesecret"
    }

    fn help(&self) -> &str {
        "Provides variables defined in secrets on a Kubernetes cluster, filterable by namespace and by secret name, \
         e.g. kubesecret+kubeconfig:<path>+namespace:<ns>+secret:<name>"
    }

    async fn init(&self) -> ProviderResult<()> {
        if cfg!(feature = "kubernetes") {
            Ok(())
        } else {
            Err(ProviderError::Unavailable(
                "kubesecret requires checkenv to be built with the `kubernetes` feature".to_string(),
            ))
        }
    }

    async fn provide(&self, args: &str) -> ProviderResult<Variables> {
        let args = KubeSecretArgs::parse(args);
        let home = dirs_next::home_dir();
        let kubeconfig = args.resolve_kubeconfig(home.as_deref())?;
        cluster::fetch_secret_data(&args, &kubeconfig).await
    }
}

#[cfg(feature = "kubernetes")]
mod cluster {
    use super::KubeSecretArgs;
    use crate::providers::traits::{ProviderError, ProviderResult, Variables};
    use k8s_openapi::api::core::v1::Secret;
    use ::kube::api::ListParams;
    use ::kube::config::{KubeConfigOptions, Kubeconfig};
    use ::kube::{Api, Client, Config};
    use std::path::Path;

    pub(super) async fn fetch_secret_data(
        args: &KubeSecretArgs,
        kubeconfig: &Path,
    ) -> ProviderResult<Variables> {
        let raw = Kubeconfig::read_from(kubeconfig).map_err(|e| {
            ProviderError::ConfigurationError(format!(
                "failed to read kubeconfig {}: {}",
                kubeconfig.display(),
                e
            ))
        })?;
        let config = Config::from_custom_kubeconfig(raw, &KubeConfigOptions::default())
            .await
            .map_err(|e| ProviderError::ConfigurationError(e.to_string()))?;
        let client =
            Client::try_from(config).map_err(|e| ProviderError::remote("connect", e))?;

        let api: Api<Secret> = match (&args.namespace, &args.secret) {
            (Some(namespace), _) => Api::namespaced(client, namespace),
            (None, Some(_)) => Api::default_namespaced(client),
            (None, None) => Api::all(client),
        };

        let mut vars = Variables::new();
        match &args.secret {
            Some(name) => {
                let secret = api
                    .get(name)
                    .await
                    .map_err(|e| ProviderError::remote("get secret", e))?;
                merge_secret_data(&mut vars, &secret);
            }
            None => {
                let secrets = api
                    .list(&ListParams::default())
                    .await
                    .map_err(|e| ProviderError::remote("list secrets", e))?;
                for secret in &secrets.items {
                    merge_secret_data(&mut vars, secret);
                }
            }
        }

        Ok(vars)
    }

    fn merge_secret_data(vars: &mut Variables, secret: &Secret) {
        if let Some(data) = &secret.data {
            for (key, value) in data {
                vars.insert(key.clone(), String::from_utf8_lossy(&value.0).into_owned());
            }
        }
    }
}

#[cfg(not(feature = "kubernetes"))]
mod cluster {
    use super::KubeSecretArgs;
    use crate::providers::traits::{ProviderError, ProviderResult, Variables};
    use std::path::Path;

    pub(super) async fn fetch_secret_data(
        _args: &KubeSecretArgs,
        _kubeconfig: &Path,
    ) -> ProviderResult<Variables> {
        Err(ProviderError::Unavailable(
            "kubesecret requires checkenv to be built with the `kubernetes` feature".to_string(),
        ))
    }
}
