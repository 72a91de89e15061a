//! Command-level tests with in-memory providers and captured output

use checkenv_cli::cli::commands::{execute_extract, execute_plugins, execute_show, TAGS_REQUIRED};
use checkenv_cli::{CliError, ExitCode, ExtractOptions, OutputFormat};
use checkenv_core::providers::ssm::{ListPage, ListRequest, Parameter, ParameterStore};
use checkenv_core::providers::{EnvProvider, FileProvider};
use checkenv_core::{
    default_registry, ParameterStoreConfig, ParameterStoreProvider, ProviderError, ProviderRegistry,
    ProviderResult, ResolveError,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

/// Parameter store serving fixed pages and values
#[derive(Default)]
struct FakeStore {
    pages: Vec<Vec<String>>,
    values: HashMap<String, String>,
    fetch_calls: AtomicUsize,
    on_first_fetch: Mutex<Option<oneshot::Sender<()>>>,
}

impl FakeStore {
    /// `count` keys named `/app/KEY_<n>`, served `per_page` at a time
    fn with_keys(count: usize, per_page: usize) -> Self {
        let keys: Vec<String> = (0..count).map(|i| format!("/app/KEY_{:02}", i)).collect();
        let values = keys.iter().map(|k| (k.clone(), format!("value-{}", k))).collect();
        Self {
            pages: keys.chunks(per_page.max(1)).map(<[String]>::to_vec).collect(),
            values,
            ..Self::default()
        }
    }
}

#[async_trait::async_trait]
impl ParameterStore for FakeStore {
    async fn list_keys(&self, request: &ListRequest) -> ProviderResult<ListPage> {
        let index: usize = match &request.next_token {
            Some(token) => token.parse().unwrap(),
            None => 0,
        };
        let keys = self.pages.get(index).cloned().unwrap_or_default();
        let next = (index + 1 < self.pages.len()).then(|| (index + 1).to_string());
        Ok(ListPage::new(keys, next))
    }

    async fn fetch_values(&self, names: &[String]) -> ProviderResult<Vec<Parameter>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(tx) = self.on_first_fetch.lock().unwrap().take() {
            let _ = tx.send(());
        }
        Ok(names
            .iter()
            .filter_map(|n| self.values.get(n).map(|v| Parameter::new(n.clone(), v.clone())))
            .collect())
    }
}

fn ssm_provider(store: Arc<FakeStore>) -> ParameterStoreProvider {
    ParameterStoreProvider::with_store(ParameterStoreConfig::default(), store)
}

fn tags(tags: &str) -> ExtractOptions {
    ExtractOptions {
        tags: Some(tags.to_string()),
        ..ExtractOptions::default()
    }
}

fn local_registry() -> ProviderRegistry {
    ProviderRegistry::builder()
        .register(EnvProvider::new())
        .and_then(|b| b.register(FileProvider::new()))
        .unwrap()
        .build()
}

fn env_file(content: &str) -> tempfile::NamedTempFile {
    let file = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(file.path(), content).unwrap();
    file
}

async fn show(
    registry: &ProviderRegistry,
    specs: &[String],
    format: OutputFormat,
    export: bool,
) -> (Result<ExitCode, CliError>, String) {
    let mut out = Vec::new();
    let result = execute_show(registry, specs, format, export, &mut out).await;
    (result, String::from_utf8(out).unwrap())
}

#[test]
fn test_plugins_lists_builtin_providers() {
    let registry = default_registry(ParameterStoreConfig::default()).unwrap();
    let mut out = Vec::new();

    let code = execute_plugins(&registry, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert_eq!(code, ExitCode::Success);
    assert!(text.starts_with("Available plugins:\naws_ssm\n\t"));
    let names: Vec<&str> = text
        .lines()
        .skip(1)
        .filter(|line| !line.starts_with('\t'))
        .collect();
    assert_eq!(names, vec!["aws_ssm", "env", "file", "kubesecret", "proc"]);
}

#[tokio::test]
async fn test_show_full_and_selective_from_file() {
    let file = env_file("# settings\nPORT=8080\nexport DATABASE_URL=\"postgres://db/app\"\n");
    let spec = format!("file+{}", file.path().display());
    let specs = vec![spec.clone(), format!("{}://PORT,MISSING", spec)];

    let (result, text) = show(&local_registry(), &specs, OutputFormat::Env, false).await;

    assert_eq!(result.unwrap(), ExitCode::Success);
    assert_eq!(
        text,
        format!(
            "# Generated with {spec} - all variables:\n\
             DATABASE_URL=postgres://db/app\n\
             PORT=8080\n\
             # Generated with {spec} - specific variables:\n\
             PORT=8080\n\
             # UNDEFINED: MISSING\n"
        )
    );
}

#[tokio::test]
async fn test_show_export_prefix() {
    let file = env_file("A=1\n");
    let specs = vec![format!("file+{}://A", file.path().display())];

    let (result, text) = show(&local_registry(), &specs, OutputFormat::Env, true).await;

    assert!(result.is_ok());
    assert!(text.ends_with("export A=1\n"));
}

#[tokio::test]
async fn test_show_json_document() {
    let file = env_file("A=1\n");
    let spec = format!("file+{}", file.path().display());
    let specs = vec![format!("{}://A,B", spec)];

    let (result, text) = show(&local_registry(), &specs, OutputFormat::Json, true).await;
    assert!(result.is_ok());

    let doc: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(doc["specific"][0]["spec"], spec.as_str());
    assert_eq!(doc["specific"][0]["variables"][0]["value"], "1");
    assert!(doc["specific"][0]["variables"][1]["value"].is_null());
}

#[tokio::test]
async fn test_show_unregistered_provider_produces_no_output() {
    let specs = vec!["env".to_string(), "vault+secret/app".to_string()];

    let (result, text) = show(&local_registry(), &specs, OutputFormat::Env, false).await;

    let err = result.unwrap_err();
    assert!(matches!(&err, CliError::Resolve(ResolveError::Unregistered(name)) if name == "vault"));
    assert_eq!(err.exit_code(), ExitCode::Usage);
    assert!(text.is_empty());
}

#[tokio::test]
async fn test_show_missing_file_fails() {
    let specs = vec!["file+/nonexistent/checkenv/.env".to_string()];

    let (result, text) = show(&local_registry(), &specs, OutputFormat::Env, false).await;

    let err = result.unwrap_err();
    assert_eq!(err.exit_code(), ExitCode::ProviderError);
    assert!(err.to_string().contains("file+/nonexistent/checkenv/.env"));
    assert!(text.is_empty());
}

#[tokio::test]
async fn test_show_without_specs_is_usage_error() {
    let (result, _) = show(&local_registry(), &[], OutputFormat::Env, false).await;
    assert_eq!(result.unwrap_err().exit_code(), ExitCode::Usage);
}

#[tokio::test]
async fn test_extract_writes_every_chunk() {
    let store = Arc::new(FakeStore::with_keys(12, 5));
    let provider = ssm_provider(store.clone());
    let options = ExtractOptions {
        export: true,
        ..tags("Product:test")
    };
    let mut out = Vec::new();

    let code = execute_extract(&provider, &options, &mut out, std::future::pending())
        .await
        .unwrap();
    let text = String::from_utf8(out).unwrap();

    assert_eq!(code, ExitCode::Success);
    assert_eq!(text.lines().count(), 12);
    assert!(text.starts_with("export /app/KEY_00=value-/app/KEY_00\n"));
    assert_eq!(store.fetch_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_extract_requires_tags() {
    let provider = ssm_provider(Arc::new(FakeStore::with_keys(1, 1)));

    for options in [ExtractOptions::default(), tags("  "), tags("Product")] {
        let mut out = Vec::new();
        let err = execute_extract(&provider, &options, &mut out, std::future::pending())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), TAGS_REQUIRED);
        assert_eq!(err.exit_code(), ExitCode::Usage);
    }
}

#[tokio::test]
async fn test_extract_nothing_to_generate() {
    let provider = ssm_provider(Arc::new(FakeStore::default()));
    let mut out = Vec::new();

    let err = execute_extract(&provider, &tags("Product:none"), &mut out, std::future::pending())
        .await
        .unwrap_err();

    assert!(matches!(err, CliError::NothingToGenerate));
    assert_eq!(err.to_string(), "Nothing to generate, empty slice provided");
    assert!(out.is_empty());
}

#[tokio::test]
async fn test_extract_pagination_limit() {
    let store = Arc::new(FakeStore::with_keys(30, 1));
    let provider = ParameterStoreProvider::with_store(
        ParameterStoreConfig::default().with_max_iterations(3),
        store.clone(),
    );
    let mut out = Vec::new();

    let err = execute_extract(&provider, &tags("Product:test"), &mut out, std::future::pending())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CliError::Provider {
            source: ProviderError::PaginationLimit { limit: 3, .. },
            ..
        }
    ));
    assert_eq!(err.exit_code(), ExitCode::ProviderError);
    assert_eq!(store.fetch_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_extract_outfile_truncate_then_update() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("params.env");
    std::fs::write(&path, "STALE=1\n").unwrap();
    let provider = ssm_provider(Arc::new(FakeStore::with_keys(2, 10)));

    let mut stdout = Vec::new();
    let options = ExtractOptions {
        outfile: Some(path.clone()),
        ..tags("Product:test")
    };
    execute_extract(&provider, &options, &mut stdout, std::future::pending())
        .await
        .unwrap();
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "/app/KEY_00=value-/app/KEY_00\n/app/KEY_01=value-/app/KEY_01\n"
    );
    assert!(stdout.is_empty());

    let options = ExtractOptions {
        update: true,
        ..options
    };
    execute_extract(&provider, &options, &mut stdout, std::future::pending())
        .await
        .unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap().lines().count(), 4);
}

#[tokio::test]
async fn test_extract_interrupted_keeps_written_lines() {
    let (tx, rx) = oneshot::channel();
    let store = Arc::new(FakeStore {
        on_first_fetch: Mutex::new(Some(tx)),
        ..FakeStore::with_keys(25, 25)
    });
    let provider = ssm_provider(store.clone());
    let mut out = Vec::new();

    let shutdown = async {
        let _ = rx.await;
    };
    let code = execute_extract(&provider, &tags("Product:test"), &mut out, shutdown)
        .await
        .unwrap();

    assert_eq!(code, ExitCode::Interrupted);
    assert_eq!(String::from_utf8(out).unwrap().lines().count(), 10);
    assert_eq!(store.fetch_calls.load(Ordering::SeqCst), 1);
}
