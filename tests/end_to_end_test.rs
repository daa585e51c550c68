use anyhow::Result;
use httpmock::prelude::*;
use link_import::adapters::stores::{LINKS_FILE, STATISTICS_FILE};
use link_import::adapters::{FileLinkStore, FileStatisticsStore};
use link_import::utils::validation::Validate;
use link_import::{build_runner, ImportConfig, ImportError, LinkSource, LocalStorage};
use serde_json::json;
use tempfile::TempDir;

fn config_for(server: &MockServer, data_dir: &str) -> String {
    format!(
        r#"
[import]
send_results = false

[storage]
backend = "file"
data_dir = "{data_dir}"

[notification]
kind = "log"

[[sources]]
kind = "CUSTOM"
endpoint = "{custom}"

[[sources]]
kind = "RSS"
endpoint = "{rss}"
"#,
        custom = server.url("/custom"),
        rss = server.url("/rss"),
    )
}

#[tokio::test]
async fn test_two_runs_append_and_advance_the_checkpoint() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let data_dir = temp_dir.path().to_str().unwrap().replace('\\', "/");

    let server = MockServer::start();
    let mut first_fetch = server.mock(|when, then| {
        when.method(GET).path("/custom");
        then.status(200).json_body(json!([
            {"id": "a", "url": "https://example.com/a", "created_at": "2020-01-01T00:00:00Z"},
            {"id": "b", "url": "https://example.com/b", "created_at": "2020-01-02T00:00:00Z"}
        ]));
    });
    let rss_down = server.mock(|when, then| {
        when.method(GET).path("/rss");
        then.status(503);
    });

    let config = ImportConfig::from_toml_str(&config_for(&server, &data_dir))?;
    config.validate()?;
    let runner = build_runner(&config, None)?;

    let reports = runner.run_all(&config.request()).await;

    first_fetch.assert();
    rss_down.assert();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].source, LinkSource::Custom);
    let first = reports[0].outcome.as_ref().unwrap();
    assert_eq!(first.links_count, 2);
    assert!(matches!(
        reports[1].outcome,
        Err(ImportError::SourceResponse { status: 503, .. })
    ));

    let storage = LocalStorage::new(&data_dir);
    let statistics = FileStatisticsStore::new(storage.clone());
    let stored = statistics.all().await?;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].source, LinkSource::Custom);

    // second run: the source now has to be asked with the checkpoint
    first_fetch.delete();
    let since = first.dt.to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
    let second_fetch = server.mock(|when, then| {
        when.method(GET).path("/custom").query_param("since", &since);
        then.status(200).json_body(json!([]));
    });

    let rerun = build_runner(&config, Some(LinkSource::Custom))?;
    let reports = rerun.run_all(&config.request()).await;

    second_fetch.assert();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].outcome.as_ref().unwrap().links_count, 0);

    let stored = statistics.all().await?;
    assert_eq!(stored.len(), 2);
    assert!(stored[1].dt >= stored[0].dt);

    let links = FileLinkStore::new(storage).all().await?;
    let ids: Vec<_> = links.iter().map(|l| l.external_id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);

    assert!(temp_dir.path().join(STATISTICS_FILE).exists());
    assert!(temp_dir.path().join(LINKS_FILE).exists());
    Ok(())
}

#[tokio::test]
async fn test_dry_run_checkpoint_reads_without_fetching() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let data_dir = temp_dir.path().to_str().unwrap().replace('\\', "/");

    let server = MockServer::start();
    let never_called = server.mock(|when, then| {
        when.method(GET);
        then.status(200).json_body(json!([]));
    });

    let config = ImportConfig::from_toml_str(&config_for(&server, &data_dir))?;
    let runner = build_runner(&config, None)?;

    for engine in runner.engines() {
        assert!(engine.checkpoint().await?.is_none());
    }
    never_called.assert_hits(0);
    Ok(())
}
