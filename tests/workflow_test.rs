use chrono::NaiveDate;
use release_coordinator::config::Config;
use release_coordinator::domain::{BumpChannel, BumpLevel, ReleaseChannel};
use release_coordinator::git::MockRepository;
use release_coordinator::hosting::MockReleaseHost;
use release_coordinator::manifest::{MockVersionStore, MockWebManifest, WebCall};
use release_coordinator::metainfo::entries;
use release_coordinator::metainfo::tree::Document;
use release_coordinator::output::{self, MemorySink};
use release_coordinator::workflow::{Coordinator, Tools};
use release_coordinator::ReleaseError;
use std::fs;
use tempfile::TempDir;

const METAINFO: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<component type="desktop-application">
  <id>rs.ruffle.Ruffle</id>
  <releases>
    <release version="1.2.0" date="2024-01-10">
      <url>https://github.com/ruffle-rs/ruffle/releases/tag/v1.2.0</url>
    </release>
  </releases>
</component>
"#;

struct Fixture {
    config: Config,
    versions: MockVersionStore,
    web: MockWebManifest,
    scm: MockRepository,
    host: MockReleaseHost,
    checkout: TempDir,
}

impl Fixture {
    fn new(version: &str) -> Self {
        let checkout = tempfile::tempdir().unwrap();
        let config = Config::default();
        let metainfo = checkout.path().join(&config.metainfo.path);
        fs::create_dir_all(metainfo.parent().unwrap()).unwrap();
        fs::write(&metainfo, METAINFO).unwrap();

        Fixture {
            config,
            versions: MockVersionStore::new(version),
            web: MockWebManifest::new(),
            scm: MockRepository::new("c0ffee00c0ffee00c0ffee00c0ffee00c0ffee00"),
            host: MockReleaseHost::with_history(["nightly-2024-03-04", "v1.2.0"]),
            checkout,
        }
    }

    fn coordinator(&self) -> Coordinator<'_> {
        let tools = Tools {
            versions: &self.versions,
            web: &self.web,
            scm: &self.scm,
            host: &self.host,
        };
        Coordinator::new(&self.config, tools, march_fifth()).with_root(self.checkout.path())
    }

    fn ledger_versions(&self) -> Vec<String> {
        let path = self.checkout.path().join(&self.config.metainfo.path);
        let document = Document::parse(&fs::read_to_string(path).unwrap()).unwrap();
        entries(&document)
            .unwrap()
            .into_iter()
            .map(|e| e.version)
            .collect()
    }
}

fn march_fifth() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
}

#[test]
fn test_stable_patch_pipeline() {
    let fixture = Fixture::new("1.2.0");
    let mut sink = MemorySink::new();

    let result = fixture
        .coordinator()
        .pipeline(BumpChannel::Stable(BumpLevel::Patch), &mut sink)
        .unwrap();

    assert_eq!(sink.get(output::CURRENT_VERSION), Some("1.2.0"));
    assert_eq!(sink.get(output::VERSION), Some("1.2.1"));
    assert_eq!(sink.get(output::VERSION4), Some("1.2.1.0"));
    assert_eq!(sink.get(output::TAG_NAME), Some("v1.2.1"));
    assert_eq!(sink.get(output::PACKAGE_PREFIX), Some("ruffle-1.2.1"));

    assert_eq!(
        fixture.web.calls(),
        vec![
            WebCall::Install,
            WebCall::SetVersion("1.2.1".to_string()),
            WebCall::Regenerate
        ]
    );

    assert_eq!(fixture.ledger_versions(), vec!["1.2.1", "1.2.0"]);
    let entry = result.ledger_entry.unwrap();
    assert_eq!(entry.date, march_fifth());
    assert_eq!(
        entry.url,
        "https://github.com/ruffle-rs/ruffle/releases/tag/v1.2.1"
    );

    let commits = fixture.scm.commits();
    assert_eq!(commits.len(), 1);
    assert_eq!(commits[0].message, "Release 1.2.1");
    assert_eq!(commits[0].author.name, "RuffleBuild");
    assert_eq!(commits[0].author.email, "ruffle@ruffle.rs");

    assert_eq!(fixture.scm.tags().get("v1.2.1"), Some(&commits[0].id));
    assert_eq!(
        fixture.scm.pushed(),
        vec![("origin".to_string(), "v1.2.1".to_string())]
    );

    let created = fixture.host.created();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].tag, "v1.2.1");
    assert!(!created[0].prerelease);
    assert_eq!(result.release, created[0]);
}

#[test]
fn test_nightly_pipeline() {
    let fixture = Fixture::new("1.2.0");
    let mut sink = MemorySink::new();

    let result = fixture
        .coordinator()
        .pipeline(BumpChannel::Nightly, &mut sink)
        .unwrap();

    assert_eq!(sink.get(output::VERSION), Some("1.3.0-nightly.2024.3.5"));
    assert_eq!(sink.get(output::VERSION4), Some("1.2.0.19787"));
    assert_eq!(sink.get(output::TAG_NAME), Some("nightly-2024-03-05"));
    assert_eq!(
        sink.get(output::PACKAGE_PREFIX),
        Some("ruffle-nightly-2024_03_05")
    );

    // nightlies never touch the ledger
    assert!(result.ledger_entry.is_none());
    assert_eq!(fixture.ledger_versions(), vec!["1.2.0"]);

    assert_eq!(
        fixture.scm.commits()[0].message,
        "Release 1.3.0-nightly.2024.3.5"
    );
    let created = fixture.host.created();
    assert!(created[0].prerelease);
    assert_eq!(created[0].title, "Nightly 2024-03-05");
    assert_eq!(
        created[0].notes_start_tag.as_deref(),
        Some("nightly-2024-03-04")
    );
    assert_eq!(fixture.host.list_limits(), vec![10]);
}

#[test]
fn test_nightly_bump_is_reproducible() {
    let first = Fixture::new("1.2.0");
    let second = Fixture::new("1.2.0");
    let mut first_sink = MemorySink::new();
    let mut second_sink = MemorySink::new();

    let a = first
        .coordinator()
        .bump(BumpChannel::Nightly, &mut first_sink)
        .unwrap();
    let b = second
        .coordinator()
        .bump(BumpChannel::Nightly, &mut second_sink)
        .unwrap();

    assert_eq!(a, b);
    assert_eq!(first_sink.entries(), second_sink.entries());
}

#[test]
fn test_failed_bump_aborts_with_tool_exit_code() {
    let mut fixture = Fixture::new("1.2.0");
    fixture.versions = MockVersionStore::new("1.2.0").failing_writes(101);
    let mut sink = MemorySink::new();

    let err = fixture
        .coordinator()
        .pipeline(BumpChannel::Stable(BumpLevel::Minor), &mut sink)
        .unwrap_err();

    assert_eq!(err.exit_code(), 101);
    assert!(err.to_string().starts_with("bump: "));
    assert!(sink.entries().is_empty());
    assert!(fixture.web.calls().is_empty());
    assert!(fixture.scm.commits().is_empty());
    assert!(fixture.host.created().is_empty());
    assert_eq!(fixture.ledger_versions(), vec!["1.2.0"]);
}

#[test]
fn test_malformed_ledger_aborts_before_commit() {
    let fixture = Fixture::new("1.2.0");
    let path = fixture.checkout.path().join(&fixture.config.metainfo.path);
    fs::write(&path, "<component><id>rs.ruffle.Ruffle</id></component>").unwrap();
    let mut sink = MemorySink::new();

    let err = fixture
        .coordinator()
        .pipeline(BumpChannel::Stable(BumpLevel::Patch), &mut sink)
        .unwrap_err();

    match err {
        ReleaseError::Step { step, source } => {
            assert_eq!(step, "metainfo");
            assert!(matches!(*source, ReleaseError::Structural(_)));
        }
        other => panic!("unexpected error: {}", other),
    }
    assert!(fixture.scm.commits().is_empty());
    assert!(fixture.scm.tags().is_empty());
}

#[test]
fn test_rejected_push_creates_no_release() {
    let mut fixture = Fixture::new("1.2.0");
    fixture.scm = MockRepository::default().rejecting_pushes();
    let mut sink = MemorySink::new();

    let err = fixture
        .coordinator()
        .pipeline(BumpChannel::Stable(BumpLevel::Patch), &mut sink)
        .unwrap_err();

    assert!(err.to_string().starts_with("tag-and-push: "));
    assert!(fixture.host.created().is_empty());
    assert_eq!(sink.get(output::TAG_NAME), None);
}

#[test]
fn test_separate_steps_match_pipeline_outputs() {
    let fixture = Fixture::new("1.2.0");
    let coordinator = fixture.coordinator();
    let mut sink = MemorySink::new();

    coordinator
        .bump(BumpChannel::Stable(BumpLevel::Minor), &mut sink)
        .unwrap();
    coordinator.sync().unwrap();
    coordinator.update_metainfo(None, None).unwrap();
    coordinator.commit().unwrap();
    let tag = coordinator
        .tag_and_push(ReleaseChannel::Stable, &mut sink)
        .unwrap();
    let release = coordinator.release(ReleaseChannel::Stable, &mut sink).unwrap();

    assert_eq!(tag.name, "v1.3.0");
    assert_eq!(release.request.tag, "v1.3.0");
    assert_eq!(release.plan.title, "Release 1.3.0");
    assert_eq!(sink.get(output::VERSION4), Some("1.3.0.0"));
    assert_eq!(sink.get(output::PACKAGE_PREFIX), Some("ruffle-1.3.0"));
    assert_eq!(fixture.ledger_versions(), vec!["1.3.0", "1.2.0"]);
}

#[test]
fn test_release_twice_is_rejected_by_host() {
    let fixture = Fixture::new("1.2.5");
    let coordinator = fixture.coordinator();
    let mut sink = MemorySink::new();

    coordinator.release(ReleaseChannel::Stable, &mut sink).unwrap();
    let err = coordinator
        .release(ReleaseChannel::Stable, &mut sink)
        .unwrap_err();

    assert!(err.to_string().starts_with("release: "));
    assert_eq!(fixture.host.created().len(), 1);
}

#[test]
fn test_missing_manifest_fails_version_read() {
    let mut fixture = Fixture::new("1.2.0");
    fixture.versions = MockVersionStore::missing();

    let err = fixture.coordinator().current_version().unwrap_err();
    assert!(matches!(
        err,
        ReleaseError::Step {
            step: "version",
            ..
        }
    ));
}
