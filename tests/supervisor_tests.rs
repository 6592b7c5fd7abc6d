#![cfg(unix)]

mod common;

use std::time::Duration;

use futures_util::StreamExt;
use wiremock::MockServer;

use common::{fake_java, manifest_url, mount_manifest, mount_version};
use mc_server_manager::core::downloader::Downloader;
use mc_server_manager::core::http::build_http_client;
use mc_server_manager::core::launch::{LaunchConfig, ProcessExit, ServerState};
use mc_server_manager::core::server::detect_installed;
use mc_server_manager::{
    ArtifactInstaller, InstalledVersion, ManifestResolver, ServerError, ServerLayout,
    ServerSupervisor, StartOutcome, StopOutcome,
};

const LIMIT: Duration = Duration::from_secs(20);

/// Managed root with a placeholder artifact, plus a supervisor whose
/// "java" runs `script`.
fn installed_supervisor(tmp: &tempfile::TempDir, script: &str) -> (ServerLayout, ServerSupervisor) {
    let layout = ServerLayout::new(tmp.path().join("minecraft_server"));
    std::fs::create_dir_all(layout.root()).unwrap();
    std::fs::write(layout.artifact_path(), b"jar").unwrap();

    let config = LaunchConfig {
        java_path: fake_java(tmp.path(), script),
        ..LaunchConfig::default()
    };
    (layout.clone(), ServerSupervisor::new(layout, config))
}

#[tokio::test]
async fn start_without_artifact_is_not_installed() {
    let tmp = tempfile::tempdir().unwrap();
    let layout = ServerLayout::new(tmp.path());
    let mut supervisor = ServerSupervisor::new(
        layout.clone(),
        LaunchConfig {
            java_path: fake_java(tmp.path(), "exit 0"),
            ..LaunchConfig::default()
        },
    );

    assert_eq!(supervisor.start().await.unwrap(), StartOutcome::NotInstalled);
    assert!(!layout.eula_path().exists());
    assert_eq!(supervisor.state(), ServerState::Stopped);
}

#[tokio::test]
async fn relays_combined_output_in_order() {
    let tmp = tempfile::tempdir().unwrap();
    let (layout, mut supervisor) = installed_supervisor(
        &tmp,
        r#"echo "args: $*"
echo "eula: $(cat eula.txt)"
echo "one"
echo "two" >&2
echo "three""#,
    );

    assert!(matches!(
        supervisor.start().await.unwrap(),
        StartOutcome::Started { .. }
    ));
    let output = supervisor.take_output().expect("output of the launch");
    assert!(supervisor.take_output().is_none());

    let lines: Vec<String> = tokio::time::timeout(LIMIT, output.into_stream().collect())
        .await
        .unwrap();

    assert_eq!(
        lines,
        vec![
            "args: -Xmx2G -Xms2G -jar server.jar nogui",
            "eula: eula=true",
            "one",
            "two",
            "three",
        ]
    );
    assert_eq!(std::fs::read_to_string(layout.eula_path()).unwrap(), "eula=true\n");

    // The stream only ends after the exit was observed.
    assert_eq!(supervisor.state(), ServerState::Stopped);
    assert_eq!(supervisor.stop(), StopOutcome::NoProcess);
}

#[tokio::test]
async fn second_start_is_rejected_while_running() {
    let tmp = tempfile::tempdir().unwrap();
    let (_layout, mut supervisor) = installed_supervisor(&tmp, "echo up\nexec sleep 30");

    let StartOutcome::Started { pid } = supervisor.start().await.unwrap() else {
        panic!("server did not start");
    };
    assert_eq!(supervisor.state(), ServerState::Running);
    assert_eq!(
        supervisor.start().await.unwrap(),
        StartOutcome::AlreadyRunning { pid }
    );
    assert_eq!(supervisor.status().map(|s| s.pid), Some(pid));

    let mut output = supervisor.take_output().unwrap();
    assert_eq!(
        tokio::time::timeout(LIMIT, output.next_line()).await.unwrap(),
        Some("up".to_string())
    );

    assert_eq!(supervisor.stop(), StopOutcome::Stopped);
    assert_eq!(supervisor.state(), ServerState::Stopped);
    assert_eq!(supervisor.stop(), StopOutcome::NoProcess);

    // Terminated: the stream drains and ends.
    assert_eq!(
        tokio::time::timeout(LIMIT, output.next_line()).await.unwrap(),
        None
    );
    assert!(output.exit().is_some());
}

#[tokio::test]
async fn stop_after_natural_exit_is_stopped() {
    let tmp = tempfile::tempdir().unwrap();
    let (_layout, mut supervisor) = installed_supervisor(&tmp, "echo bye");

    supervisor.start().await.unwrap();
    let mut output = supervisor.take_output().unwrap();
    while tokio::time::timeout(LIMIT, output.next_line())
        .await
        .unwrap()
        .is_some()
    {}

    assert_eq!(supervisor.stop(), StopOutcome::Stopped);
    assert_eq!(supervisor.stop(), StopOutcome::NoProcess);
}

#[tokio::test]
async fn stop_terminates_the_live_process_with_sigterm() {
    use std::os::unix::process::ExitStatusExt;

    let tmp = tempfile::tempdir().unwrap();
    let (_layout, mut supervisor) = installed_supervisor(&tmp, "exec sleep 30");

    supervisor.start().await.unwrap();
    let mut output = supervisor.take_output().unwrap();
    assert_eq!(supervisor.stop(), StopOutcome::Stopped);

    let drained = tokio::time::timeout(Duration::from_secs(10), async {
        while output.next_line().await.is_some() {}
    })
    .await;
    assert!(drained.is_ok(), "output did not end after stop");

    match output.exit() {
        Some(ProcessExit::Exited(status)) => {
            assert_eq!(status.signal(), Some(libc::SIGTERM));
        }
        other => panic!("unexpected exit: {other:?}"),
    }
}

#[tokio::test]
async fn stop_without_process_is_no_process() {
    let tmp = tempfile::tempdir().unwrap();
    let (_layout, mut supervisor) = installed_supervisor(&tmp, "exit 0");

    assert_eq!(supervisor.stop(), StopOutcome::NoProcess);
    assert!(supervisor.status().is_none());
}

#[tokio::test]
async fn spawn_failure_retains_no_handle() {
    let tmp = tempfile::tempdir().unwrap();
    let layout = ServerLayout::new(tmp.path());
    std::fs::write(layout.artifact_path(), b"jar").unwrap();
    let mut supervisor = ServerSupervisor::new(
        layout,
        LaunchConfig {
            java_path: tmp.path().join("no-java-here"),
            ..LaunchConfig::default()
        },
    );

    assert!(matches!(
        supervisor.start().await,
        Err(ServerError::LaunchFailed(_))
    ));
    assert_eq!(supervisor.state(), ServerState::Stopped);
    assert_eq!(supervisor.stop(), StopOutcome::NoProcess);
    assert!(matches!(
        supervisor.start().await,
        Err(ServerError::LaunchFailed(_))
    ));
}

#[tokio::test]
async fn restart_after_stop_launches_new_process() {
    let tmp = tempfile::tempdir().unwrap();
    let (_layout, mut supervisor) = installed_supervisor(&tmp, "exec sleep 30");

    let StartOutcome::Started { pid: first } = supervisor.start().await.unwrap() else {
        panic!("first start failed");
    };
    let mut output = supervisor.take_output().unwrap();
    assert_eq!(supervisor.stop(), StopOutcome::Stopped);
    assert_eq!(
        tokio::time::timeout(LIMIT, output.next_line()).await.unwrap(),
        None
    );

    let StartOutcome::Started { pid: second } = supervisor.start().await.unwrap() else {
        panic!("second start failed");
    };
    assert_ne!(first, second);
    assert_eq!(supervisor.stop(), StopOutcome::Stopped);
}

#[tokio::test]
async fn installed_version_can_be_started() {
    let server = MockServer::start().await;
    mount_manifest(&server, &["1.20.1"]).await;
    mount_version(&server, "1.20.1", b"jar bytes").await;

    let tmp = tempfile::tempdir().unwrap();
    let layout = ServerLayout::new(tmp.path().join("minecraft_server"));
    let client = build_http_client().unwrap();
    let installer = ArtifactInstaller::new(
        ManifestResolver::new(client.clone(), manifest_url(&server)),
        Downloader::new(client),
        layout.clone(),
    );
    let mut supervisor = ServerSupervisor::new(
        layout.clone(),
        LaunchConfig {
            java_path: fake_java(tmp.path(), "echo \"jar: $(cat server.jar)\""),
            ..LaunchConfig::default()
        },
    );

    assert_eq!(supervisor.start().await.unwrap(), StartOutcome::NotInstalled);

    installer.install_version("1.20.1").await.unwrap();
    assert_eq!(
        detect_installed(&layout).await,
        InstalledVersion::Version("1.20.1".into())
    );

    assert!(matches!(
        supervisor.start().await.unwrap(),
        StartOutcome::Started { .. }
    ));
    let lines: Vec<String> = tokio::time::timeout(
        LIMIT,
        supervisor.take_output().unwrap().into_stream().collect(),
    )
    .await
    .unwrap();
    assert_eq!(lines, vec!["jar: jar bytes"]);
}
