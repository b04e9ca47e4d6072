use std::io::Write;
use std::path::Path;
use std::process::{Child, Command, Output, Stdio};
use std::time::{Duration, Instant};

fn fixture(name: &str) -> String {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
        .display()
        .to_string()
}

fn binary(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_housing_trends"));
    cmd.current_dir(dir)
        .env("RUST_LOG", "off")
        .stdout(Stdio::piped())
        .stderr(Stdio::null());
    cmd
}

/// Wait for the menu to leave on its own; a hung process is killed and fails.
fn wait_for_exit(mut child: Child) -> Output {
    let deadline = Instant::now() + Duration::from_secs(10);
    loop {
        if child.try_wait().expect("poll child").is_some() {
            return child.wait_with_output().expect("collect output");
        }
        if Instant::now() > deadline {
            child.kill().ok();
            panic!("menu did not exit after stdin closed");
        }
        std::thread::sleep(Duration::from_millis(50));
    }
}

#[test]
fn test_menu_exits_on_closed_stdin() {
    let dir = tempfile::tempdir().unwrap();
    let child = binary(dir.path()).stdin(Stdio::null()).spawn().unwrap();
    let out = wait_for_exit(child);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Exiting the program."));
    assert_eq!(stdout.matches("Enter choice:").count(), 1);
}

#[test]
fn test_menu_exits_after_last_piped_choice() {
    let dir = tempfile::tempdir().unwrap();
    let mut child = binary(dir.path()).stdin(Stdio::piped()).spawn().unwrap();
    {
        let mut stdin = child.stdin.take().unwrap();
        stdin.write_all(b"9\n").unwrap();
    }
    let out = wait_for_exit(child);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Invalid choice."));
    assert_eq!(stdout.matches("Enter choice:").count(), 2);
}

#[test]
fn test_back_to_menu_prompt_exits_on_closed_stdin() {
    let dir = tempfile::tempdir().unwrap();
    let mut child = binary(dir.path())
        .args(["--all-homes", &fixture("all_homes.csv")])
        .args(["--sfr-only", &fixture("sfr_only.csv")])
        .stdin(Stdio::piped())
        .spawn()
        .unwrap();
    {
        let mut stdin = child.stdin.take().unwrap();
        stdin.write_all(b"1\n2\n").unwrap();
    }
    let out = wait_for_exit(child);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert_eq!(stdout.matches("Back to Report Selection").count(), 1);
    assert!(dir.path().join("summary.json").exists());
}

#[test]
fn test_batch_writes_affordability_reports() {
    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().join("out");
    let child = binary(dir.path())
        .args(["--all-homes", &fixture("all_homes.csv")])
        .args(["--sfr-only", &fixture("sfr_only.csv")])
        .args(["--homeowner", &fixture("homeowner.csv")])
        .args(["--renter", &fixture("renter.csv")])
        .arg("--out-dir")
        .arg(&out_dir)
        .arg("--batch")
        .stdin(Stdio::null())
        .spawn()
        .unwrap();
    let out = wait_for_exit(child);
    assert!(out.status.success());

    for file in ["rank_increase.csv", "rank_decrease.csv", "aligned_series.csv", "summary.json"] {
        assert!(out_dir.join(file).exists(), "{file} missing");
    }
    // Los Angeles has the widest gap; Dallas has no renter row.
    let least = std::fs::read_to_string(out_dir.join("affordability_least.csv")).unwrap();
    let mut lines = least.lines();
    assert_eq!(lines.next(), Some("Rank,Region,Homeowner,Renter,Gap"));
    assert!(lines.next().unwrap().contains("Los Angeles, CA"));
    assert!(!least.contains("Dallas, TX"));

    let most = std::fs::read_to_string(out_dir.join("affordability_most.csv")).unwrap();
    assert!(most.lines().nth(1).unwrap().contains("Austin, TX"));
}
