use std::fs;
use std::path::PathBuf;
use std::process::{Command, ExitStatus};
use std::time::{SystemTime, UNIX_EPOCH};

pub struct CmdResult {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
    pub log_path: PathBuf,
}

/// `<case>-<unix millis>.log` with anything unusual in the case name replaced.
fn log_file_name(case_name: &str) -> String {
    let stem: String = case_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis());
    format!("{stem}-{millis}.log")
}

fn resolve_bin_path() -> PathBuf {
    if let Ok(path) = std::env::var("CARGO_BIN_EXE_jdash") {
        return PathBuf::from(path);
    }

    let exe_name = if cfg!(windows) { "jdash.exe" } else { "jdash" };
    let fallback = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(PathBuf::from))
        .and_then(|deps| deps.parent().map(PathBuf::from))
        .map(|debug_dir| debug_dir.join(exe_name));

    match fallback {
        Some(path) if path.exists() => path,
        _ => panic!("unable to resolve jdash binary path for integration test"),
    }
}

/// Run `jdash` with `args` and no inherited `JD_*` overrides. stdin and
/// stdout are not terminals, so a session that gets past loading refuses to
/// start instead of blocking.
pub fn run_cli_case(case_name: &str, args: &[&str]) -> CmdResult {
    run_cli_case_with_env(case_name, args, &[])
}

pub fn run_cli_case_with_env(case_name: &str, args: &[&str], env: &[(&str, &str)]) -> CmdResult {
    let root = std::env::temp_dir().join("jdash-test-logs");
    fs::create_dir_all(&root).expect("create temp test log dir");

    let log_path = root.join(log_file_name(case_name));
    let bin_path = resolve_bin_path();

    let mut command = Command::new(&bin_path);
    command.args(args).env("RUST_BACKTRACE", "1");
    std::env::vars()
        .map(|(key, _)| key)
        .filter(|key| key.starts_with("JD_"))
        .for_each(|key| {
            command.env_remove(key);
        });
    command.envs(env.iter().copied());
    let output = command.output().expect("execute jdash command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    let transcript = format!(
        "case={case_name}\nbin={}\nargs={args:?}\nenv={env:?}\nstatus={}\n\
         ----- stdout -----\n{stdout}\n----- stderr -----\n{stderr}\n",
        bin_path.display(),
        output.status,
    );
    fs::write(&log_path, transcript).expect("write test log");

    CmdResult {
        status: output.status,
        stdout,
        stderr,
        log_path,
    }
}
