//! Best-effort browser launching for the consent page.

use std::process::{Command, Stdio};

/// Platform launcher for a URL.
fn launcher(url: &str) -> Command {
    #[cfg(target_os = "macos")]
    let command = {
        let mut command = Command::new("open");
        command.arg(url);
        command
    };
    #[cfg(target_os = "windows")]
    let command = {
        let mut command = Command::new("cmd");
        command.args(["/C", "start", "", url]);
        command
    };
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let command = {
        let mut command = Command::new("xdg-open");
        command.arg(url);
        command
    };
    command
}

/// Try to open the authorization URL. Returns false when nothing launched;
/// the URL is printed either way.
pub fn try_open_browser(url: &str) -> bool {
    launcher(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|status| status.success())
}
