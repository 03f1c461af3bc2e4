//! Host platform detection for the default system prompt.

use std::env;
use std::fs;

const STYLE: &str = "Provide concise answers and commands. Be direct, no filler. Plain text style. Put commands on their own lines for easy copying. Add short comments to commands if needed. Prefer single-line commands. Be alert to dangerous commands.";

const GENERIC_PROMPT: &str = "You are a Linux CLI assistant for technical user. Provide concise answers and commands. Be direct, no filler. Plain text style (No markdown). Put commands on their own lines for easy copying. Add short comments to commands if needed. Prefer single-line commands. But be alert to dangerous commands.";

/// Returns a system prompt tailored to the platform this binary runs on.
pub fn detect_system_prompt() -> String {
    match env::consts::OS {
        "macos" => format!("You are a macOS CLI assistant for technical user. {STYLE}"),
        "linux" => {
            let os_release = fs::read_to_string("/etc/os-release").ok();
            linux_prompt(os_release.as_deref())
        }
        "windows" => {
            let comspec = env::var("COMSPEC").unwrap_or_default();
            windows_prompt(&comspec)
        }
        _ => GENERIC_PROMPT.to_string(),
    }
}

/// Builds the Linux prompt, naming the distribution when `/etc/os-release` has one.
pub fn linux_prompt(os_release: Option<&str>) -> String {
    let distro = os_release.and_then(pretty_name).unwrap_or("Linux");
    format!("You are a {distro} CLI assistant for technical user. {STYLE}")
}

/// Builds the Windows prompt for whichever shell `COMSPEC` points at.
pub fn windows_prompt(comspec: &str) -> String {
    let shell = if comspec.to_lowercase().contains("cmd") {
        "cmd"
    } else {
        "PowerShell"
    };
    format!(
        "You are a Windows ({shell}) CLI assistant for technical user. Provide concise answers and commands. Be direct, no filler. Use {shell}-style commands where appropriate. Put commands on their own lines for easy copying."
    )
}

fn pretty_name(os_release: &str) -> Option<&str> {
    os_release
        .lines()
        .find_map(|line| line.strip_prefix("PRETTY_NAME="))
        .map(|value| value.trim_matches('"'))
        .filter(|value| !value.is_empty())
}
