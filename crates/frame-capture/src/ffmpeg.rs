//! ffmpeg discovery and invocation helpers.

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// Build a `tokio::process::Command` for the capture tool.
///
/// On Windows the `CREATE_NO_WINDOW` flag keeps child processes from
/// flashing console windows.
pub fn command(program: &Path) -> tokio::process::Command {
    #[allow(unused_mut)]
    let mut cmd = tokio::process::Command::new(program);
    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;
        const CREATE_NO_WINDOW: u32 = 0x0800_0000;
        cmd.as_std_mut().creation_flags(CREATE_NO_WINDOW);
    }
    cmd
}

/// Locate the ffmpeg executable.
///
/// An explicit path is trusted as-is. Otherwise `ffmpeg` on `PATH` is
/// probed, then the Chocolatey install locations on Windows.
pub fn resolve_tool(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    let mut candidates = vec![PathBuf::from("ffmpeg")];
    #[cfg(windows)]
    {
        if let Some(local) = std::env::var_os("LOCALAPPDATA") {
            candidates.push(
                Path::new(&local)
                    .join("Chocolatey")
                    .join("bin")
                    .join("ffmpeg.exe"),
            );
        }
        candidates.push(PathBuf::from("C:/ProgramData/chocolatey/bin/ffmpeg.exe"));
    }

    candidates
        .into_iter()
        .find(|candidate| detect_version(candidate).is_some())
}

/// Probe a candidate binary with `-version`; returns its first version
/// line when it runs successfully.
pub fn detect_version(path: &Path) -> Option<String> {
    let mut cmd = std::process::Command::new(path);
    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;
        const CREATE_NO_WINDOW: u32 = 0x0800_0000;
        cmd.creation_flags(CREATE_NO_WINDOW);
    }
    cmd.arg("-version")
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| {
            String::from_utf8(output.stdout)
                .ok()
                .and_then(|text| text.lines().next().map(|line| line.to_string()))
        })
}

/// UTC timestamp label used in capture file names.
pub fn timestamp_label(now: DateTime<Utc>) -> String {
    now.format("%Y%m%d-%H%M%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_label() {
        let ts = Utc.with_ymd_and_hms(2024, 6, 1, 20, 5, 9).unwrap();
        assert_eq!(timestamp_label(ts), "20240601-200509");
    }

    #[test]
    fn test_explicit_path_trusted() {
        let explicit = Path::new("/opt/tools/ffmpeg");
        assert_eq!(
            resolve_tool(Some(explicit)),
            Some(PathBuf::from("/opt/tools/ffmpeg"))
        );
    }

    #[test]
    fn test_detect_version_missing_binary() {
        assert!(detect_version(Path::new("/nonexistent/ffmpeg-binary")).is_none());
    }
}
