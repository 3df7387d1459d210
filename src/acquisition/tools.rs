// yt-dlp discovery - Python module first, native binary second

use serde::{Deserialize, Serialize};
use std::process::Command;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToolType {
    /// `python3 -m yt_dlp`
    PythonModule,
    /// Native `yt-dlp` executable
    Binary,
}

impl ToolType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolType::PythonModule => "python -m yt_dlp",
            ToolType::Binary => "yt-dlp",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub tool_type: ToolType,
    pub version: Option<String>,
    pub path: Option<String>,
    pub is_available: bool,
}

/// A runnable yt-dlp invocation prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YtDlpCommand {
    pub tool_type: ToolType,
    program: String,
    prefix: Vec<String>,
}

impl YtDlpCommand {
    pub fn python(interpreter: impl Into<String>) -> Self {
        Self {
            tool_type: ToolType::PythonModule,
            program: interpreter.into(),
            prefix: vec!["-m".to_string(), "yt_dlp".to_string()],
        }
    }

    pub fn binary(path: impl Into<String>) -> Self {
        Self {
            tool_type: ToolType::Binary,
            program: path.into(),
            prefix: Vec::new(),
        }
    }

    /// Resolve the best available invocation, if any
    pub fn detect(python_override: Option<&str>) -> Option<Self> {
        let manager = ToolManager::new(python_override);
        if let Some(python) = manager.find_python_with_module() {
            return Some(Self::python(python));
        }
        manager.find_binary().map(Self::binary)
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Full argument list: module prefix followed by `rest`
    pub fn args(&self, rest: Vec<String>) -> Vec<String> {
        let mut args = self.prefix.clone();
        args.extend(rest);
        args
    }
}

pub struct ToolManager {
    python_override: Option<String>,
}

impl ToolManager {
    pub fn new(python_override: Option<&str>) -> Self {
        Self {
            python_override: python_override.map(str::to_string),
        }
    }

    pub fn get_all_tools(&self) -> Vec<ToolInfo> {
        let python = self.find_python_with_module();
        let python_version = python
            .as_deref()
            .and_then(|py| get_version(py, &["-m", "yt_dlp", "--version"]));

        let binary = self.find_binary();
        let binary_version = binary.as_deref().and_then(|b| get_version(b, &["--version"]));

        vec![
            ToolInfo {
                name: ToolType::PythonModule.as_str().to_string(),
                tool_type: ToolType::PythonModule,
                version: python_version,
                is_available: python.is_some(),
                path: python,
            },
            ToolInfo {
                name: ToolType::Binary.as_str().to_string(),
                tool_type: ToolType::Binary,
                version: binary_version,
                is_available: binary.is_some(),
                path: binary,
            },
        ]
    }

    /// Interpreter that can `import yt_dlp`
    fn find_python_with_module(&self) -> Option<String> {
        let mut candidates: Vec<String> = Vec::new();
        if let Some(custom) = &self.python_override {
            candidates.push(custom.clone());
        }
        candidates.extend(
            ["python3", "/opt/homebrew/bin/python3", "/usr/local/bin/python3"]
                .iter()
                .map(|s| s.to_string()),
        );

        candidates
            .into_iter()
            .find(|py| matches!(Command::new(py).args(["-c", "import yt_dlp"]).output(), Ok(out) if out.status.success()))
    }

    fn find_binary(&self) -> Option<String> {
        let common_paths = [
            "/opt/homebrew/bin/yt-dlp", // Homebrew on Apple Silicon
            "/usr/local/bin/yt-dlp",    // Homebrew on Intel Mac
            "/usr/bin/yt-dlp",          // System installation
        ];

        for path in common_paths {
            if std::path::Path::new(path).exists() {
                return Some(path.to_string());
            }
        }

        // Try PATH
        if let Ok(output) = Command::new("which").arg("yt-dlp").output() {
            if output.status.success() {
                let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !path.is_empty() {
                    return Some(path);
                }
            }
        }

        None
    }
}

fn get_version(program: &str, args: &[&str]) -> Option<String> {
    match Command::new(program).args(args).output() {
        Ok(output) if output.status.success() => {
            Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_python_args_prefix() {
        let cmd = YtDlpCommand::python("python3");
        assert_eq!(cmd.program(), "python3");
        assert_eq!(
            cmd.args(vec!["--version".to_string()]),
            vec!["-m", "yt_dlp", "--version"]
        );
    }

    #[test]
    fn test_binary_args_passthrough() {
        let cmd = YtDlpCommand::binary("/usr/bin/yt-dlp");
        assert_eq!(cmd.tool_type, ToolType::Binary);
        assert_eq!(cmd.args(vec!["URL".to_string()]), vec!["URL"]);
    }
}
