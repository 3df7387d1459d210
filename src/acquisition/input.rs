// Input list loading - plain text (one URL per line) or a JSON array
//
// JSON entries are either bare URLs or `[url, label]` pairs. The label only
// travels into log lines.

use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;

use super::errors::AcquisitionError;

/// One input URL with an optional human label (e.g. a country name)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputLink {
    pub url: String,
    pub label: Option<String>,
}

impl InputLink {
    pub fn labeled(url: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            label: Some(label.into()),
        }
    }
}

impl From<String> for InputLink {
    fn from(url: String) -> Self {
        Self { url, label: None }
    }
}

impl From<&str> for InputLink {
    fn from(url: &str) -> Self {
        Self::from(url.to_string())
    }
}

impl fmt::Display for InputLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{} [{}]", self.url, label),
            None => f.write_str(&self.url),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonEntry {
    Url(String),
    Labeled(String, String),
}

impl JsonEntry {
    fn into_link(self) -> InputLink {
        match self {
            Self::Url(url) => InputLink::from(url.trim()),
            Self::Labeled(url, label) => {
                let label = label.trim();
                InputLink {
                    url: url.trim().to_string(),
                    label: (!label.is_empty()).then(|| label.to_string()),
                }
            }
        }
    }
}

/// Read the URL list. A missing file or an empty list is fatal.
pub fn load_links(path: &Path) -> Result<Vec<InputLink>, AcquisitionError> {
    if !path.exists() {
        return Err(AcquisitionError::InputNotFound(path.to_path_buf()));
    }

    let raw = fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .map_or(false, |e| e.eq_ignore_ascii_case("json"));

    let links = if is_json {
        serde_json::from_str::<Vec<JsonEntry>>(&raw)?
            .into_iter()
            .map(JsonEntry::into_link)
            .filter(|link| !link.url.is_empty())
            .collect()
    } else {
        parse_lines(&raw)
    };

    if links.is_empty() {
        return Err(AcquisitionError::NoInput(format!(
            "{} contains no URLs",
            path.display()
        )));
    }
    Ok(links)
}

fn parse_lines(raw: &str) -> Vec<InputLink> {
    raw.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(InputLink::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input_links.txt");
        fs::write(
            &path,
            "# channels\nhttps://www.youtube.com/channel/XYZ\n\n  https://youtu.be/abc123  \n",
        )
        .unwrap();

        assert_eq!(
            load_links(&path).unwrap(),
            vec![
                InputLink::from("https://www.youtube.com/channel/XYZ"),
                InputLink::from("https://youtu.be/abc123")
            ]
        );
    }

    #[test]
    fn test_json_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("links.json");
        fs::write(&path, r#"["https://youtu.be/a", " ", "https://youtu.be/b"]"#).unwrap();
        assert_eq!(load_links(&path).unwrap().len(), 2);
    }

    #[test]
    fn test_json_labeled_pairs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accounts.json");
        fs::write(
            &path,
            r#"[
                ["https://www.youtube.com/channel/UC1", "Japan"],
                "https://youtu.be/b",
                ["https://www.youtube.com/@kr", " "]
            ]"#,
        )
        .unwrap();

        let links = load_links(&path).unwrap();
        assert_eq!(
            links,
            vec![
                InputLink::labeled("https://www.youtube.com/channel/UC1", "Japan"),
                InputLink::from("https://youtu.be/b"),
                InputLink::from("https://www.youtube.com/@kr"),
            ]
        );
        assert_eq!(links[0].to_string(), "https://www.youtube.com/channel/UC1 [Japan]");
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_links(&dir.path().join("absent.txt")).unwrap_err();
        assert!(matches!(err, AcquisitionError::InputNotFound(_)));
    }

    #[test]
    fn test_empty_list_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input_links.txt");
        fs::write(&path, "\n# nothing here\n").unwrap();
        assert!(matches!(load_links(&path), Err(AcquisitionError::NoInput(_))));
    }
}
