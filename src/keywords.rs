use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use std::time::Instant;
use tracing::info;

// Include default keywords at compile time
const DEFAULT_KEYWORDS_BYTES: &[u8] = include_bytes!("../default_sensitive_keywords.txt");

pub const DEFAULT_KEYWORD_FILE: &str = "sensitive_keywords.txt";

/// One keyword per line, lowercased. Blank lines and `#` comments are skipped.
pub fn parse_keywords(content: &str) -> Vec<String> {
    let mut keywords: Vec<String> = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let keyword = line.to_lowercase();
        if !keywords.contains(&keyword) {
            keywords.push(keyword);
        }
    }
    keywords
}

pub fn default_keywords() -> Result<Vec<String>> {
    let content = std::str::from_utf8(DEFAULT_KEYWORDS_BYTES)
        .context("Failed to decode embedded default keywords")?;
    Ok(parse_keywords(content))
}

pub fn load_keywords(keyword_file_path: Option<&Path>) -> Result<Vec<String>> {
    load_keywords_from(keyword_file_path, Path::new(DEFAULT_KEYWORD_FILE))
}

/// Resolves the keyword list: an explicit file, else `default_file` if it
/// exists and is non-empty, else the embedded defaults.
pub fn load_keywords_from(keyword_file_path: Option<&Path>, default_file: &Path) -> Result<Vec<String>> {
    let start_time = Instant::now();

    let keywords = if let Some(path) = keyword_file_path {
        info!(action = "load", component = "keyword_file", file_path = ?path, "Loading keywords from specified file");
        if !path.exists() {
            anyhow::bail!("Keyword file not found: {:?}", path);
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read keyword file {:?}", path))?;
        let keywords = parse_keywords(&content);
        if keywords.is_empty() {
            anyhow::bail!("Keyword file {:?} contains no keywords", path);
        }
        keywords
    } else {
        let mut keywords = Vec::new();
        if default_file.exists() {
            info!(action = "load", component = "default_keyword_file", file_path = ?default_file, "Loading keywords from default file");
            let content = fs::read_to_string(default_file)
                .with_context(|| format!("Failed to read keyword file {:?}", default_file))?;
            keywords = parse_keywords(&content);
        }

        if keywords.is_empty() {
            info!(
                action = "load",
                component = "embedded_keywords",
                "Using embedded default keywords"
            );
            keywords = default_keywords()?;
        }
        keywords
    };

    info!(
        action = "complete",
        component = "keyword_loading",
        keyword_count = keywords.len(),
        duration_ms = start_time.elapsed().as_millis(),
        "Loaded sensitive keywords"
    );
    Ok(keywords)
}

pub fn init_default_keywords() -> Result<()> {
    init_default_keywords_at(Path::new(DEFAULT_KEYWORD_FILE))?;
    println!("Created {} with default keywords", DEFAULT_KEYWORD_FILE);
    Ok(())
}

pub fn init_default_keywords_at(target: &Path) -> Result<()> {
    if target.exists() {
        anyhow::bail!(
            "{} already exists. Remove it first if you want to reinitialize.",
            target.display()
        );
    }

    let default_content = std::str::from_utf8(DEFAULT_KEYWORDS_BYTES)
        .context("Failed to decode embedded default keywords")?;

    fs::write(target, default_content)
        .with_context(|| format!("Failed to write {:?}", target))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_skips_comments_and_dedups() {
        let keywords = parse_keywords("# header\nAdmin\n\n  token \nadmin\n#skip\n");
        assert_eq!(keywords, vec!["admin".to_string(), "token".to_string()]);
    }

    #[test]
    fn test_embedded_defaults() {
        let keywords = default_keywords().unwrap();
        for expected in ["admin", "password", "id_rsa", "wp-login.php", "assets.", "_next"] {
            assert!(keywords.iter().any(|k| k == expected), "missing {}", expected);
        }
        assert!(keywords.iter().all(|k| !k.starts_with('#')));
    }

    #[test]
    fn test_explicit_file_wins() {
        let tmp = TempDir::new().unwrap();
        let custom = tmp.path().join("custom.txt");
        fs::write(&custom, "internal\nstaging-only\n").unwrap();

        let keywords = load_keywords_from(Some(custom.as_path()), &tmp.path().join("absent.txt")).unwrap();
        assert_eq!(keywords, vec!["internal".to_string(), "staging-only".to_string()]);
    }

    #[test]
    fn test_explicit_missing_file_errors() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("missing.txt");
        assert!(load_keywords_from(Some(missing.as_path()), &tmp.path().join("absent.txt")).is_err());
    }

    #[test]
    fn test_explicit_empty_file_errors() {
        let tmp = TempDir::new().unwrap();
        let empty = tmp.path().join("empty.txt");
        fs::write(&empty, "# nothing here\n").unwrap();
        assert!(load_keywords_from(Some(empty.as_path()), &tmp.path().join("absent.txt")).is_err());
    }

    #[test]
    fn test_default_file_then_embedded_fallback() {
        let tmp = TempDir::new().unwrap();
        let default_file = tmp.path().join(DEFAULT_KEYWORD_FILE);

        let embedded = load_keywords_from(None, &default_file).unwrap();
        assert_eq!(embedded, default_keywords().unwrap());

        fs::write(&default_file, "onlythis\n").unwrap();
        let from_file = load_keywords_from(None, &default_file).unwrap();
        assert_eq!(from_file, vec!["onlythis".to_string()]);
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join(DEFAULT_KEYWORD_FILE);

        init_default_keywords_at(&target).unwrap();
        let written = fs::read_to_string(&target).unwrap();
        assert_eq!(parse_keywords(&written), default_keywords().unwrap());

        assert!(init_default_keywords_at(&target).is_err());
    }
}
