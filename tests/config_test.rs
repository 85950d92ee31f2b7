//! Integration tests for configuration loading.

use std::fs;
use std::path::Path;
use streamforge::config::{load_config, load_config_or_default, Config};
use streamforge::manifest::{self, Format, Manifest};
use tempfile::tempdir;

fn write_config(dir: &Path, content: &str) -> std::path::PathBuf {
    let path = dir.join("streamforge.toml");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn load_full_config() {
    let temp = tempdir().unwrap();
    let path = write_config(
        temp.path(),
        r#"
[parser]
ignore_tags = ["EXT-X-ALLOW-CACHE"]
base_url = "https://cdn.example/live/index.m3u8"
base_time = 12.5
chunk_size = 1024

[define]
token = "s3cr3t"
cdn = "https://edge.example"
"#,
    );

    let config = load_config(&path).unwrap();
    assert_eq!(config.parser.ignore_tags, vec!["EXT-X-ALLOW-CACHE"]);
    assert_eq!(
        config.parser.base_url.as_deref(),
        Some("https://cdn.example/live/index.m3u8")
    );
    assert_eq!(config.parser.base_time, 12.5);
    assert_eq!(config.parser.chunk_size, Some(1024));
    assert_eq!(config.define.len(), 2);
    assert_eq!(config.define["token"], "s3cr3t");
}

#[test]
fn empty_file_gives_defaults() {
    let temp = tempdir().unwrap();
    let path = write_config(temp.path(), "");
    assert_eq!(load_config(&path).unwrap(), Config::default());
}

#[test]
fn explicit_path_wins() {
    let temp = tempdir().unwrap();
    let path = write_config(temp.path(), "[parser]\nbase_time = 3.0\n");
    let config = load_config_or_default(Some(&path)).unwrap();
    assert_eq!(config.parser.base_time, 3.0);
}

#[test]
fn missing_file_is_an_error() {
    let temp = tempdir().unwrap();
    let err = load_config(&temp.path().join("absent.toml")).unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}

#[test]
fn invalid_values_are_rejected() {
    let temp = tempdir().unwrap();
    for content in [
        "[parser]\nchunk_size = 0\n",
        "[parser]\nbase_url = \"not a url\"\n",
        "[parser]\nignore_tags = [\"\"]\n",
        "[define]\n\"{$x}\" = \"y\"\n",
    ] {
        let path = write_config(temp.path(), content);
        assert!(load_config(&path).is_err(), "accepted: {content}");
    }
}

#[test]
fn config_drives_parsing() {
    let temp = tempdir().unwrap();
    let path = write_config(
        temp.path(),
        r#"
[parser]
ignore_tags = ["EXT-X-VERSION"]
base_url = "https://origin.example/hls/index.m3u8"
base_time = 100.0

[define]
cdn = "https://edge.example"
"#,
    );
    let config = load_config(&path).unwrap();
    let input = b"#EXTM3U\n#EXT-X-VERSION:9\n#EXT-X-DEFINE:IMPORT=\"cdn\"\n#EXTINF:4,\n{$cdn}/a.ts\n";

    let options = manifest::parse_options(&config, None, Path::new("index.m3u8")).unwrap();
    let report = manifest::parse(input, Format::Hls, &config.parser, &options, Some(5)).unwrap();
    let Manifest::Hls(playlist) = report.manifest else {
        panic!("expected an HLS playlist");
    };
    assert_eq!(playlist.version, None);
    assert_eq!(playlist.segments[0].resolved_uri, "https://edge.example/a.ts");
    assert_eq!(playlist.segments[0].start_time, 100.0);
    assert_eq!(report.diagnostics.len(), 1);
}
