//! Fixtures for release archives and release API payloads.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

enum Entry {
    File {
        name: String,
        content: Vec<u8>,
        mode: Option<u32>,
    },
    Dir {
        name: String,
        mode: Option<u32>,
    },
    Symlink {
        name: String,
        target: String,
    },
}

/// Builder for zip archives shaped like release assets.
///
/// Entries are written in insertion order. Names are stored verbatim, so
/// hostile names such as `../escape.txt` can be produced on purpose.
#[derive(Default)]
pub struct ZipFixture {
    entries: Vec<Entry>,
}

impl ZipFixture {
    /// Empty archive.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a regular file.
    pub fn file(mut self, name: &str, content: &[u8]) -> Self {
        self.entries.push(Entry::File {
            name: name.to_string(),
            content: content.to_vec(),
            mode: None,
        });
        self
    }

    /// Add a regular file with explicit unix permission bits.
    pub fn file_with_mode(mut self, name: &str, content: &[u8], mode: u32) -> Self {
        self.entries.push(Entry::File {
            name: name.to_string(),
            content: content.to_vec(),
            mode: Some(mode),
        });
        self
    }

    /// Add a directory entry (name should end with `/`).
    pub fn dir(mut self, name: &str) -> Self {
        self.entries.push(Entry::Dir {
            name: name.to_string(),
            mode: None,
        });
        self
    }

    /// Add a directory entry with explicit unix permission bits.
    pub fn dir_with_mode(mut self, name: &str, mode: u32) -> Self {
        self.entries.push(Entry::Dir {
            name: name.to_string(),
            mode: Some(mode),
        });
        self
    }

    /// Add a symlink entry pointing at `target`.
    pub fn symlink(mut self, name: &str, target: &str) -> Self {
        self.entries.push(Entry::Symlink {
            name: name.to_string(),
            target: target.to_string(),
        });
        self
    }

    /// Serialize the archive to memory.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = ZipWriter::new(std::io::Cursor::new(Vec::new()));
        for entry in &self.entries {
            match entry {
                Entry::File {
                    name,
                    content,
                    mode,
                } => {
                    let mut options = SimpleFileOptions::default();
                    if let Some(mode) = mode {
                        options = options.unix_permissions(*mode);
                    }
                    writer.start_file(name.as_str(), options).expect("start zip entry");
                    writer.write_all(content).expect("write zip entry");
                }
                Entry::Dir {
                    name,
                    mode,
                } => {
                    let mut options = SimpleFileOptions::default();
                    if let Some(mode) = mode {
                        options = options.unix_permissions(*mode);
                    }
                    writer.add_directory(name.as_str(), options).expect("add zip directory");
                }
                Entry::Symlink {
                    name,
                    target,
                } => {
                    writer
                        .add_symlink(name.as_str(), target.as_str(), SimpleFileOptions::default())
                        .expect("add zip symlink");
                }
            }
        }
        writer.finish().expect("finish zip").into_inner()
    }

    /// Write the archive to `path`, creating parent directories.
    pub fn write_to(&self, path: &Path) -> PathBuf {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create fixture directory");
        }
        let mut file = File::create(path).expect("create fixture archive");
        file.write_all(&self.to_bytes()).expect("write fixture archive");
        path.to_path_buf()
    }
}

/// A `releases/latest` payload with `tag` and `(name, url)` assets.
pub fn release_json(tag: &str, assets: &[(&str, &str)]) -> serde_json::Value {
    let assets: Vec<_> = assets
        .iter()
        .map(|(name, url)| {
            serde_json::json!({
                "name": name,
                "browser_download_url": url,
                "content_type": "application/zip",
            })
        })
        .collect();

    serde_json::json!({
        "tag_name": tag,
        "name": format!("Release {tag}"),
        "draft": false,
        "prerelease": false,
        "assets": assets,
    })
}
