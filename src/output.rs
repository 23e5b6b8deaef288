use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::error::Result;

/// Timestamp layout shared by every output file name.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// `<tag>_<YYYYMMDD_HHMMSS>.<ext>`
pub fn artifact_file_name(tag: &str, timestamp: NaiveDateTime, ext: &str) -> String {
    format!("{tag}_{}.{ext}", timestamp.format(TIMESTAMP_FORMAT))
}

/// Hands out output paths inside one directory.
///
/// Names are only second-granular, so a path already issued during this run
/// gets a `_2`, `_3`, ... suffix instead of overwriting the earlier file.
#[derive(Debug)]
pub struct FileNamer {
    dir: PathBuf,
    issued: HashSet<PathBuf>,
}

impl FileNamer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            issued: HashSet::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the output directory if needed.
    pub fn ensure_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    pub fn next_path(&mut self, tag: &str, timestamp: NaiveDateTime, ext: &str) -> PathBuf {
        let mut path = self.dir.join(artifact_file_name(tag, timestamp, ext));
        let mut n = 2;
        while self.issued.contains(&path) {
            let stamp = timestamp.format(TIMESTAMP_FORMAT);
            path = self.dir.join(format!("{tag}_{stamp}_{n}.{ext}"));
            n += 1;
        }
        self.issued.insert(path.clone());
        path
    }
}

/// What a written file contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Chart,
    Report,
}

/// A file written during the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub path: PathBuf,
}

impl Artifact {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .and_then(|d| d.and_hms_opt(h, m, s))
            .expect("valid timestamp")
    }

    #[test]
    fn file_name_follows_convention() {
        assert_eq!(
            artifact_file_name("heatmap", at(14, 5, 9), "png"),
            "heatmap_20240309_140509.png"
        );
    }

    #[test]
    fn different_tags_same_second_differ() {
        let mut namer = FileNamer::new("plots");
        let a = namer.next_path("line_plot", at(1, 2, 3), "png");
        let b = namer.next_path("bar_chart", at(1, 2, 3), "png");
        assert_ne!(a, b);
    }

    #[test]
    fn same_tag_different_seconds_differ() {
        let mut namer = FileNamer::new("plots");
        let a = namer.next_path("line_plot", at(1, 2, 3), "png");
        let b = namer.next_path("line_plot", at(1, 2, 4), "png");
        assert_ne!(a, b);
    }

    #[test]
    fn repeated_request_gets_suffix() {
        let mut namer = FileNamer::new("plots");
        let a = namer.next_path("report", at(1, 2, 3), "txt");
        let b = namer.next_path("report", at(1, 2, 3), "txt");
        let c = namer.next_path("report", at(1, 2, 3), "txt");
        assert_eq!(a, Path::new("plots/report_20240309_010203.txt"));
        assert_eq!(b, Path::new("plots/report_20240309_010203_2.txt"));
        assert_eq!(c, Path::new("plots/report_20240309_010203_3.txt"));
    }
}
