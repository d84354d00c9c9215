use ignore::WalkBuilder;
use regex::bytes::RegexBuilder;
use std::path::Path;

use super::TextSearch;
use crate::config::Pattern;
use crate::error::Result;
use crate::model::SearchHit;
use crate::util::is_binary;

/// In-process equivalent of `LC_ALL=C grep -rIE`. Walks every file, hidden or
/// ignored, in file-name order, and matches raw line bytes with ASCII classes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeSearch;

impl TextSearch for NativeSearch {
    fn search(&self, repo_root: &Path, pattern: &Pattern, roots: &[String]) -> Result<Vec<SearchHit>> {
        let re = RegexBuilder::new(&pattern.expr).unicode(false).build()?;
        let mut hits = Vec::new();

        for root in roots {
            let base = repo_root.join(root);
            let walker = WalkBuilder::new(&base)
                .standard_filters(false)
                .sort_by_file_name(|a, b| a.cmp(b))
                .build();

            for entry in walker {
                let entry = entry?;
                if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                    continue;
                }

                let data = std::fs::read(entry.path())?;
                if is_binary(&data) {
                    continue;
                }

                let path = display_path(root, &base, entry.path());
                for line in lines(&data) {
                    if re.is_match(line) {
                        hits.push(SearchHit {
                            path: path.clone(),
                            line: String::from_utf8_lossy(line).into_owned(),
                        });
                    }
                }
            }
        }
        Ok(hits)
    }
}

/// Lines as grep sees them: a final newline does not start another line.
fn lines(data: &[u8]) -> impl Iterator<Item = &[u8]> {
    let body = data.strip_suffix(b"\n").unwrap_or(data);
    body.split(|&b| b == b'\n').take(if data.is_empty() { 0 } else { usize::MAX })
}

/// Render `path` the way grep prints it when given `root` on the command line.
fn display_path(root: &str, base: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(base).unwrap_or(path);
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    if parts.is_empty() {
        return root.to_string();
    }
    format!("{}/{}", root.trim_end_matches('/'), parts.join("/"))
}
