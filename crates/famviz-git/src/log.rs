//! Rename-following history of a single file.
//!
//! libgit2 has no equivalent of `git log --follow`, and `%aN` applies the
//! repository's `.mailmap`, so history queries go through the `git` binary.

use std::path::Path;
use std::process::Command;

use chrono::{DateTime, FixedOffset};
use tracing::{debug, warn};

use crate::{GitError, GitResult};

/// Header format of one commit: sha, mailmapped author, ISO author date.
const HISTORY_FORMAT: &str = "--format=%H<>%aN<>%aI<>";

/// Field separator in [`HISTORY_FORMAT`].
const SEPARATOR: &str = "<>";

/// One commit that touched the tracked file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// The commit hash.
    pub sha: String,

    /// The mailmap-normalized author name.
    pub author: String,

    /// The author date.
    pub date: DateTime<FixedOffset>,

    /// The file's path at this commit (differs across renames).
    pub path: String,
}

/// Lists the commits that touched a file.
pub trait HistoryWalker {
    /// Returns the raw `git log --name-only` output for `file`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the log cannot be produced.
    fn raw_log(&self, repo_dir: &Path, file: &str) -> GitResult<String>;

    /// Returns the parsed history of `file`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the log cannot be produced.
    fn walk(&self, repo_dir: &Path, file: &str) -> GitResult<Vec<LogEntry>> {
        Ok(parse_log(&self.raw_log(repo_dir, file)?))
    }
}

/// Parses the output of `git log --format=%H<>%aN<>%aI<> --name-only`.
///
/// Every commit is a header line followed by a blank line and the changed
/// path. The output ends with an empty line; that sentinel and the blank
/// separators never produce entries. Headers without a path and lines that
/// do not parse are skipped.
#[must_use]
pub fn parse_log(raw: &str) -> Vec<LogEntry> {
    let mut entries = Vec::new();
    let mut pending: Option<(String, String, DateTime<FixedOffset>)> = None;

    for line in raw.split('\n') {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }

        if let Some(fields) = parse_header(line) {
            if let Some((sha, ..)) = pending.take() {
                debug!(%sha, "commit without a changed path");
            }
            let (sha, author, date, path) = fields;
            match path {
                Some(path) => entries.push(LogEntry {
                    sha,
                    author,
                    date,
                    path,
                }),
                None => pending = Some((sha, author, date)),
            }
        } else if let Some((sha, author, date)) = pending.take() {
            entries.push(LogEntry {
                sha,
                author,
                date,
                path: line.trim().to_string(),
            });
        } else {
            debug!(line, "ignoring unexpected log line");
        }
    }

    entries
}

type Header = (String, String, DateTime<FixedOffset>, Option<String>);

/// Parses `sha<>author<>date<>` (optionally followed by the path when the
/// blank separator was collapsed).
fn parse_header(line: &str) -> Option<Header> {
    let fields: Vec<&str> = line.split(SEPARATOR).collect();
    if fields.len() != 4 {
        return None;
    }
    let [sha, author, date, rest] = [fields[0], fields[1], fields[2], fields[3]];
    if sha.is_empty() || !sha.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let date = match DateTime::parse_from_rfc3339(date) {
        Ok(date) => date,
        Err(e) => {
            warn!(sha, date, error = %e, "unparseable author date");
            return None;
        }
    };
    let path = Some(rest.trim()).filter(|p| !p.is_empty()).map(String::from);
    Some((sha.to_string(), author.to_string(), date, path))
}

/// History queries through the `git` command line.
#[derive(Debug, Clone, Default)]
pub struct GitCli;

impl GitCli {
    /// Creates a new git command runner.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Returns the mailmapped author of every commit that touched `file`,
    /// newest first, one entry per commit.
    ///
    /// # Errors
    ///
    /// Returns an error if `git log` fails.
    pub fn authors(&self, repo_dir: &Path, file: &str) -> GitResult<Vec<String>> {
        let out = self.follow_log(repo_dir, "--format=%aN", file)?;
        Ok(non_empty_lines(&out))
    }

    /// Returns `<email> name committer-date short-sha` for every commit that
    /// touched `file`, with the raw (unmapped) email.
    ///
    /// # Errors
    ///
    /// Returns an error if `git log` fails.
    pub fn committers(&self, repo_dir: &Path, file: &str) -> GitResult<Vec<String>> {
        let out = self.follow_log(repo_dir, "--format=<%aE> %aN %cI %h", file)?;
        Ok(non_empty_lines(&out))
    }

    fn follow_log(&self, repo_dir: &Path, format: &str, file: &str) -> GitResult<String> {
        self.run(repo_dir, &["log", format, "--follow", "--", file])
    }

    fn run(&self, repo_dir: &Path, args: &[&str]) -> GitResult<String> {
        let output = Command::new("git")
            .args(args)
            .current_dir(repo_dir)
            .output()?;

        if output.status.success() {
            return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        // An unborn branch has no history for any path.
        if stderr.contains("does not have any commits yet") {
            return Ok(String::new());
        }
        Err(GitError::Command {
            command: args.join(" "),
            stderr,
        })
    }
}

impl HistoryWalker for GitCli {
    fn raw_log(&self, repo_dir: &Path, file: &str) -> GitResult<String> {
        self.run(
            repo_dir,
            &["log", HISTORY_FORMAT, "--name-only", "--follow", "--", file],
        )
    }
}

fn non_empty_lines(out: &str) -> Vec<String> {
    out.lines()
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}
