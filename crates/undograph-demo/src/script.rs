//! Command parsing and execution for the line editor.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use tracing::{debug, info};
use undograph::{ComponentPath, VersionedDocument};

use crate::error::{DemoError, Result};

/// One editor command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Replace the document text.
    Set(String),
    /// Append a line to the document text.
    Append(String),
    Commit(String),
    Undo,
    Redo,
    /// Discard uncommitted edits.
    Rollback,
    /// Select a component path, or clear the selection.
    Select(Option<String>),
    Hover(Option<String>),
    Scale(f32),
    /// Check out the n-th entry of `log` (0 is the branch head).
    Checkout(usize),
    Log,
    Status,
    Print,
    Save(PathBuf),
}

/// Parse one script line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line_no: usize, line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let optional = || (!rest.is_empty()).then(|| rest.to_owned());
    let required = |command: &'static str, expected: &'static str| {
        if rest.is_empty() {
            Err(DemoError::MissingArgument {
                line: line_no,
                command,
                expected,
            })
        } else {
            Ok(rest.to_owned())
        }
    };

    let command = match word {
        "set" => Command::Set(rest.to_owned()),
        "append" => Command::Append(rest.to_owned()),
        "commit" => Command::Commit(required("commit", "a message")?),
        "undo" => Command::Undo,
        "redo" => Command::Redo,
        "rollback" => Command::Rollback,
        "select" => Command::Select(optional()),
        "hover" => Command::Hover(optional()),
        "scale" => {
            let value = required("scale", "a number")?;
            let factor = value.parse().map_err(|_| DemoError::InvalidArgument {
                line: line_no,
                value,
                expected: "number",
            })?;
            Command::Scale(factor)
        }
        "checkout" => {
            let value = required("checkout", "a log index")?;
            let index = value.parse().map_err(|_| DemoError::InvalidArgument {
                line: line_no,
                value,
                expected: "log index",
            })?;
            Command::Checkout(index)
        }
        "log" => Command::Log,
        "status" => Command::Status,
        "print" => Command::Print,
        "save" => Command::Save(PathBuf::from(required("save", "a path")?)),
        other => {
            return Err(DemoError::UnknownCommand {
                line: line_no,
                command: other.to_owned(),
            });
        }
    };
    Ok(Some(command))
}

/// An editing session over a plain-text document.
#[derive(Debug)]
pub struct Session {
    doc: VersionedDocument<String>,
}

impl Session {
    #[must_use]
    pub fn new(doc: VersionedDocument<String>) -> Self {
        Self { doc }
    }

    #[must_use]
    pub fn document(&self) -> &VersionedDocument<String> {
        &self.doc
    }

    /// Parse and execute every line of `input`, writing output to `out`.
    pub fn run_script(&mut self, input: impl BufRead, out: &mut impl Write) -> Result<()> {
        for (idx, line) in input.lines().enumerate() {
            let line = line.map_err(|source| DemoError::Script {
                path: PathBuf::from("<input>"),
                source,
            })?;
            let line_no = idx + 1;
            if let Some(command) = parse_line(line_no, &line)? {
                self.execute(line_no, command, out)?;
            }
        }
        Ok(())
    }

    pub fn execute(
        &mut self,
        line_no: usize,
        command: Command,
        out: &mut impl Write,
    ) -> Result<()> {
        debug!(line = line_no, ?command, "execute");
        match command {
            Command::Set(text) => self.doc.set_document(text),
            Command::Append(text) => {
                let doc = self.doc.document_mut();
                if !doc.is_empty() {
                    doc.push('\n');
                }
                doc.push_str(&text);
            }
            Command::Commit(message) => {
                let id = self.doc.commit(message);
                let gc = self.doc.last_gc();
                writeln!(out, "committed {id} (collected {})", gc.total())
                    .map_err(DemoError::Output)?;
            }
            Command::Undo => self.move_head(out, |doc| {
                let moved = doc.can_undo();
                doc.undo();
                moved
            })?,
            Command::Redo => self.move_head(out, |doc| {
                let moved = doc.can_redo();
                doc.redo();
                moved
            })?,
            Command::Rollback => self.doc.rollback(),
            Command::Select(path) => self.doc.set_selected(path.map(ComponentPath::new)),
            Command::Hover(path) => self.doc.set_hovered(path.map(ComponentPath::new)),
            Command::Scale(factor) => self.doc.set_fixup_scale_factor(factor),
            Command::Checkout(index) => {
                let store = self.doc.store();
                let id = store
                    .lineage(self.doc.branch_head())
                    .nth(index)
                    .map(|c| c.id())
                    .ok_or(DemoError::NoSuchCommit {
                        line: line_no,
                        index,
                    })?;
                self.doc.checkout_id(id);
                writeln!(out, "at {id}").map_err(DemoError::Output)?;
            }
            Command::Log => self.write_log(out)?,
            Command::Status => self.write_status(out)?,
            Command::Print => {
                writeln!(out, "{}", self.doc.document()).map_err(DemoError::Output)?;
            }
            Command::Save(path) => {
                std::fs::write(&path, self.doc.document()).map_err(|source| DemoError::Save {
                    path: path.clone(),
                    source,
                })?;
                self.doc.mark_saved_to(&path)?;
                info!(path = %path.display(), "saved");
                writeln!(out, "saved {}", path.display()).map_err(DemoError::Output)?;
            }
        }
        Ok(())
    }

    fn move_head(
        &mut self,
        out: &mut impl Write,
        step: impl FnOnce(&mut VersionedDocument<String>) -> bool,
    ) -> Result<()> {
        let written = if step(&mut self.doc) {
            writeln!(out, "at {}", self.doc.current_head())
        } else {
            writeln!(out, "nothing to do")
        };
        written.map_err(DemoError::Output)
    }

    fn write_log(&self, out: &mut impl Write) -> Result<()> {
        let current = self.doc.current_head();
        for (index, commit) in self.doc.store().lineage(self.doc.branch_head()).enumerate() {
            let marker = if commit.id() == current { '*' } else { ' ' };
            writeln!(
                out,
                "{marker} {index:>3} {} {} {}",
                commit.id(),
                commit.created_at().format("%H:%M:%S"),
                commit.message()
            )
            .map_err(DemoError::Output)?;
        }
        Ok(())
    }

    fn write_status(&self, out: &mut impl Write) -> Result<()> {
        let doc = &self.doc;
        let selected = doc.selected().map_or("-", ComponentPath::as_str);
        let hovered = doc.hovered().map_or("-", ComponentPath::as_str);
        let saved = if doc.is_up_to_date_with_filesystem() {
            "saved"
        } else {
            "modified"
        };
        writeln!(
            out,
            "{name} [{saved}] head={current} branch={branch} undo={undo} redo={redo} \
             stored={stored} selected={selected} hovered={hovered} scale={scale}",
            name = doc.recommended_document_name(),
            current = doc.current_head(),
            branch = doc.branch_head(),
            undo = doc.undo_depth(),
            redo = doc.redo_depth(),
            stored = doc.store().len(),
            scale = doc.fixup_scale_factor(),
        )
        .map_err(DemoError::Output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use undograph::HistoryConfig;

    fn run(session: &mut Session, script: &str) -> String {
        let mut out = Vec::new();
        session.run_script(script.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn parse_skips_blank_and_comment_lines() {
        assert_eq!(parse_line(1, "").unwrap(), None);
        assert_eq!(parse_line(2, "   ").unwrap(), None);
        assert_eq!(parse_line(3, "# note").unwrap(), None);
    }

    #[test]
    fn parse_commands_with_arguments() {
        assert_eq!(
            parse_line(1, "commit add femur").unwrap(),
            Some(Command::Commit("add femur".into()))
        );
        assert_eq!(
            parse_line(1, "set  hello world ").unwrap(),
            Some(Command::Set("hello world".into()))
        );
        assert_eq!(parse_line(1, "set").unwrap(), Some(Command::Set(String::new())));
        assert_eq!(parse_line(1, "checkout 2").unwrap(), Some(Command::Checkout(2)));
        assert_eq!(parse_line(1, "scale 0.5").unwrap(), Some(Command::Scale(0.5)));
        assert_eq!(parse_line(1, "select").unwrap(), Some(Command::Select(None)));
        assert_eq!(
            parse_line(1, "select /bodyset/femur").unwrap(),
            Some(Command::Select(Some("/bodyset/femur".into())))
        );
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert!(matches!(
            parse_line(4, "frobnicate"),
            Err(DemoError::UnknownCommand { line: 4, .. })
        ));
        assert!(matches!(
            parse_line(5, "commit"),
            Err(DemoError::MissingArgument { line: 5, command: "commit", .. })
        ));
        assert!(matches!(
            parse_line(6, "checkout two"),
            Err(DemoError::InvalidArgument { line: 6, .. })
        ));
    }

    #[test]
    fn undo_redo_round_trip() {
        let mut session = Session::new(VersionedDocument::new(String::new()));
        let out = run(
            &mut session,
            "append one\ncommit first\nappend two\ncommit second\nundo\nprint\nredo\nprint\n",
        );
        assert!(out.contains("one\n"));
        assert!(out.ends_with("one\ntwo\n"));
        assert_eq!(session.document().document(), "one\ntwo");
    }

    #[test]
    fn undo_at_root_reports_nothing_to_do() {
        let mut session = Session::new(VersionedDocument::new(String::new()));
        assert_eq!(run(&mut session, "undo\n"), "nothing to do\n");
    }

    #[test]
    fn rollback_discards_uncommitted_text() {
        let mut session = Session::new(VersionedDocument::new(String::from("base")));
        run(&mut session, "set scratch\nrollback\n");
        assert_eq!(session.document().document(), "base");
    }

    #[test]
    fn log_marks_current_head_and_checkout_moves_it() {
        let mut session = Session::new(VersionedDocument::new(String::new()));
        let out = run(
            &mut session,
            "set a\ncommit a\nset b\ncommit b\ncheckout 2\nlog\n",
        );
        // committed, committed, at, then one log line per commit
        let log: Vec<&str> = out.lines().skip(3).collect();
        assert_eq!(log.len(), 3);
        assert!(log[0].ends_with(" b"));
        assert!(log[2].starts_with('*'));
        assert!(log[2].ends_with(undograph::NEW_DOCUMENT_MESSAGE));
        assert_eq!(session.document().redo_depth(), 2);
        assert_eq!(session.document().document(), "");
    }

    #[test]
    fn checkout_out_of_range_is_an_error() {
        let mut session = Session::new(VersionedDocument::new(String::new()));
        let mut out = Vec::new();
        let err = session
            .run_script("checkout 5\n".as_bytes(), &mut out)
            .unwrap_err();
        assert!(matches!(err, DemoError::NoSuchCommit { line: 1, index: 5 }));
    }

    #[test]
    fn status_reports_sticky_state() {
        let mut session = Session::new(VersionedDocument::new(String::new()));
        let out = run(&mut session, "select /a\nhover /b\nscale 2\nstatus\n");
        assert!(out.contains("selected=/a"));
        assert!(out.contains("hovered=/b"));
        assert!(out.contains("scale=2"));
        assert!(out.starts_with("untitled [modified]"));
    }

    #[test]
    fn commit_reports_collected_commits() {
        let doc = VersionedDocument::with_config(String::new(), HistoryConfig::new(1, 1));
        let mut session = Session::new(doc);
        let out = run(&mut session, "set a\ncommit a\nset b\ncommit b\n");
        assert!(out.lines().nth(1).unwrap().ends_with("(collected 1)"));
        assert_eq!(session.document().store().len(), 2);
    }

    #[test]
    fn save_writes_file_and_marks_up_to_date() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        let mut session = Session::new(VersionedDocument::new(String::new()));
        run(
            &mut session,
            &format!("set hello\ncommit greet\nsave {}\n", path.display()),
        );
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello");
        let doc = session.document();
        assert!(doc.is_up_to_date_with_filesystem());
        assert_eq!(doc.recommended_document_name(), "notes.txt");
    }
}
