//! The REPL driving a configured service.

#![cfg(unix)]

use std::cell::RefCell;
use std::rc::Rc;

use fstlex_foundation::Result;
use fstlex_runtime::{LineEditor, ReadResult, Repl, Reply};

use crate::service::{service, setup};

/// Replays a fixed script and records what the REPL did with it.
#[derive(Default)]
struct Scripted {
    lines: Vec<String>,
    history: Rc<RefCell<Vec<String>>>,
    keywords: Rc<RefCell<Vec<String>>>,
}

impl Scripted {
    fn new(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().rev().map(|l| (*l).to_string()).collect(),
            ..Self::default()
        }
    }
}

impl LineEditor for Scripted {
    fn read_line(&mut self, _prompt: &str) -> Result<ReadResult> {
        Ok(self.lines.pop().map_or(ReadResult::Eof, ReadResult::Line))
    }

    fn add_history(&mut self, line: &str) {
        self.history.borrow_mut().push(line.to_string());
    }

    fn set_keywords(&mut self, keywords: Vec<String>) {
        *self.keywords.borrow_mut() = keywords;
    }
}

fn text(reply: Reply) -> String {
    match reply {
        Reply::Text(text) => text,
        Reply::Quit => panic!("unexpected quit"),
    }
}

#[test]
fn commands_against_a_configured_service() {
    let dir = setup();
    let mut repl = Repl::with_editor(Scripted::default(), service(&dir)).without_banner();

    assert_eq!(text(repl.execute("a guollit").unwrap()), "guollit\tguolli\tN\tguolli+N+Pl+Nom");
    assert_eq!(text(repl.execute("g diehtit V+Ind+Prs+Sg2").unwrap()), "diehtit+V+Ind+Prs+Sg2\tdieđát");

    let paradigm = text(repl.execute("paradigm Romsa").unwrap());
    let mut lines = paradigm.lines();
    assert!(lines.next().unwrap().starts_with("Places ("));
    assert!(paradigm.contains("  type: Prop"));
    assert!(paradigm.ends_with("places"));

    let layouts = text(repl.execute("layouts Romsa").unwrap());
    assert!(layouts.ends_with("places.layout"));

    assert_eq!(text(repl.execute("paradigm qwerty").unwrap()), "no paradigm");
    assert_eq!(text(repl.execute("reload sme").unwrap()), "reloaded");
    assert_eq!(repl.execute("exit").unwrap(), Reply::Quit);
}

#[test]
fn bad_commands_are_errors() {
    let dir = setup();
    let mut repl = Repl::with_editor(Scripted::default(), service(&dir));

    assert!(repl.execute("frobnicate").is_err());
    assert!(repl.execute("analyze").is_err());
    assert!(repl.execute("generate diehtit").is_err());
    assert!(repl.execute("lang fin").is_err());
    assert_eq!(repl.language(), "sme");
}

#[test]
fn run_loop_reads_until_quit() {
    let dir = setup();
    let editor = Scripted::new(&["analyze guollit", "   ", "nonsense", "quit", "analyze Romsa"]);
    let history = Rc::clone(&editor.history);
    let keywords = Rc::clone(&editor.keywords);

    let mut repl = Repl::with_editor(editor, service(&dir)).without_banner();
    repl.run().unwrap();

    assert_eq!(*history.borrow(), ["analyze guollit", "nonsense", "quit"]);
    assert!(keywords.borrow().iter().any(|k| k == "paradigm"));
    assert!(keywords.borrow().iter().any(|k| k == "sme"));
}
