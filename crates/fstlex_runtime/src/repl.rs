//! The interactive REPL.
//!
//! Commands operate on the current language:
//!
//! ```text
//! analyze <form>                  lemmatize a word form
//! generate <lemma> <tags>...      generate forms, one tag string per cell
//! paradigm <form> [lemma]         select the paradigm for an entry
//! layouts <form> [lemma]          list matching layouts
//! reload [lang]                   reload paradigm rules
//! lang <code>                     switch language
//! langs                           list languages
//! ```

use std::fmt::Write as _;

use fstlex_foundation::{EntryNode, Error, LEMMA_EXPR, MapEntry, Result};
use fstlex_morphology::{GenerationRequest, Lemma, LemmatizeOptions};

use crate::editor::{LineEditor, ReadResult, RustylineEditor};
use crate::service::Service;

const COMMANDS: &[&str] = &[
    "analyze", "generate", "paradigm", "layouts", "reload", "lang", "langs", "help", "quit",
];

/// What the REPL should do after a command.
#[derive(Debug, PartialEq, Eq)]
pub enum Reply {
    /// Print this and read the next line.
    Text(String),
    /// Leave the loop.
    Quit,
}

/// The interactive REPL.
pub struct Repl<E: LineEditor = RustylineEditor> {
    /// The line editor for input.
    editor: E,

    /// The analysis service.
    service: Service,

    /// The language commands run against.
    language: String,

    /// Lemmatization switches.
    switches: LemmatizeOptions,

    /// Whether to show the welcome banner.
    show_banner: bool,
}

impl Repl<RustylineEditor> {
    /// Creates a new REPL with the default rustyline editor.
    ///
    /// # Errors
    ///
    /// Returns an error if the editor fails to initialize.
    pub fn new(service: Service) -> Result<Self> {
        let editor = RustylineEditor::new()?;
        Ok(Self::with_editor(editor, service))
    }
}

impl<E: LineEditor> Repl<E> {
    /// Creates a new REPL with the given editor. The first configured
    /// language is selected.
    pub fn with_editor(mut editor: E, service: Service) -> Self {
        let language = service.languages().next().unwrap_or_default().to_string();
        let mut keywords: Vec<String> = COMMANDS.iter().map(|c| (*c).to_string()).collect();
        keywords.extend(service.languages().map(String::from));
        editor.set_keywords(keywords);

        Self {
            editor,
            service,
            language,
            switches: LemmatizeOptions::new(),
            show_banner: true,
        }
    }

    /// Disables the welcome banner.
    #[must_use]
    pub const fn without_banner(mut self) -> Self {
        self.show_banner = false;
        self
    }

    /// Builder method to select the starting language.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the language is not configured.
    pub fn with_language(mut self, language: &str) -> Result<Self> {
        self.set_language(language)?;
        Ok(self)
    }

    /// Builder method to set the lemmatization switches.
    #[must_use]
    pub fn with_switches(mut self, switches: LemmatizeOptions) -> Self {
        self.switches = switches;
        self
    }

    /// The current language.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Returns a reference to the service.
    #[must_use]
    pub const fn service(&self) -> &Service {
        &self.service
    }

    fn set_language(&mut self, language: &str) -> Result<()> {
        if !self.service.has_language(language) {
            return Err(Error::config(format!("language not configured: {language}")));
        }
        self.language = language.to_string();
        Ok(())
    }

    fn prompt(&self) -> String {
        format!("{}> ", self.language)
    }

    /// Runs the REPL loop.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input fails.
    pub fn run(&mut self) -> Result<()> {
        if self.show_banner {
            Self::print_banner();
        }

        loop {
            let prompt = self.prompt();
            let line = match self.editor.read_line(&prompt)? {
                ReadResult::Line(line) => line,
                ReadResult::Interrupted => {
                    println!();
                    continue;
                }
                ReadResult::Eof => break,
            };
            if line.trim().is_empty() {
                continue;
            }
            self.editor.add_history(&line);

            match self.execute(&line) {
                Ok(Reply::Text(text)) => {
                    if !text.is_empty() {
                        println!("{text}");
                    }
                }
                Ok(Reply::Quit) => break,
                Err(e) => Self::print_error(&e),
            }
        }

        println!("\nGoodbye!");
        Ok(())
    }

    /// Executes one command line.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown command, missing arguments, or a
    /// failed lookup.
    pub fn execute(&mut self, input: &str) -> Result<Reply> {
        let mut words = input.split_whitespace();
        let Some(command) = words.next() else {
            return Ok(Reply::Text(String::new()));
        };
        let args: Vec<&str> = words.collect();

        let text = match command {
            "analyze" | "a" => self.analyze(&args)?,
            "generate" | "g" => self.generate(&args)?,
            "paradigm" | "p" => self.paradigm(&args)?,
            "layouts" => self.layouts(&args)?,
            "reload" => {
                self.service.reload_paradigms(args.first().copied())?;
                "reloaded".to_string()
            }
            "lang" => {
                let code = args.first().ok_or_else(|| usage("lang <code>"))?;
                self.set_language(code)?;
                String::new()
            }
            "langs" => self.service.languages().collect::<Vec<_>>().join(" "),
            "help" | "?" => help_text(),
            "quit" | "exit" => return Ok(Reply::Quit),
            other => return Err(Error::config(format!("unknown command: {other} (try `help`)"))),
        };
        Ok(Reply::Text(text))
    }

    fn analyze(&self, args: &[&str]) -> Result<String> {
        let form = args.first().ok_or_else(|| usage("analyze <form>"))?;
        let lemmatized = self.service.lemmatize(&self.language, form, self.switches)?;
        if lemmatized.lemmas.is_empty() {
            return Ok(format!("{form}\t?"));
        }
        Ok(lemmatized
            .lemmas
            .iter()
            .map(|l| format!("{}\t{}\t{}\t{}", l.input, l.lemma, l.pos, l.tag_string()))
            .collect::<Vec<_>>()
            .join("\n"))
    }

    fn generate(&self, args: &[&str]) -> Result<String> {
        let (lemma, tags) = args
            .split_first()
            .filter(|(_, tags)| !tags.is_empty())
            .ok_or_else(|| usage("generate <lemma> <tags>..."))?;
        let options = self.service.morphology(&self.language)?.options();
        let tags: Vec<Vec<String>> = tags.iter().map(|t| options.split_analysis(t)).collect();

        let generated = self
            .service
            .generate(&self.language, &GenerationRequest::new(*lemma, tags))?;
        let mut out = String::new();
        for cell in &generated.paradigm {
            let forms = cell.forms.as_ref().map_or_else(|| "?".to_string(), |f| f.join(", "));
            let _ = writeln!(out, "{}\t{forms}", options.format_tag(&cell.tags));
        }
        Ok(out.trim_end().to_string())
    }

    fn entry(&self, args: &[&str], command: &str) -> Result<(MapEntry, Vec<Lemma>)> {
        let form = args
            .first()
            .ok_or_else(|| usage(&format!("{command} <form> [lemma]")))?;
        let lemmas = self.service.lemmatize(&self.language, form, self.switches)?.lemmas;
        let lemma = args
            .get(1)
            .map(|l| (*l).to_string())
            .or_else(|| lemmas.first().map(|l| l.lemma.clone()))
            .unwrap_or_else(|| (*form).to_string());
        Ok((MapEntry::new().with(LEMMA_EXPR, lemma), lemmas))
    }

    fn paradigm(&self, args: &[&str]) -> Result<String> {
        let (node, lemmas) = self.entry(args, "paradigm")?;
        let Some(resolved) = self
            .service
            .resolve_paradigm(&self.language, Some(&node as &dyn EntryNode), &lemmas)?
        else {
            return Ok("no paradigm".to_string());
        };

        let mut out = String::new();
        let rule = &resolved.rule;
        let _ = writeln!(
            out,
            "{} ({})",
            rule.name.as_deref().unwrap_or(fstlex_paradigm::NO_NAME),
            rule.path.display()
        );
        for (key, value) in &resolved.context.matched {
            let _ = writeln!(out, "  {key}: {}", value.as_deref().unwrap_or("-"));
        }
        out.push_str(&rule.template.source);
        Ok(out)
    }

    fn layouts(&self, args: &[&str]) -> Result<String> {
        let (node, lemmas) = self.entry(args, "layouts")?;
        let layouts = self
            .service
            .resolve_layouts(&self.language, Some(&node as &dyn EntryNode), &lemmas)?;
        if layouts.is_empty() {
            return Ok("no layouts".to_string());
        }
        Ok(layouts
            .iter()
            .map(|rule| format!("{}\t{}", rule.display_order_key(), rule.path.display()))
            .collect::<Vec<_>>()
            .join("\n"))
    }

    fn print_error(error: &Error) {
        eprintln!("\x1b[31mError: {error}\x1b[0m");
    }

    fn print_banner() {
        println!("fstlex v{}", env!("CARGO_PKG_VERSION"));
        println!("Type `help` for commands. Use Ctrl+D to exit.\n");
    }
}

fn usage(text: &str) -> Error {
    Error::config(format!("usage: {text}"))
}

fn help_text() -> String {
    [
        "analyze <form>              lemmatize a word form",
        "generate <lemma> <tags>...  generate forms, one tag string per cell",
        "paradigm <form> [lemma]     select the paradigm for an entry",
        "layouts <form> [lemma]      list matching layouts",
        "reload [lang]               reload paradigm rules",
        "lang <code>                 switch language",
        "langs                       list languages",
        "quit                        leave",
    ]
    .join("\n")
}
