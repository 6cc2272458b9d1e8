//! Analyzers backed by an external lookup process.

use std::io::{Read, Write};
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use fstlex_foundation::{AnalyzerOptions, Error, Result};
use log::{debug, error};

use crate::analyzer::Analyzer;
use crate::output::{DefaultTagProcessor, LookupOutput, TagProcessor};

/// Default bound on one lookup process.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Which lookup tool family the command line targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipeFlavor {
    /// XFST `lookup -flags mbTT <fst>`.
    Xfst,
    /// `hfst-lookup <fst>`.
    Hfst,
}

impl PipeFlavor {
    /// The backend name used in diagnostics.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Xfst => "XFST",
            Self::Hfst => "HFST",
        }
    }

    fn command(self, tool: &str, fst: &str) -> Vec<String> {
        let line = match self {
            Self::Xfst => format!("{tool} -flags mbTT {fst}"),
            Self::Hfst => format!("{tool} {fst}"),
        };
        line.split(' ')
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }
}

/// Runs an external lookup tool per call, with a hard time bound.
pub struct PipeAnalyzer {
    flavor: PipeFlavor,
    language: String,
    command: Vec<String>,
    inverse_command: Option<Vec<String>>,
    options: AnalyzerOptions,
    timeout: Duration,
    processor: Arc<dyn TagProcessor>,
}

impl PipeAnalyzer {
    fn new(flavor: PipeFlavor, tool: &str, fst: &str, ifst: Option<&str>) -> Self {
        Self {
            flavor,
            language: String::new(),
            command: flavor.command(tool, fst),
            inverse_command: ifst.map(|ifst| flavor.command(tool, ifst)),
            options: AnalyzerOptions::default(),
            timeout: DEFAULT_TIMEOUT,
            processor: Arc::new(DefaultTagProcessor),
        }
    }

    /// An XFST `lookup` analyzer.
    #[must_use]
    pub fn xfst(tool: &str, fst: &str, ifst: Option<&str>) -> Self {
        Self::new(PipeFlavor::Xfst, tool, fst, ifst)
    }

    /// An `hfst-lookup` analyzer.
    #[must_use]
    pub fn hfst(tool: &str, fst: &str, ifst: Option<&str>) -> Self {
        Self::new(PipeFlavor::Hfst, tool, fst, ifst)
    }

    /// Builder method to set the language code used in diagnostics.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Builder method to set the analyzer options.
    #[must_use]
    pub fn with_options(mut self, options: AnalyzerOptions) -> Self {
        self.options = options;
        self
    }

    /// Builder method to set the time bound.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder method to replace the tag processor.
    #[must_use]
    pub fn with_tag_processor(mut self, processor: Arc<dyn TagProcessor>) -> Self {
        self.processor = processor;
        self
    }

    /// The forward command line.
    #[must_use]
    pub fn command_line(&self) -> String {
        self.command.join(" ")
    }

    /// The time bound.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn exec(&self, command: &[String], input: &str) -> Result<(String, String)> {
        let display = command.join(" ");
        let Some((program, args)) = command.split_first() else {
            return Err(Error::analyzer_unavailable(display, "empty command"));
        };

        debug!(target: "fstlex::analyzer", "{}: running `{display}`", self.language);

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Error::analyzer_unavailable(&display, e.to_string()))?;

        // The feeder and both drains run on their own threads so that a
        // child filling one pipe never blocks on the others. The drains
        // share the deadline: a grandchild may keep a pipe open after the
        // child itself has exited.
        let mut payload = input.as_bytes().to_vec();
        payload.push(b'\n');
        if let Some(mut stdin) = child.stdin.take() {
            thread::spawn(move || {
                let _ = stdin.write_all(&payload);
            });
        }
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let deadline = Instant::now() + self.timeout;
        loop {
            match child.try_wait() {
                Ok(Some(_)) => break,
                Ok(None) if Instant::now() >= deadline => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(Error::analyzer_timeout(display, self.timeout));
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => {
                    let _ = child.kill();
                    return Err(Error::analyzer_unavailable(display, e.to_string()));
                }
            }
        }

        let timed_out = || Error::analyzer_timeout(&display, self.timeout);
        let stdout = collect(&stdout, deadline).ok_or_else(timed_out)?;
        let stderr = collect(&stderr, deadline).ok_or_else(timed_out)?;
        Ok((stdout, stderr))
    }

    fn run(&self, command: &[String], input: &str) -> Result<LookupOutput> {
        let (stdout, stderr) = self.exec(command, input)?;
        if stdout.is_empty() && !stderr.is_empty() {
            error!(
                target: "fstlex::analyzer",
                "{}",
                format!("{} - {}: {stderr}", self.language, self.flavor.name()).trim()
            );
        }
        Ok(LookupOutput::parse(stdout, stderr, self.processor.as_ref()))
    }
}

fn drain<R: Read + Send + 'static>(stream: Option<R>) -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut stream) = stream {
            let _ = stream.read_to_end(&mut buf);
        }
        let _ = tx.send(String::from_utf8_lossy(&buf).into_owned());
    });
    rx
}

/// Waits for a drained stream until `deadline`; `None` once it has passed.
fn collect(rx: &Receiver<String>, deadline: Instant) -> Option<String> {
    match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
        Ok(text) => Some(text),
        Err(RecvTimeoutError::Timeout) => None,
        Err(RecvTimeoutError::Disconnected) => Some(String::new()),
    }
}

impl Analyzer for PipeAnalyzer {
    fn name(&self) -> &str {
        self.flavor.name()
    }

    fn options(&self) -> &AnalyzerOptions {
        &self.options
    }

    fn lookup(&self, forms: &[&str]) -> Result<LookupOutput> {
        self.run(&self.command, &forms.join("\n"))
    }

    fn inverse_lookup_raw(&self, input: &str) -> Result<LookupOutput> {
        match &self.inverse_command {
            Some(command) => self.run(command, input),
            None => Err(Error::inverse_unavailable(self.flavor.name())),
        }
    }
}

impl std::fmt::Debug for PipeAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipeAnalyzer")
            .field("flavor", &self.flavor)
            .field("language", &self.language)
            .field("command", &self.command)
            .field("inverse_command", &self.inverse_command)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
