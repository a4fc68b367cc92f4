// Session loop: read a command, run the capture pipeline on "screenshot",
// quit on "stop". Strictly sequential; the next command is only read once
// the previous run (network call included) has finished.

use crate::api::{AnswerClient, Transport};
use crate::capture::{self, Bounds};
use crate::config::Config;
use crate::{encode, selector};
use anyhow::Result;
use crossterm::style::Stylize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::time::Duration;

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Command {
    Screenshot,
    Stop,
    Invalid(String),
}

impl Command {
    /// Case-insensitive, surrounding whitespace ignored.
    pub fn parse(input: &str) -> Self {
        match input.trim().to_lowercase().as_str() {
            "screenshot" => Command::Screenshot,
            "stop" => Command::Stop,
            _ => Command::Invalid(input.to_string()),
        }
    }
}

/// Source of user commands.
pub trait Console {
    fn read_command(&mut self) -> Result<String>;
}

/// One capture-and-ask run. Progress lines go to `out`; the answer is
/// returned for the session to print.
pub trait Pipeline {
    fn capture_and_ask(&mut self, out: &mut dyn Write) -> Result<String>;
}

pub struct Session {
    label: String,
}

impl Session {
    pub fn new(label: &str) -> Self {
        Session { label: label.to_string() }
    }

    /// Loop until "stop". Console and pipeline errors end the session.
    pub fn run(
        &self,
        console: &mut dyn Console,
        pipeline: &mut dyn Pipeline,
        out: &mut dyn Write,
    ) -> Result<()> {
        loop {
            let line = console.read_command()?;
            match Command::parse(&line) {
                Command::Stop => {
                    writeln!(out, "Exiting program.")?;
                    return Ok(());
                }
                Command::Screenshot => {
                    let answer = pipeline.capture_and_ask(out)?;
                    self.print_answer(out, &answer)?;
                }
                Command::Invalid(cmd) => {
                    log::debug!("Rejected command {cmd:?}");
                    writeln!(
                        out,
                        "{}",
                        "Invalid command. Please type 'screenshot' or 'stop'.".yellow()
                    )?;
                }
            }
        }
    }

    fn print_answer(&self, out: &mut dyn Write, answer: &str) -> Result<()> {
        writeln!(out)?;
        writeln!(out, "{}", format!("--- {} Response ---", self.label).bold())?;
        writeln!(out, "{answer}")?;
        writeln!(out)?;
        writeln!(out, "-------------------")?;
        out.flush()?;
        Ok(())
    }
}

/// The real pipeline: overlay, screen grab, PNG/base64, HTTP.
pub struct ScreenPipeline<T> {
    config: Config,
    client: AnswerClient<T>,
}

impl<T: Transport> ScreenPipeline<T> {
    pub fn new(config: Config, client: AnswerClient<T>) -> Self {
        ScreenPipeline { config, client }
    }
}

impl<T: Transport> Pipeline for ScreenPipeline<T> {
    fn capture_and_ask(&mut self, out: &mut dyn Write) -> Result<String> {
        writeln!(out, "Please select the region to capture (click and drag).")?;
        out.flush()?;

        let bounds = Bounds::from_selection(selector::select_region()?);
        let image = match bounds {
            Bounds::Area(region) => {
                writeln!(out, "Region selected: {region}")?;
                let image = capture::capture(bounds)?;
                writeln!(out, "Screenshot captured successfully.")?;
                image
            }
            Bounds::FullScreen => {
                writeln!(out, "No region selected. Capturing full screen.")?;
                capture::capture(bounds)?
            }
        };

        let payload = encode::data_url(&image)?;
        writeln!(out, "Sending prompt and image to {} model...", self.config.label())?;
        out.flush()?;

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
        spinner.set_message(format!("Waiting for {}...", self.config.label()));
        spinner.enable_steady_tick(Duration::from_millis(100));
        let answer = self.client.ask(&self.config, &payload);
        spinner.finish_and_clear();

        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::collections::VecDeque;

    /// Hands out scripted lines; errors once they run out, like EOF.
    struct ScriptedConsole {
        lines: VecDeque<String>,
        reads: usize,
    }

    impl ScriptedConsole {
        fn new(lines: &[&str]) -> Self {
            ScriptedConsole {
                lines: lines.iter().map(|s| s.to_string()).collect(),
                reads: 0,
            }
        }
    }

    impl Console for ScriptedConsole {
        fn read_command(&mut self) -> Result<String> {
            self.reads += 1;
            self.lines.pop_front().ok_or_else(|| anyhow!("end of input"))
        }
    }

    #[derive(Default)]
    struct CountingPipeline {
        runs: usize,
    }

    impl Pipeline for CountingPipeline {
        fn capture_and_ask(&mut self, out: &mut dyn Write) -> Result<String> {
            self.runs += 1;
            writeln!(out, "pipeline run {}", self.runs)?;
            Ok(format!("answer {}", self.runs))
        }
    }

    fn run(lines: &[&str]) -> (Result<()>, ScriptedConsole, CountingPipeline, String) {
        let mut console = ScriptedConsole::new(lines);
        let mut pipeline = CountingPipeline::default();
        let mut out = Vec::new();
        let res = Session::new("AI").run(&mut console, &mut pipeline, &mut out);
        (res, console, pipeline, String::from_utf8(out).unwrap())
    }

    #[test]
    fn parse_is_trimmed_and_case_insensitive() {
        assert_eq!(Command::parse("  ScreenShot \n"), Command::Screenshot);
        assert_eq!(Command::parse("STOP"), Command::Stop);
        assert_eq!(Command::parse("bogus"), Command::Invalid("bogus".into()));
        assert_eq!(Command::parse(""), Command::Invalid("".into()));
    }

    #[test]
    fn stop_ends_without_reading_again() {
        let (res, console, pipeline, out) = run(&["stop", "screenshot"]);
        assert!(res.is_ok());
        assert_eq!(console.reads, 1);
        assert_eq!(pipeline.runs, 0);
        assert!(out.contains("Exiting program."));
    }

    #[test]
    fn bogus_command_prints_notice_and_reprompts() {
        let (res, console, pipeline, out) = run(&["bogus", "stop"]);
        assert!(res.is_ok());
        assert_eq!(console.reads, 2);
        assert_eq!(pipeline.runs, 0);
        assert!(out.contains("Invalid command. Please type 'screenshot' or 'stop'."));
    }

    #[test]
    fn screenshot_runs_the_pipeline_once_and_prints_the_answer() {
        let (res, _, pipeline, out) = run(&["screenshot", "stop"]);
        assert!(res.is_ok());
        assert_eq!(pipeline.runs, 1);
        assert!(out.contains("pipeline run 1"));
        assert!(out.contains("AI Response"));
        assert!(out.contains("answer 1"));
    }

    #[test]
    fn each_screenshot_is_a_separate_run() {
        let (_, _, pipeline, out) = run(&["screenshot", " SCREENSHOT ", "stop"]);
        assert_eq!(pipeline.runs, 2);
        assert!(out.contains("answer 2"));
    }

    #[test]
    fn console_failure_ends_the_session() {
        let (res, _, pipeline, _) = run(&["bogus"]);
        assert!(res.is_err());
        assert_eq!(pipeline.runs, 0);
    }

    #[test]
    fn pipeline_failure_propagates() {
        struct Broken;
        impl Pipeline for Broken {
            fn capture_and_ask(&mut self, _out: &mut dyn Write) -> Result<String> {
                Err(anyhow!("no monitors"))
            }
        }
        let mut console = ScriptedConsole::new(&["screenshot", "stop"]);
        let mut out = Vec::new();
        let res = Session::new("AI").run(&mut console, &mut Broken, &mut out);
        assert_eq!(res.unwrap_err().to_string(), "no monitors");
        assert_eq!(console.reads, 1);
    }
}
