use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use super::render::TerminalCommand;

const BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>3}% {prefix} {msg}";

/// Executes render commands against stdout. Owns the progress bar of the
/// tracked job, if any.
#[derive(Default)]
pub struct Terminal {
    bar: Option<ProgressBar>,
}

impl Terminal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn execute(&mut self, commands: Vec<TerminalCommand>) {
        for command in commands {
            match command {
                TerminalCommand::Line(line) => self.println(&line),
                TerminalCommand::Progress {
                    job_id,
                    label,
                    percent,
                    details,
                } => {
                    let bar = match &self.bar {
                        Some(bar) => bar.clone(),
                        None => self.start_bar(&job_id),
                    };
                    bar.set_position(u64::from(percent));
                    bar.set_prefix(label);
                    bar.set_message(details);
                }
                TerminalCommand::FinishProgress(message) => match self.bar.take() {
                    Some(bar) => {
                        bar.set_position(100);
                        bar.finish_with_message(message);
                    }
                    None => println!("{message}"),
                },
                TerminalCommand::AbandonProgress(message) => match self.bar.take() {
                    Some(bar) => bar.abandon_with_message(message),
                    None => println!("{message}"),
                },
                TerminalCommand::ClearProgress => {
                    if let Some(bar) = self.bar.take() {
                        bar.finish_and_clear();
                    }
                }
                TerminalCommand::Saved(path) => {
                    self.println(&format!("Arquivo salvo em: {}", path.display()));
                }
            }
        }
    }

    /// Blocking notices; printed to stderr so they survive output redirection.
    pub fn alert(&self, message: &str) {
        match &self.bar {
            Some(bar) => bar.suspend(|| eprintln!("! {message}")),
            None => eprintln!("! {message}"),
        }
    }

    fn println(&self, line: &str) {
        match &self.bar {
            Some(bar) => bar.println(line),
            None => println!("{line}"),
        }
    }

    fn start_bar(&mut self, job_id: &str) -> ProgressBar {
        println!("Job {job_id} iniciado");
        let style = ProgressStyle::default_bar()
            .template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        let bar = ProgressBar::new(100).with_style(style);
        bar.enable_steady_tick(Duration::from_millis(120));
        self.bar = Some(bar.clone());
        bar
    }
}
