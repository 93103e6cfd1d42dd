use std::io::{self, BufRead};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use tracker_core::{update, AppState, AppViewModel, Catalog, Msg};
use tracker_logging::{tracker_debug, tracker_info, tracker_warn};

use super::effects::EffectRunner;
use super::ui::{self, Terminal};

/// Owns the state and drives it: one message at a time through `update`,
/// effects out to the runner, and a re-render whenever the state is dirty.
pub struct Driver {
    state: AppState,
    runner: EffectRunner,
    msg_tx: mpsc::Sender<Msg>,
    msg_rx: mpsc::Receiver<Msg>,
    terminal: Terminal,
    rendered: Option<AppViewModel>,
    alerts: Vec<String>,
}

impl Driver {
    pub fn new(
        state: AppState,
        runner: EffectRunner,
        msg_tx: mpsc::Sender<Msg>,
        msg_rx: mpsc::Receiver<Msg>,
    ) -> Self {
        let rendered = Some(state.view());
        Self {
            state,
            runner,
            msg_tx,
            msg_rx,
            terminal: Terminal::new(),
            rendered,
            alerts: Vec::new(),
        }
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view()
    }

    pub fn catalog(&self) -> &Catalog {
        self.state.catalog()
    }

    /// Every alert shown so far, oldest first.
    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    pub fn dispatch(&mut self, msg: Msg) {
        tracker_debug!("dispatch {:?}", msg);
        let force_render = matches!(msg, Msg::Tick);
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        self.state = state;

        for message in self.runner.enqueue(effects) {
            self.terminal.alert(&message);
            self.alerts.push(message);
        }

        if was_dirty || force_render {
            let view = self.state.view();
            let prev = if force_render { None } else { self.rendered.as_ref() };
            self.terminal.execute(ui::render(prev, &view));
            self.rendered = Some(view);
        }
    }

    /// Processes incoming messages until `done` holds. Fails when the page
    /// is torn down first or `timeout` runs out.
    pub fn run_until(
        &mut self,
        timeout: Option<Duration>,
        mut done: impl FnMut(&Driver) -> bool,
    ) -> Result<()> {
        let deadline = timeout.map(|t| Instant::now() + t);
        while !done(self) {
            let msg = match deadline {
                Some(deadline) => {
                    let left = deadline.saturating_duration_since(Instant::now());
                    match self.msg_rx.recv_timeout(left) {
                        Ok(msg) => msg,
                        Err(mpsc::RecvTimeoutError::Timeout) => {
                            self.dispatch(Msg::PageUnloaded);
                            bail!(
                                "Timeout atingido após {} segundos",
                                timeout.unwrap_or_default().as_secs()
                            );
                        }
                        Err(mpsc::RecvTimeoutError::Disconnected) => {
                            bail!("message channel closed")
                        }
                    }
                }
                None => match self.msg_rx.recv() {
                    Ok(msg) => msg,
                    Err(_) => bail!("message channel closed"),
                },
            };
            let unloading = msg == Msg::PageUnloaded;
            self.dispatch(msg);
            if unloading {
                bail!("Operação cancelada pelo usuário.");
            }
        }
        Ok(())
    }

    /// Reads shell commands from stdin until `quit`, end of input or Ctrl-C.
    pub fn run_shell(&mut self) -> Result<()> {
        spawn_stdin_reader(self.msg_tx.clone());
        println!("{}", HELP);
        self.dispatch(Msg::Tick);
        while let Ok(msg) = self.msg_rx.recv() {
            let unloading = msg == Msg::PageUnloaded;
            self.dispatch(msg);
            if unloading {
                tracker_info!("Shell closed");
                break;
            }
        }
        Ok(())
    }

    /// Sends `PageUnloaded` on Ctrl-C so polling stops before the process exits.
    pub fn watch_interrupt(&self) {
        let msg_tx = self.msg_tx.clone();
        thread::spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(err) => {
                    tracker_warn!("Ctrl-C handler unavailable: {}", err);
                    return;
                }
            };
            if runtime.block_on(tokio::signal::ctrl_c()).is_ok() {
                let _ = msg_tx.send(Msg::PageUnloaded);
            }
        });
    }
}

const HELP: &str = "Comandos: site <chave> | term <texto> | submit | download | new | status | quit";

fn spawn_stdin_reader(msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match parse_command(&line) {
                Some(ShellInput::Msg(msg)) => {
                    let quit = msg == Msg::PageUnloaded;
                    if msg_tx.send(msg).is_err() || quit {
                        return;
                    }
                }
                Some(ShellInput::Help) => println!("{HELP}"),
                None => {}
            }
        }
        let _ = msg_tx.send(Msg::PageUnloaded);
    });
}

#[derive(Debug, PartialEq, Eq)]
enum ShellInput {
    Msg(Msg),
    Help,
}

fn parse_command(line: &str) -> Option<ShellInput> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };
    let msg = match command {
        "site" => Msg::SiteSelected(rest.to_string()),
        "term" => Msg::SearchTermChanged(rest.to_string()),
        "submit" => Msg::SubmitClicked,
        "download" => Msg::DownloadClicked,
        "new" => Msg::NewSearchClicked,
        "status" => Msg::Tick,
        "quit" | "exit" => Msg::PageUnloaded,
        _ => return Some(ShellInput::Help),
    };
    Some(ShellInput::Msg(msg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_shell_commands() {
        assert_eq!(
            parse_command("site mercado_livre"),
            Some(ShellInput::Msg(Msg::SiteSelected("mercado_livre".to_string())))
        );
        assert_eq!(
            parse_command("  term  notebook gamer "),
            Some(ShellInput::Msg(Msg::SearchTermChanged(
                "notebook gamer".to_string()
            )))
        );
        assert_eq!(parse_command("submit"), Some(ShellInput::Msg(Msg::SubmitClicked)));
        assert_eq!(parse_command("status"), Some(ShellInput::Msg(Msg::Tick)));
        assert_eq!(parse_command("quit"), Some(ShellInput::Msg(Msg::PageUnloaded)));
    }

    #[test]
    fn blank_and_unknown_lines() {
        assert_eq!(parse_command("   "), None);
        assert_eq!(parse_command("launch"), Some(ShellInput::Help));
    }

    #[test]
    fn bare_term_clears_the_search() {
        assert_eq!(
            parse_command("term"),
            Some(ShellInput::Msg(Msg::SearchTermChanged(String::new())))
        );
    }
}
