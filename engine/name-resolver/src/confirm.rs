//! Human escalation for low-confidence matches

use crate::error::{ResolveError, Result};
use colored::*;
use crossbeam::channel::{self, Receiver, RecvTimeoutError};
use player_registry::PlayerId;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::time::Duration;
use tracing::warn;

/// A weak pairing the resolver wants an operator to adjudicate
#[derive(Debug, Clone, PartialEq)]
pub struct ProposedMatch {
    /// Name as scraped
    pub raw_name: String,

    /// Closest roster name
    pub matched_name: String,

    /// Id of the closest roster player
    pub player_id: PlayerId,

    /// Similarity of the pairing
    pub score: f64,
}

/// Operator answer to a proposed match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The raw name belongs to no known player
    NoMatch,

    /// Keep the proposed player
    AcceptMatch,

    /// No answer (timeout, closed input, non-interactive run); nothing is cached
    Unanswered,
}

/// Capability to ask an operator about a proposed match
pub trait ConfirmationPort {
    /// Ask whether `proposal.raw_name` should be treated as no player at all
    fn confirm(&mut self, proposal: &ProposedMatch) -> Result<Verdict>;
}

impl<T: ConfirmationPort + ?Sized> ConfirmationPort for Box<T> {
    fn confirm(&mut self, proposal: &ProposedMatch) -> Result<Verdict> {
        (**self).confirm(proposal)
    }
}

/// Map a typed answer to a verdict; only an explicit yes rejects the match
pub fn parse_answer(line: &str) -> Verdict {
    match line.trim().to_lowercase().as_str() {
        "y" | "yes" => Verdict::NoMatch,
        _ => Verdict::AcceptMatch,
    }
}

/// Blocking yes/no prompt on the controlling terminal
///
/// The question goes to stderr so stdout can carry resolved rows.
pub struct TerminalConfirmation {
    timeout: Option<Duration>,
    lines: Option<Receiver<String>>,
}

impl TerminalConfirmation {
    /// Create a prompt that waits indefinitely, or up to `timeout`
    ///
    /// With a timeout, lines already waiting on stdin when a question is asked
    /// are discarded as late answers to an earlier prompt. Answers piped in
    /// ahead of time (`printf 'y\nn\n' | ...`) therefore only work without a
    /// timeout.
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout, lines: None }
    }

    fn print_prompt(proposal: &ProposedMatch) -> io::Result<()> {
        write_prompt(&mut io::stderr().lock(), proposal)
    }

    /// Stdin is read on a dedicated thread so a timed-out prompt does not
    /// leave a blocked read behind that would swallow the next answer
    fn reader(&mut self) -> io::Result<Receiver<String>> {
        if let Some(lines) = &self.lines {
            return Ok(lines.clone());
        }

        let (tx, rx) = channel::unbounded();
        std::thread::Builder::new().name("operator-input".to_string()).spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                match line {
                    Ok(line) => {
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(_) => break,
                }
            }
        })?;

        self.lines = Some(rx.clone());
        Ok(rx)
    }
}

impl ConfirmationPort for TerminalConfirmation {
    fn confirm(&mut self, proposal: &ProposedMatch) -> Result<Verdict> {
        let io_error = |e: io::Error| ResolveError::Confirmation(e.to_string());

        match self.timeout {
            None => {
                Self::print_prompt(proposal).map_err(io_error)?;
                let mut line = String::new();
                let read = io::stdin().read_line(&mut line).map_err(io_error)?;
                if read == 0 {
                    warn!("Operator input closed while confirming '{}'", proposal.raw_name);
                    return Ok(Verdict::Unanswered);
                }
                Ok(parse_answer(&line))
            }
            Some(timeout) => {
                let lines = self.reader().map_err(io_error)?;
                let stale = discard_pending(&lines);
                if stale > 0 {
                    warn!("Ignoring {} line(s) typed before the prompt for '{}'", stale, proposal.raw_name);
                }

                Self::print_prompt(proposal).map_err(io_error)?;
                match lines.recv_timeout(timeout) {
                    Ok(line) => Ok(parse_answer(&line)),
                    Err(RecvTimeoutError::Timeout) => {
                        eprintln!();
                        warn!(
                            "No answer for '{}' within {:?}, leaving it unresolved",
                            proposal.raw_name, timeout
                        );
                        Ok(Verdict::Unanswered)
                    }
                    Err(RecvTimeoutError::Disconnected) => {
                        warn!("Operator input closed while confirming '{}'", proposal.raw_name);
                        Ok(Verdict::Unanswered)
                    }
                }
            }
        }
    }
}

/// Render the operator question for `proposal`
fn write_prompt<W: Write>(out: &mut W, proposal: &ProposedMatch) -> io::Result<()> {
    writeln!(
        out,
        "{} '{}' -> '{}' (player {}, similarity {:.2})",
        "Low-confidence match:".yellow().bold(),
        proposal.raw_name,
        proposal.matched_name,
        proposal.player_id,
        proposal.score
    )?;
    write!(out, "Treat '{}' as no known player? [y/N] ", proposal.raw_name.as_str().bold())?;
    out.flush()
}

/// Drop lines that arrived before the current question; they answer a prompt
/// that already timed out
fn discard_pending(lines: &Receiver<String>) -> usize {
    lines.try_iter().count()
}

/// Never prompts; every proposal stays unanswered
#[derive(Debug, Default, Clone, Copy)]
pub struct DenyAll;

impl ConfirmationPort for DenyAll {
    fn confirm(&mut self, proposal: &ProposedMatch) -> Result<Verdict> {
        warn!(
            "Not confirming '{}' -> '{}' (score {:.3}) in a non-interactive run",
            proposal.raw_name, proposal.matched_name, proposal.score
        );
        Ok(Verdict::Unanswered)
    }
}

/// Pre-recorded answers (for testing)
///
/// Records every proposal it is shown. Running out of answers is an error so
/// an unexpected prompt fails the test instead of blocking.
#[derive(Debug, Default)]
pub struct ScriptedConfirmation {
    answers: VecDeque<Verdict>,
    proposals: Vec<ProposedMatch>,
}

impl ScriptedConfirmation {
    /// Create a port that replies with `answers` in order
    pub fn new(answers: impl IntoIterator<Item = Verdict>) -> Self {
        Self { answers: answers.into_iter().collect(), proposals: Vec::new() }
    }

    /// Every proposal shown so far
    pub fn proposals(&self) -> &[ProposedMatch] {
        &self.proposals
    }
}

impl ConfirmationPort for ScriptedConfirmation {
    fn confirm(&mut self, proposal: &ProposedMatch) -> Result<Verdict> {
        self.proposals.push(proposal.clone());
        self.answers.pop_front().ok_or_else(|| {
            ResolveError::Confirmation(format!(
                "unexpected prompt for '{}': no scripted answer left",
                proposal.raw_name
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proposal() -> ProposedMatch {
        ProposedMatch {
            raw_name: "Jon Smith".to_string(),
            matched_name: "John Smith".to_string(),
            player_id: 42,
            score: 0.947,
        }
    }

    #[test]
    fn test_parse_answer() {
        assert_eq!(parse_answer("y\n"), Verdict::NoMatch);
        assert_eq!(parse_answer(" YES "), Verdict::NoMatch);
        assert_eq!(parse_answer("n"), Verdict::AcceptMatch);
        assert_eq!(parse_answer(""), Verdict::AcceptMatch);
        assert_eq!(parse_answer("yeah"), Verdict::AcceptMatch);
    }

    #[test]
    fn test_scripted_confirmation() {
        let mut port = ScriptedConfirmation::new([Verdict::NoMatch]);

        assert_eq!(port.confirm(&proposal()).unwrap(), Verdict::NoMatch);
        assert!(matches!(port.confirm(&proposal()), Err(ResolveError::Confirmation(_))));
        assert_eq!(port.proposals().len(), 2);
        assert_eq!(port.proposals()[0].matched_name, "John Smith");
    }

    #[test]
    fn test_prompt_text() {
        let mut out = Vec::new();
        write_prompt(&mut out, &proposal()).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("'Jon Smith' -> 'John Smith' (player 42, similarity 0.95)"));
        assert!(text.contains("Jon Smith"));
        assert!(text.trim_end().ends_with("[y/N]"));
    }

    #[test]
    fn test_discard_pending_drops_early_answers() {
        let (tx, rx) = channel::unbounded();
        tx.send("y".to_string()).unwrap();
        tx.send("n".to_string()).unwrap();

        assert_eq!(discard_pending(&rx), 2);
        assert_eq!(discard_pending(&rx), 0);

        tx.send("y".to_string()).unwrap();
        assert_eq!(rx.recv_timeout(Duration::from_millis(10)).unwrap(), "y");
    }

    #[test]
    fn test_deny_all() {
        let mut port = DenyAll;
        assert_eq!(port.confirm(&proposal()).unwrap(), Verdict::Unanswered);
    }

    #[test]
    fn test_boxed_port() {
        let mut port: Box<dyn ConfirmationPort> = Box::new(ScriptedConfirmation::new([Verdict::AcceptMatch]));
        assert_eq!(port.confirm(&proposal()).unwrap(), Verdict::AcceptMatch);
    }
}
