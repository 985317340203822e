use std::io;

use tracing::{debug, warn};

use crate::display::{SessionDisplay, VersePrompt};
use crate::runtime::{Clock, LineSource, Pacer};
use crate::stats::{Attempt, SessionAggregator, SessionReport};
use crate::util::{trim_line_terminator, whole_secs_between};
use crate::verse::Verse;

/// Where a session is in its single forward pass over the verses.
/// Indices are zero-based positions in the verse list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum SessionPhase {
    Idle,
    Presenting(usize),
    AwaitingInput(usize),
    Scoring(usize),
    Done,
    /// Input closed while waiting on this verse
    Terminated(usize),
}

impl SessionPhase {
    pub fn is_finished(&self) -> bool {
        matches!(self, SessionPhase::Done | SessionPhase::Terminated(_))
    }
}

/// Exact, byte-for-byte comparison of a typed line against the verse.
pub fn is_exact_match(typed: &str, verse: &Verse) -> bool {
    typed == verse.text
}

/// Drives one pass over a chapter: present, time, score, aggregate.
pub struct TypingSession<L, C, P, D> {
    verses: Vec<Verse>,
    lines: L,
    clock: C,
    pacer: P,
    display: D,
    phase: SessionPhase,
    aggregator: SessionAggregator,
    passage: Option<String>,
    report: Option<SessionReport>,
}

impl<L, C, P, D> TypingSession<L, C, P, D>
where
    L: LineSource,
    C: Clock,
    P: Pacer,
    D: SessionDisplay,
{
    pub fn new(verses: Vec<Verse>, lines: L, clock: C, pacer: P, display: D) -> Self {
        Self {
            verses,
            lines,
            clock,
            pacer,
            display,
            phase: SessionPhase::Idle,
            aggregator: SessionAggregator::new(),
            passage: None,
            report: None,
        }
    }

    /// Label the final report with the passage reference.
    pub fn with_passage(mut self, passage: impl Into<String>) -> Self {
        self.passage = Some(passage.into());
        self
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn into_display(self) -> D {
        self.display
    }

    fn transition(&mut self, next: SessionPhase) {
        debug!(from = %self.phase, to = %next, "session phase");
        self.phase = next;
    }

    /// Type the verse at the current position.
    /// Returns `Ok(None)` once the session has finished, either after the last
    /// verse or because the input closed.
    pub fn step(&mut self) -> io::Result<Option<Attempt>> {
        let index = match self.phase {
            SessionPhase::Idle => 0,
            SessionPhase::Presenting(i) => i,
            SessionPhase::Done | SessionPhase::Terminated(_) => return Ok(None),
            SessionPhase::AwaitingInput(i) | SessionPhase::Scoring(i) => i,
        };

        if index >= self.verses.len() {
            self.transition(SessionPhase::Done);
            return Ok(None);
        }

        self.transition(SessionPhase::Presenting(index));
        let verse = &self.verses[index];
        self.display.present_verse(&VersePrompt {
            number: verse.number,
            position: index + 1,
            total: self.verses.len(),
            text: &verse.text,
        })?;

        self.transition(SessionPhase::AwaitingInput(index));
        let started = self.clock.now();
        let Some(line) = self.lines.read_line()? else {
            self.transition(SessionPhase::Terminated(index));
            return Ok(None);
        };
        let finished = self.clock.now();

        self.transition(SessionPhase::Scoring(index));
        let verse = &self.verses[index];
        let attempt = Attempt {
            verse_number: verse.number,
            elapsed_secs: whole_secs_between(started, finished),
            matched: is_exact_match(trim_line_terminator(&line), verse),
        };
        self.display.show_outcome(&attempt)?;
        self.aggregator.record(&attempt);

        let next = index + 1;
        if next < self.verses.len() {
            self.pacer.pause();
            self.transition(SessionPhase::Presenting(next));
        } else {
            self.transition(SessionPhase::Done);
        }
        Ok(Some(attempt))
    }

    /// Run the session to the end (or until input closes) and report.
    ///
    /// The report is shown even when reading input fails; the error is
    /// returned afterwards. Later calls return the same report.
    pub fn run(&mut self) -> io::Result<SessionReport> {
        if let Some(report) = &self.report {
            return Ok(report.clone());
        }

        let outcome = loop {
            match self.step() {
                Ok(Some(_)) => {}
                Ok(None) => break Ok(()),
                Err(e) => break Err(e),
            }
        };

        if let Err(e) = outcome {
            if let SessionPhase::Presenting(i)
            | SessionPhase::AwaitingInput(i)
            | SessionPhase::Scoring(i) = self.phase
            {
                self.transition(SessionPhase::Terminated(i));
            }
            let report = self.finish_report();
            warn!(
                verses = report.totals.total_verses,
                successes = report.totals.successes,
                secs = report.totals.total_secs,
                "session stopped by input error: {e}"
            );
            if let Err(display_err) = self.display.show_report(&report) {
                warn!("could not show partial report: {display_err}");
            }
            return Err(e);
        }

        let report = self.finish_report();
        self.display.show_report(&report)?;
        Ok(report)
    }

    fn finish_report(&mut self) -> SessionReport {
        let aggregator = std::mem::take(&mut self.aggregator);
        let completed = self.phase == SessionPhase::Done;
        let mut report = aggregator.finish(self.verses.len(), completed);
        if let Some(passage) = &self.passage {
            report = report.with_passage(passage.clone());
        }
        self.report = Some(report.clone());
        report
    }
}
