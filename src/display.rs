use std::io::{self, Write};

use clap::ValueEnum;
use crossterm::{
    queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
};
use unicode_width::UnicodeWidthStr;

use crate::stats::{Attempt, SessionReport};

const MAX_RULE_WIDTH: usize = 72;

/// What the user sees before typing a verse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersePrompt<'a> {
    pub number: u32,
    pub position: usize,
    pub total: usize,
    pub text: &'a str,
}

/// Presentation side of a typing session
pub trait SessionDisplay {
    fn present_verse(&mut self, prompt: &VersePrompt<'_>) -> io::Result<()>;
    fn show_outcome(&mut self, attempt: &Attempt) -> io::Result<()>;
    fn show_report(&mut self, report: &SessionReport) -> io::Result<()>;
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, ValueEnum, strum_macros::Display)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

/// Styled line-oriented output for an interactive terminal.
/// Verse prompts and outcomes go to `prompts`, the final report to `report`.
pub struct TerminalDisplay<W: Write, R: Write> {
    prompts: W,
    report: R,
    report_format: ReportFormat,
}

impl TerminalDisplay<Box<dyn Write>, io::Stdout> {
    /// Report on stdout. With a JSON report the interactive output moves to
    /// stderr so stdout carries nothing but the JSON document.
    pub fn stdout(report_format: ReportFormat) -> Self {
        let prompts: Box<dyn Write> = match report_format {
            ReportFormat::Text => Box::new(io::stdout()),
            ReportFormat::Json => Box::new(io::stderr()),
        };
        Self::new(prompts, io::stdout(), report_format)
    }
}

impl<W: Write, R: Write> TerminalDisplay<W, R> {
    pub fn new(prompts: W, report: R, report_format: ReportFormat) -> Self {
        Self {
            prompts,
            report,
            report_format,
        }
    }

    pub fn into_inner(self) -> (W, R) {
        (self.prompts, self.report)
    }

    fn write_text_report(&mut self, report: &SessionReport) -> io::Result<()> {
        let totals = &report.totals;
        let name = report.passage.as_deref().unwrap_or("Chapter");
        let heading = if report.completed {
            format!("{name} complete")
        } else {
            format!("{name} (stopped early)")
        };

        queue!(
            self.report,
            Print("\n"),
            SetAttribute(Attribute::Bold),
            Print(heading),
            SetAttribute(Attribute::Reset),
            Print("\n"),
            Print(format!(
                "verses typed  {}/{}\n",
                totals.total_verses, report.verses_in_chapter
            )),
            Print(format!(
                "exact matches {} ({}%)\n",
                totals.successes,
                report.accuracy()
            )),
            Print(format!("total time    {}s\n", totals.total_secs)),
            Print(format!("matched time  {}s\n", totals.successful_secs)),
        )?;
        if let Some(avg) = report.average_secs() {
            queue!(self.report, Print(format!("avg per verse {avg:.1}s\n")))?;
        }
        self.report.flush()
    }

    fn write_json_report(&mut self, report: &SessionReport) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut self.report, report)?;
        writeln!(self.report)?;
        self.report.flush()
    }
}

impl<W: Write, R: Write> SessionDisplay for TerminalDisplay<W, R> {
    fn present_verse(&mut self, prompt: &VersePrompt<'_>) -> io::Result<()> {
        let rule = "\u{2500}".repeat(prompt.text.width().clamp(1, MAX_RULE_WIDTH));
        queue!(
            self.prompts,
            Print("\n"),
            SetForegroundColor(Color::Magenta),
            Print(format!(
                "Verse {} ({}/{})",
                prompt.number, prompt.position, prompt.total
            )),
            ResetColor,
            Print("\n"),
            Print(prompt.text),
            Print("\n"),
            SetAttribute(Attribute::Dim),
            Print(rule),
            SetAttribute(Attribute::Reset),
            Print("\n"),
        )?;
        self.prompts.flush()
    }

    fn show_outcome(&mut self, attempt: &Attempt) -> io::Result<()> {
        let (color, label) = if attempt.matched {
            (Color::Green, "Correct")
        } else {
            (Color::Red, "Incorrect")
        };
        queue!(
            self.prompts,
            SetForegroundColor(color),
            SetAttribute(Attribute::Bold),
            Print(label),
            SetAttribute(Attribute::Reset),
            ResetColor,
            Print(format!(" in {}s\n", attempt.elapsed_secs)),
        )?;
        self.prompts.flush()
    }

    fn show_report(&mut self, report: &SessionReport) -> io::Result<()> {
        match self.report_format {
            ReportFormat::Text => self.write_text_report(report),
            ReportFormat::Json => self.write_json_report(report),
        }
    }
}

/// Everything a session sent to the display, in order
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayEvent {
    Verse {
        number: u32,
        position: usize,
        total: usize,
        text: String,
    },
    Outcome(Attempt),
    Report(SessionReport),
}

/// Test display that records events instead of drawing them
#[derive(Debug, Default)]
pub struct RecordingDisplay {
    pub events: Vec<DisplayEvent>,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn outcomes(&self) -> Vec<Attempt> {
        self.events
            .iter()
            .filter_map(|e| match e {
                DisplayEvent::Outcome(a) => Some(*a),
                _ => None,
            })
            .collect()
    }

    pub fn report(&self) -> Option<&SessionReport> {
        self.events.iter().rev().find_map(|e| match e {
            DisplayEvent::Report(r) => Some(r),
            _ => None,
        })
    }
}

impl SessionDisplay for RecordingDisplay {
    fn present_verse(&mut self, prompt: &VersePrompt<'_>) -> io::Result<()> {
        self.events.push(DisplayEvent::Verse {
            number: prompt.number,
            position: prompt.position,
            total: prompt.total,
            text: prompt.text.to_string(),
        });
        Ok(())
    }

    fn show_outcome(&mut self, attempt: &Attempt) -> io::Result<()> {
        self.events.push(DisplayEvent::Outcome(*attempt));
        Ok(())
    }

    fn show_report(&mut self, report: &SessionReport) -> io::Result<()> {
        self.events.push(DisplayEvent::Report(report.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::SessionAggregator;

    fn buffered(format: ReportFormat) -> TerminalDisplay<Vec<u8>, Vec<u8>> {
        TerminalDisplay::new(Vec::new(), Vec::new(), format)
    }

    fn rendered(display: TerminalDisplay<Vec<u8>, Vec<u8>>) -> (String, String) {
        let (prompts, report) = display.into_inner();
        (
            String::from_utf8(prompts).unwrap(),
            String::from_utf8(report).unwrap(),
        )
    }

    #[test]
    fn test_present_verse_shows_position_and_text() {
        let mut display = buffered(ReportFormat::Text);
        display
            .present_verse(&VersePrompt {
                number: 16,
                position: 3,
                total: 36,
                text: "For God so loved the world,",
            })
            .unwrap();

        let (out, report) = rendered(display);
        assert!(report.is_empty());
        assert!(out.contains("Verse 16 (3/36)"));
        assert!(out.contains("For God so loved the world,"));
    }

    #[test]
    fn test_outcome_messages() {
        let mut display = buffered(ReportFormat::Text);
        display
            .show_outcome(&Attempt {
                verse_number: 1,
                elapsed_secs: 7,
                matched: true,
            })
            .unwrap();
        display
            .show_outcome(&Attempt {
                verse_number: 2,
                elapsed_secs: 4,
                matched: false,
            })
            .unwrap();

        let (out, _) = rendered(display);
        assert!(out.contains("Correct"));
        assert!(out.contains(" in 7s"));
        assert!(out.contains("Incorrect"));
        assert!(out.contains(" in 4s"));
    }

    #[test]
    fn test_text_report_lists_totals() {
        let mut agg = SessionAggregator::new();
        agg.record(&Attempt {
            verse_number: 1,
            elapsed_secs: 12,
            matched: true,
        });
        let report = agg.finish(2, false).with_passage("John 3");

        let mut display = buffered(ReportFormat::Text);
        display.show_report(&report).unwrap();

        let (prompts, out) = rendered(display);
        assert!(prompts.is_empty());
        assert!(out.contains("John 3 (stopped early)"));
        assert!(out.contains("verses typed  1/2"));
        assert!(out.contains("total time    12s"));
    }

    #[test]
    fn test_json_report_is_parseable() {
        let report = SessionAggregator::new().finish(3, true);

        let mut display = buffered(ReportFormat::Json);
        display.show_report(&report).unwrap();

        let (_, out) = rendered(display);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["verses_in_chapter"], 3);
        assert_eq!(value["total_secs"], 0);
    }

    #[test]
    fn test_json_report_stays_separate_from_prompts() {
        let mut display = buffered(ReportFormat::Json);
        display
            .present_verse(&VersePrompt {
                number: 1,
                position: 1,
                total: 1,
                text: "Jesus wept.",
            })
            .unwrap();
        display
            .show_outcome(&Attempt {
                verse_number: 1,
                elapsed_secs: 2,
                matched: false,
            })
            .unwrap();
        display
            .show_report(&SessionAggregator::new().finish(1, true))
            .unwrap();

        let (prompts, report) = rendered(display);
        assert!(prompts.contains("Incorrect"));
        assert!(!report.contains("Verse 1"));
        let value: serde_json::Value = serde_json::from_str(&report).unwrap();
        assert_eq!(value["completed"], true);
    }
}
