use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, BufRead};
use std::thread;
use std::time::{Duration, SystemTime};

/// Source of typed attempts, one line per verse
pub trait LineSource {
    /// Block until a full line is available.
    /// Returns Ok(None) once the input stream is closed.
    fn read_line(&mut self) -> io::Result<Option<String>>;
}

/// Production line source reading from any buffered reader (stdin in the binary)
pub struct ReaderLineSource<R: BufRead> {
    reader: R,
}

impl<R: BufRead> ReaderLineSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl ReaderLineSource<io::StdinLock<'static>> {
    pub fn stdin() -> Self {
        Self::new(io::stdin().lock())
    }
}

impl<R: BufRead> LineSource for ReaderLineSource<R> {
    // Bytes that are not UTF-8 become U+FFFD, so the attempt just fails to match.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut buf = Vec::new();
        match self.reader.read_until(b'\n', &mut buf)? {
            0 => Ok(None),
            _ => Ok(Some(String::from_utf8_lossy(&buf).into_owned())),
        }
    }
}

/// Test line source replaying a fixed script, then reporting end-of-input
pub struct ScriptedLines {
    lines: VecDeque<String>,
}

impl ScriptedLines {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl LineSource for ScriptedLines {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        Ok(self.lines.pop_front())
    }
}

/// Wall clock used to time each attempt
pub trait Clock {
    fn now(&self) -> SystemTime;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Test clock handing out a fixed sequence of instants.
/// Once exhausted it keeps returning the last one.
pub struct ScriptedClock {
    instants: RefCell<VecDeque<SystemTime>>,
    last: RefCell<SystemTime>,
}

impl ScriptedClock {
    pub fn new<I: IntoIterator<Item = SystemTime>>(instants: I) -> Self {
        Self {
            instants: RefCell::new(instants.into_iter().collect()),
            last: RefCell::new(SystemTime::UNIX_EPOCH),
        }
    }

    /// A clock where attempt `i` takes `durations[i]` seconds.
    /// Produces a start/end pair per attempt.
    pub fn from_attempt_secs(durations: &[u64]) -> Self {
        let mut t = SystemTime::UNIX_EPOCH;
        let mut instants = Vec::with_capacity(durations.len() * 2);
        for secs in durations {
            instants.push(t);
            t += Duration::from_secs(*secs);
            instants.push(t);
        }
        Self::new(instants)
    }
}

impl Clock for ScriptedClock {
    fn now(&self) -> SystemTime {
        if let Some(next) = self.instants.borrow_mut().pop_front() {
            *self.last.borrow_mut() = next;
        }
        *self.last.borrow()
    }
}

/// Pause between verses
pub trait Pacer {
    fn pause(&self);
}

/// Sleeps the current thread for a fixed interval
#[derive(Clone, Copy, Debug)]
pub struct FixedPause {
    interval: Duration,
}

impl FixedPause {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Default for FixedPause {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl Pacer for FixedPause {
    fn pause(&self) {
        thread::sleep(self.interval);
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoPause;

impl Pacer for NoPause {
    fn pause(&self) {}
}
