use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use crossbeam_channel::{SendError, Sender};
use log::warn;

use crate::intent::{Direction, Intent};

/// Keypress script for headless runs: `wasd`/`hjkl` move, `.` waits, `q`
/// quits, `#` starts a comment line.
#[derive(Clone, Debug, Default)]
pub struct ScriptedInput {
    intents: Vec<Intent>,
    cursor: usize,
}

impl ScriptedInput {
    pub fn from_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: BufRead>(reader: R) -> io::Result<Self> {
        let mut script = Self::default();
        for line in reader.lines() {
            script.push_line(&line?);
        }
        Ok(script)
    }

    pub fn parse(text: &str) -> Self {
        let mut script = Self::default();
        for line in text.lines() {
            script.push_line(line);
        }
        script
    }

    fn push_line(&mut self, line: &str) {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return;
        }
        for key in trimmed.chars().filter(|c| !c.is_whitespace()) {
            match key_to_intent(key) {
                Some(intent) => self.intents.push(intent),
                None => warn!("unknown key in script: {key:?}"),
            }
        }
    }

    pub fn remaining(&self) -> usize {
        self.intents.len() - self.cursor
    }

    pub fn next_intent(&mut self) -> Option<Intent> {
        let intent = self.intents.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(intent)
    }

    /// Sends the rest of the script into a game's intent queue.
    pub fn feed(&mut self, tx: &Sender<Intent>) -> Result<usize, SendError<Intent>> {
        let mut sent = 0;
        while let Some(intent) = self.next_intent() {
            tx.send(intent)?;
            sent += 1;
        }
        Ok(sent)
    }
}

impl Iterator for ScriptedInput {
    type Item = Intent;

    fn next(&mut self) -> Option<Intent> {
        self.next_intent()
    }
}

fn key_to_intent(c: char) -> Option<Intent> {
    let dir = match c.to_ascii_lowercase() {
        'w' | 'k' => Direction::Up,
        's' | 'j' => Direction::Down,
        'a' | 'h' => Direction::Left,
        'd' | 'l' => Direction::Right,
        '.' => return Some(Intent::None),
        'q' | '\x1B' => return Some(Intent::QuitGame),
        _ => return None,
    };
    Some(Intent::Move(dir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_keys_and_skips_comments() {
        let text = "# walk a square\nwdsa\n\n. q\n";
        let script = ScriptedInput::from_reader(Cursor::new(text)).unwrap();
        let intents: Vec<Intent> = script.collect();
        assert_eq!(
            intents,
            vec![
                Intent::Move(Direction::Up),
                Intent::Move(Direction::Right),
                Intent::Move(Direction::Down),
                Intent::Move(Direction::Left),
                Intent::None,
                Intent::QuitGame,
            ]
        );
    }

    #[test]
    fn vi_keys_match_wasd() {
        let vi: Vec<Intent> = ScriptedInput::parse("kjhl").collect();
        let wasd: Vec<Intent> = ScriptedInput::parse("WSAD").collect();
        assert_eq!(vi, wasd);
    }

    #[test]
    fn unknown_keys_are_skipped() {
        let script = ScriptedInput::parse("w?z\nd");
        assert_eq!(script.remaining(), 2);
    }

    #[test]
    fn feed_drains_into_channel() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut script = ScriptedInput::parse("ww.");
        assert_eq!(script.feed(&tx).unwrap(), 3);
        assert_eq!(script.remaining(), 0);
        assert_eq!(rx.try_iter().count(), 3);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(ScriptedInput::from_file("/definitely/not/here.txt").is_err());
    }
}
