use async_trait::async_trait;
use std::io;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

/// Source of operator input, one line per prompt
#[async_trait]
pub trait InputProvider: Send {
    /// The next line without its terminator, or `None` once input is exhausted
    async fn read_line(&mut self) -> io::Result<Option<String>>;
}

/// Reads operator input from the process's standard input
pub struct StdinInput {
    lines: Lines<BufReader<Stdin>>,
}

impl StdinInput {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

impl Default for StdinInput {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InputProvider for StdinInput {
    async fn read_line(&mut self) -> io::Result<Option<String>> {
        self.lines.next_line().await
    }
}

/// Replays a fixed list of lines, then reports end of input
#[cfg(test)]
pub struct ScriptedInput {
    lines: std::collections::VecDeque<String>,
}

#[cfg(test)]
impl ScriptedInput {
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

#[cfg(test)]
#[async_trait]
impl InputProvider for ScriptedInput {
    async fn read_line(&mut self) -> io::Result<Option<String>> {
        Ok(self.lines.pop_front())
    }
}
