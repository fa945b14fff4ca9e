use std::io::{BufRead, Write};

use tracing::warn;

use crate::stages::NameProvider;

/// Asks for each speaker's name on a line-oriented console
///
/// An empty line, end of input or a read error all mean "no name".
pub struct PromptNameProvider<R, W> {
    input: R,
    output: W,
    greeted: bool,
}

impl<R: BufRead, W: Write> PromptNameProvider<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            greeted: false,
        }
    }
}

impl PromptNameProvider<std::io::StdinLock<'static>, std::io::Stdout> {
    /// Prompt on the process's stdin/stdout
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> NameProvider for PromptNameProvider<R, W> {
    fn name_for(&mut self, speaker_id: &str) -> Option<String> {
        if !self.greeted {
            let _ = writeln!(self.output, "\nPlease enter a name for each speaker:");
            self.greeted = true;
        }
        let question = format!("Name for {speaker_id} (e.g. CEO, CTO, John...): ");
        ask(&mut self.input, &mut self.output, &question)
    }
}

/// Ask for the expected number of speakers
///
/// A plain positive integer is used as the count. Anything else, including
/// a blank answer or zero, means automatic detection.
pub fn prompt_speaker_count<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Option<u32> {
    let answer = ask(
        input,
        output,
        "Enter the expected number of speakers (leave blank for automatic detection): ",
    )?;
    parse_speaker_count(&answer)
}

fn parse_speaker_count(answer: &str) -> Option<u32> {
    let answer = answer.trim();
    if answer.is_empty() || !answer.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    answer.parse::<u32>().ok().filter(|&n| n > 0)
}

/// Print `question`, read one line, and return it trimmed
fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> Option<String> {
    let _ = write!(output, "{question}");
    let _ = output.flush();

    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => Some(line.trim().to_string()),
        Err(e) => {
            warn!("Failed to read answer: {}", e);
            None
        }
    }
}
