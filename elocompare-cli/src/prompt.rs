/// Terminal choice provider.
///
/// Shows both items as numbered options and reads the answer from a line
/// based input. `1` or `2` picks, `q` ends the session. End of input also
/// ends the session.
use elocompare_core::{Choice, ChoiceProvider};
use std::io::{BufRead, Write};

pub const QUESTION: &str = "Which of the two items below do you prefer?";

pub struct TerminalJudge<R, W> {
    input: R,
    output: W,
    shown: usize,
    max_rounds: usize,
}

impl<R: BufRead, W: Write> TerminalJudge<R, W> {
    pub fn new(input: R, output: W, max_rounds: usize) -> Self {
        TerminalJudge { input, output, shown: 0, max_rounds }
    }

    fn show_pair(&mut self, first: &str, second: &str) -> std::io::Result<()> {
        writeln!(self.output, "\n[{}/{}] {QUESTION}", self.shown, self.max_rounds)?;
        writeln!(self.output, "  1) {first}")?;
        writeln!(self.output, "  2) {second}")?;
        self.output.flush()
    }

    fn read_answer(&mut self) -> std::io::Result<Choice> {
        loop {
            write!(self.output, "Your choice (1/2, q to finish): ")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(Choice::Stop);
            }
            if let Some(choice) = parse_answer(&line) {
                return Ok(choice);
            }
            writeln!(self.output, "Please enter 1, 2 or q.")?;
        }
    }
}

impl<R: BufRead, W: Write> ChoiceProvider for TerminalJudge<R, W> {
    fn choose(&mut self, first: &str, second: &str) -> Choice {
        self.shown += 1;
        let answer = self.show_pair(first, second).and_then(|_| self.read_answer());
        match answer {
            Ok(choice) => choice,
            Err(e) => {
                tracing::warn!(error = %e, "Terminal IO failed, finishing session");
                Choice::Stop
            }
        }
    }
}

/// Map one line of user input to a choice. `None` means "ask again".
pub fn parse_answer(line: &str) -> Option<Choice> {
    match line.trim().to_ascii_lowercase().as_str() {
        "1" => Some(Choice::First),
        "2" => Some(Choice::Second),
        "q" | "quit" | "stop" => Some(Choice::Stop),
        _ => None,
    }
}
