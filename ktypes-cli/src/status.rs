use colored::*;

/// A coloured, right-aligned tag followed by a message, printed to stderr.
pub enum Status {
    Info,
    Success,
    Warn,
    Fatal,
}

impl Status {
    fn tag(&self) -> ColoredString {
        match self {
            Status::Info => "Info".blue(),
            Status::Success => "Success".green(),
            Status::Warn => "Warning".yellow(),
            Status::Fatal => "Fatal".red(),
        }
        .bold()
    }

    /// Continuation lines are indented under the first.
    pub fn log(&self, message: &str) {
        let mut lines = message.lines();
        eprintln!("{:>12} {}", self.tag(), lines.next().unwrap_or_default());
        for line in lines {
            eprintln!("{:>12} {}", "", line);
        }
    }
}
