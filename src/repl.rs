//! Interactive line protocol: `add <text>`, `query <text>`, `quit`.

use crate::snippets::{QueryResult, SnippetStore};
use anyhow::Result;
use std::io::{BufRead, Write};
use tracing::debug;

const COMMAND_PROMPT: &str = "\nCommand (add/query/quit): ";
const ADD_PROMPT: &str = "Enter text to add: ";
const QUERY_PROMPT: &str = "Enter search query: ";
const DIVIDER_WIDTH: usize = 40;

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `add`, with inline text if any was given.
    Add(Option<String>),
    /// `query`, with inline text if any was given.
    Query(Option<String>),
    Quit,
    /// Anything else, including an empty line.
    Unknown(String),
}

impl Command {
    /// Parse a line: the verb is matched case-insensitively, the rest is kept verbatim.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim_start()),
            None => (line, ""),
        };
        let arg = (!rest.is_empty()).then(|| rest.to_string());

        match verb.to_lowercase().as_str() {
            "add" => Command::Add(arg),
            "query" => Command::Query(arg),
            "quit" => Command::Quit,
            _ => Command::Unknown(verb.to_string()),
        }
    }
}

/// Reads commands from `input` and writes responses to `output` until `quit`
/// or end of input.
pub struct CommandLoop<'s, R, W> {
    store: &'s mut SnippetStore,
    input: R,
    output: W,
    results: usize,
}

impl<'s, R: BufRead, W: Write> CommandLoop<'s, R, W> {
    pub fn new(store: &'s mut SnippetStore, input: R, output: W, results: usize) -> Self {
        Self {
            store,
            input,
            output,
            results,
        }
    }

    /// Run until `quit` or end of input. Storage failures are returned and end the loop.
    pub fn run(&mut self) -> Result<()> {
        writeln!(self.output, "Welcome to Chroma CLI")?;
        writeln!(
            self.output,
            "Type 'add <text>' to add input, 'query <text>' to search, or 'quit' to exit"
        )?;
        writeln!(self.output, "Examples: 'add dog' or 'query pet'")?;

        loop {
            let Some(line) = self.prompt(COMMAND_PROMPT)? else {
                debug!("input closed");
                writeln!(self.output)?;
                break;
            };

            match Command::parse(&line) {
                Command::Quit => {
                    writeln!(self.output, "Exiting Chroma CLI. Goodbye!")?;
                    break;
                }
                Command::Add(arg) => {
                    let text = self.text_or_prompt(arg, ADD_PROMPT)?;
                    if text.is_empty() {
                        writeln!(self.output, "Empty input not added.")?;
                        continue;
                    }
                    let id = self.store.add(&text)?;
                    writeln!(self.output, "Added input with ID: {id}")?;
                }
                Command::Query(arg) => {
                    let text = self.text_or_prompt(arg, QUERY_PROMPT)?;
                    if text.is_empty() {
                        writeln!(self.output, "Empty query not processed.")?;
                        continue;
                    }
                    let result = self.store.query(&text, self.results)?;
                    write_results(&mut self.output, &result)?;
                }
                Command::Unknown(verb) => {
                    debug!(%verb, "unknown command");
                    writeln!(
                        self.output,
                        "Unknown command. Available commands: add <text>, query <text>, quit"
                    )?;
                }
            }
        }

        self.output.flush()?;
        Ok(())
    }

    /// Use the inline argument, or ask for one more line. End of input reads as empty.
    fn text_or_prompt(&mut self, arg: Option<String>, prompt: &str) -> Result<String> {
        match arg {
            Some(text) => Ok(text),
            None => Ok(self
                .prompt(prompt)?
                .map(|line| line.trim().to_string())
                .unwrap_or_default()),
        }
    }

    fn prompt(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}

/// Print a query result as ranked blocks separated by divider lines.
pub fn write_results(out: &mut impl Write, result: &QueryResult) -> std::io::Result<()> {
    if result.is_empty() {
        return writeln!(out, "No matching documents found.");
    }

    let divider = "-".repeat(DIVIDER_WIDTH);
    writeln!(out, "\nQuery Results:")?;
    writeln!(out, "{divider}")?;
    for (rank, m) in result.iter().enumerate() {
        writeln!(out, "Result {}:", rank + 1)?;
        writeln!(out, "Document: {}", m.document)?;
        writeln!(out, "ID: {}", m.id)?;
        writeln!(out, "Distance: {:.4}", m.distance)?;
        writeln!(out, "{divider}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snippets::QueryMatch;

    #[test]
    fn test_parse_verbs() {
        assert_eq!(Command::parse("add dog"), Command::Add(Some("dog".into())));
        assert_eq!(Command::parse("query pet"), Command::Query(Some("pet".into())));
        assert_eq!(Command::parse("quit"), Command::Quit);
        assert_eq!(Command::parse("QUIT\n"), Command::Quit);
    }

    #[test]
    fn test_parse_without_argument() {
        assert_eq!(Command::parse("add"), Command::Add(None));
        assert_eq!(Command::parse("  query   \n"), Command::Query(None));
    }

    #[test]
    fn test_parse_keeps_argument_verbatim() {
        assert_eq!(
            Command::parse("Add   Hello   World!  "),
            Command::Add(Some("Hello   World!".into()))
        );
        assert_eq!(
            Command::parse("add\tTabbed text"),
            Command::Add(Some("Tabbed text".into()))
        );
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(Command::parse(""), Command::Unknown(String::new()));
        assert_eq!(Command::parse("delete x"), Command::Unknown("delete".into()));
        assert_eq!(Command::parse("adder x"), Command::Unknown("adder".into()));
    }

    #[test]
    fn test_write_empty_results() {
        let mut out = Vec::new();
        write_results(&mut out, &QueryResult::default()).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "No matching documents found.\n");
    }

    #[test]
    fn test_write_results_layout() {
        let result = QueryResult {
            matches: vec![
                QueryMatch {
                    document: "dog".into(),
                    id: "id-1".into(),
                    distance: 0.0,
                },
                QueryMatch {
                    document: "puppy".into(),
                    id: "id-2".into(),
                    distance: 1.234_56,
                },
            ],
        };

        let mut out = Vec::new();
        write_results(&mut out, &result).unwrap();

        let divider = "-".repeat(40);
        let expected = format!(
            "\nQuery Results:\n{d}\nResult 1:\nDocument: dog\nID: id-1\nDistance: 0.0000\n{d}\n\
             Result 2:\nDocument: puppy\nID: id-2\nDistance: 1.2346\n{d}\n",
            d = divider
        );
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }
}
