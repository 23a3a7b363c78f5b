use crate::domain::command::Command;
use crate::error::{Result, TransferError};
use std::io::Read;

/// Reads coordinator commands from a CSV source.
///
/// This reader wraps `csv::Reader` and provides an iterator over
/// `Result<Command>`. It handles whitespace trimming and flexible record
/// lengths automatically.
pub struct CommandReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CommandReader<R> {
    /// Creates a new `CommandReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes commands, so
    /// large files stream without loading into memory.
    pub fn commands(self) -> impl Iterator<Item = Result<Command>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(TransferError::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::command::CommandAction;
    use rust_decimal_macros::dec;

    #[test]
    fn test_reader_valid_stream() {
        let data = "action, signer, amount, to, id\n\
                    fund, , 10.0, , \n\
                    approve, 0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa, , , 0";
        let reader = CommandReader::new(data.as_bytes());
        let results: Vec<Result<Command>> = reader.commands().collect();

        assert_eq!(results.len(), 2);
        let fund = results[0].as_ref().unwrap();
        assert_eq!(fund.action, CommandAction::Fund);
        assert_eq!(fund.amount, Some(dec!(10.0)));
        let approve = results[1].as_ref().unwrap();
        assert_eq!(approve.action, CommandAction::Approve);
        assert_eq!(approve.id, Some(0));
    }

    #[test]
    fn test_reader_malformed_line() {
        let data = "action, signer, amount, to, id\nrevoke, , , , 0";
        let reader = CommandReader::new(data.as_bytes());
        let results: Vec<Result<Command>> = reader.commands().collect();

        assert!(results[0].is_err());
    }
}
