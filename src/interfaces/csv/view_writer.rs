use crate::domain::transfer::TransferView;
use crate::error::Result;
use std::io::Write;

/// Writes the current-transfer projection as CSV: a header followed by zero
/// or one rows. No row means the system is ready for a new proposal.
pub struct ViewWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ViewWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::WriterBuilder::new().from_writer(sink),
        }
    }

    pub fn write_view(&mut self, view: Option<&TransferView>) -> Result<()> {
        self.writer.write_record([
            "id",
            "amount",
            "to",
            "approvals",
            "executed",
            "already_approved",
        ])?;
        if let Some(view) = view {
            self.writer.write_record([
                view.id.to_string(),
                view.amount.value().to_string(),
                view.to.to_string(),
                view.approvals.to_string(),
                view.executed.to_string(),
                view.already_approved.to_string(),
            ])?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::transfer::{Amount, Transfer, TransferView};
    use rust_decimal_macros::dec;

    const DEST: &str = "0xdddddddddddddddddddddddddddddddddddddddd";

    #[test]
    fn test_write_view_row() {
        let mut transfer = Transfer::new(
            0,
            Amount::new(dec!(1.5)).unwrap(),
            DEST.parse().unwrap(),
        );
        transfer.record_approval().unwrap();
        let view = TransferView::project(&transfer, true);

        let mut out = Vec::new();
        ViewWriter::new(&mut out).write_view(Some(&view)).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("id,amount,to,approvals,executed,already_approved\n"));
        assert!(text.contains(&format!("0,1.5,{DEST},1,false,true")));
    }

    #[test]
    fn test_write_empty_view() {
        let mut out = Vec::new();
        ViewWriter::new(&mut out).write_view(None).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "id,amount,to,approvals,executed,already_approved\n");
    }
}
