#![allow(dead_code)]

use std::io::Write;
use tempfile::NamedTempFile;

pub const ALICE: &str = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
pub const BOB: &str = "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";
pub const CAROL: &str = "0xcccccccccccccccccccccccccccccccccccccccc";
pub const DEST: &str = "0xdddddddddddddddddddddddddddddddddddddddd";
pub const MALLORY: &str = "0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee";

/// Writes a command CSV with the standard header plus the given rows.
pub fn command_file(rows: &[String]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "action, signer, amount, to, id").unwrap();
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
    file
}

pub fn fund(amount: &str) -> String {
    format!("fund, , {amount}, , ")
}

pub fn create(signer: &str, amount: &str, to: &str) -> String {
    format!("create, {signer}, {amount}, {to}, ")
}

pub fn approve(signer: &str, id: u64) -> String {
    format!("approve, {signer}, , , {id}")
}
