use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

mod common;
use common::{ALICE, BOB, CAROL, DEST, approve, command_file, create, fund};

#[test]
fn test_partial_approval_flow() {
    let file = command_file(&[
        fund("10.0"),
        create(ALICE, "1.5", DEST),
        approve(ALICE, 0),
    ]);

    let mut cmd = Command::new(cargo_bin!("quorumvault"));
    cmd.arg(file.path())
        .arg("--signers")
        .arg(format!("{ALICE},{BOB}"))
        .arg("--quorum")
        .arg("2");

    // One approval out of two: the transfer is still pending, and the default
    // viewer (the first signer) has already approved it.
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "id,amount,to,approvals,executed,already_approved",
        ))
        .stdout(predicate::str::contains(format!("0,1.5,{DEST},1,false,true")));
}

#[test]
fn test_viewer_sees_own_approval_state() {
    let file = command_file(&[
        fund("10.0"),
        create(ALICE, "1.5", DEST),
        approve(ALICE, 0),
    ]);

    let mut cmd = Command::new(cargo_bin!("quorumvault"));
    cmd.arg(file.path())
        .arg("--signers")
        .arg(format!("{ALICE},{BOB}"))
        .arg("--quorum")
        .arg("2")
        .arg("--viewer")
        .arg(BOB);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(format!("0,1.5,{DEST},1,false,false")));
}

#[test]
fn test_quorum_executes_and_late_approval_is_rejected() {
    let file = command_file(&[
        fund("10.0"),
        create(ALICE, "1.5", DEST),
        approve(ALICE, 0),
        approve(BOB, 0),
        approve(CAROL, 0), // Quorum already reached and paid out
    ]);

    let mut cmd = Command::new(cargo_bin!("quorumvault"));
    cmd.arg(file.path())
        .arg("--signers")
        .arg(format!("{ALICE},{BOB},{CAROL}"))
        .arg("--quorum")
        .arg("2");

    // Executed transfer means "ready for a new proposal": header, no row.
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("already executed"))
        .stdout(predicate::str::contains(
            "id,amount,to,approvals,executed,already_approved",
        ))
        .stdout(predicate::str::contains("0,1.5").not());
}

#[test]
fn test_new_proposal_supersedes_old() {
    let file = command_file(&[
        fund("10.0"),
        create(ALICE, "1.5", DEST),
        create(ALICE, "2.5", DEST),
        approve(BOB, 0), // Stale: transfer 1 superseded transfer 0
    ]);

    let mut cmd = Command::new(cargo_bin!("quorumvault"));
    cmd.arg(file.path())
        .arg("--signers")
        .arg(format!("{ALICE},{BOB}"))
        .arg("--quorum")
        .arg("2");

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("is stale"))
        .stdout(predicate::str::contains(format!("1,2.5,{DEST},0,false,false")));
}
