//! The agent binary accepts both port spellings and starts serving.
use std::process::Command;

use assert_cmd::prelude::*;

#[test]
fn starts_with_long_and_short_port_flags() {
    let mut child = Command::cargo_bin("kunlun_agent")
        .expect("agent binary")
        .args(["--port", "9555"])
        .spawn()
        .expect("spawn agent");
    std::thread::sleep(std::time::Duration::from_millis(150));
    let _ = child.kill();
    let _ = child.wait();

    let mut child2 = Command::cargo_bin("kunlun_agent")
        .expect("agent binary")
        .args(["-p", "9556"])
        .spawn()
        .expect("spawn agent");
    std::thread::sleep(std::time::Duration::from_millis(150));
    let _ = child2.kill();
    let _ = child2.wait();
}

#[test]
fn help_exits_cleanly() {
    Command::cargo_bin("kunlun_agent")
        .expect("agent binary")
        .arg("--help")
        .assert()
        .success();
}
