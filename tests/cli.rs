// cli.rs

use std::io::Write;
use std::process::{Command, Output, Stdio};

const PROMPT: &str = "rashell> ";

fn run_shell(input: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_rashell"))
        .env_remove("RASHELL_LOG")
        .env_remove("RASHELL_HISTSIZE")
        .env_remove("RASHELL_MAX_LINE")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn rashell");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(input.as_bytes())
        .expect("write input");
    child.wait_with_output().expect("wait for rashell")
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("utf8 stdout")
}

#[test]
fn prompt_is_printed_before_every_read() {
    let output = run_shell("echo hi\nexit\n");
    assert_eq!(stdout_of(&output), "rashell> hi\nrashell> ");
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn recall_reruns_and_history_lists_the_new_id() {
    let output = run_shell("echo hi\n!1\nhistory\n!99\nexit\n");
    let expected = [
        PROMPT,
        "hi\n",
        PROMPT,
        "hi\n",
        PROMPT,
        "       1 echo hi\n",
        "       2 echo hi\n",
        "       3 history\n",
        PROMPT,
        "!99: event not found\n",
        PROMPT,
    ]
    .concat();
    assert_eq!(stdout_of(&output), expected);
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn end_of_input_exits_cleanly() {
    let output = run_shell("echo hi\n");
    assert_eq!(stdout_of(&output), "rashell> hi\nrashell> ");
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn missing_program_is_reported_and_recorded() {
    let output = run_shell("no-such-program-for-rashell -x\nhistory\nexit\n");
    let expected = [
        PROMPT,
        "no-such-program-for-rashell -x: command not found\n",
        PROMPT,
        "       1 no-such-program-for-rashell -x\n",
        "       2 history\n",
        PROMPT,
    ]
    .concat();
    assert_eq!(stdout_of(&output), expected);
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn blank_lines_only_reprompt() {
    let output = run_shell("\n   \nhistory\nexit\n");
    let expected = [PROMPT, PROMPT, PROMPT, "       1 history\n", PROMPT].concat();
    assert_eq!(stdout_of(&output), expected);
}
