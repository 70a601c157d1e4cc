//! CLI integration tests for lineq
//!
//! These tests run the lineq binary and verify command-line behavior.

use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

/// Run lineq with the given arguments and input, returning (stdout, stderr,
/// exit code)
fn run_lineq(args: &[&str], input: Option<&str>) -> Result<(String, String, i32), String> {
    let mut cmd = Command::new("cargo");
    cmd.args(["run", "--quiet", "--"]);
    cmd.args(args);

    if input.is_some() {
        cmd.stdin(std::process::Stdio::piped());
    }
    cmd.stdout(std::process::Stdio::piped());
    cmd.stderr(std::process::Stdio::piped());

    let mut child = cmd.spawn().map_err(|e| e.to_string())?;

    if let Some(input_str) = input
        && let Some(mut stdin) = child.stdin.take()
    {
        stdin
            .write_all(input_str.as_bytes())
            .map_err(|e| e.to_string())?;
    }

    let output = child.wait_with_output().map_err(|e| e.to_string())?;

    Ok((
        String::from_utf8(output.stdout).map_err(|e| e.to_string())?,
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.code().unwrap_or(-1),
    ))
}

#[test]
fn test_cli_help() {
    let (stdout, _, code) = run_lineq(&["--help"], None).unwrap();
    assert!(stdout.contains("Usage:"));
    assert!(stdout.contains("lineq"));
    assert_eq!(code, 0);
}

#[test]
fn test_cli_version() {
    let (stdout, _, code) = run_lineq(&["--version"], None).unwrap();
    assert!(stdout.contains("lineq"));
    assert_eq!(code, 0);
}

#[test]
fn test_cli_filter_stdin() {
    let (stdout, _, code) =
        run_lineq(&["level=error"], Some("level=error a=1\nlevel=info b=2\n")).unwrap();
    assert_eq!(stdout, "level=error a=1\n");
    assert_eq!(code, 0);
}

#[test]
fn test_cli_no_match_exits_one() {
    let (stdout, _, code) = run_lineq(&["level=fatal"], Some("level=info\n")).unwrap();
    assert!(stdout.is_empty());
    assert_eq!(code, 1);
}

#[test]
fn test_cli_input_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "a=1 keep=yes").unwrap();
    writeln!(file, "a=2 keep=no").unwrap();

    let path = file.path().to_str().unwrap();
    let (stdout, _, _) = run_lineq(&["keep=yes", path], None).unwrap();
    assert_eq!(stdout, "a=1 keep=yes\n");
}

#[test]
fn test_cli_multiple_input_files() {
    let mut file1 = NamedTempFile::new().unwrap();
    writeln!(file1, "x=1").unwrap();
    let mut file2 = NamedTempFile::new().unwrap();
    writeln!(file2, "x=1 second=yes").unwrap();

    let path1 = file1.path().to_str().unwrap();
    let path2 = file2.path().to_str().unwrap();
    let (stdout, _, _) = run_lineq(&["x=1", path1, path2], None).unwrap();
    assert_eq!(stdout, "x=1\nx=1 second=yes\n");
}

#[test]
fn test_cli_field_delimiter() {
    let (stdout, _, _) = run_lineq(&["-F", ",", "b=2"], Some("a=1,b=2\na=1,b=3\n")).unwrap();
    assert_eq!(stdout, "a=1,b=2\n");
}

#[test]
fn test_cli_field_delimiter_attached() {
    let (stdout, _, _) = run_lineq(&["-F,", "b=2"], Some("a=1,b=2\n")).unwrap();
    assert_eq!(stdout, "a=1,b=2\n");
}

#[test]
fn test_cli_query_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "level=error").unwrap();

    let path = file.path().to_str().unwrap();
    let (stdout, _, _) = run_lineq(&["-q", path], Some("level=error ok=1\n")).unwrap();
    assert_eq!(stdout, "level=error ok=1\n");
}

#[test]
fn test_cli_stdin_dash() {
    let (stdout, _, _) = run_lineq(&["a=1", "-"], Some("a=1\na=2\n")).unwrap();
    assert_eq!(stdout, "a=1\n");
}

#[test]
fn test_cli_end_of_options() {
    // After --, "-x=1" is the query: negation of x=1
    let (stdout, _, _) = run_lineq(&["--", "-x=1"], Some("y=2\nx=1\n")).unwrap();
    assert_eq!(stdout, "y=2\n");
}

#[test]
fn test_cli_malformed_line_diagnostic_on_stderr() {
    let (stdout, stderr, code) = run_lineq(
        &["a=1"],
        Some("a=1 ok\nbroken=\"unterminated\na=1 again\n"),
    )
    .unwrap();
    assert_eq!(stdout, "a=1 ok\na=1 again\n");
    assert!(stderr.contains("record 2"));
    assert_eq!(code, 0);
}

#[test]
fn test_cli_bad_query_exits_two() {
    let (_, stderr, code) = run_lineq(&["a="], Some("a=1\n")).unwrap();
    assert_eq!(code, 2);
    assert!(stderr.contains("lineq:"));
}

#[test]
fn test_cli_bad_query_lexing_exits_two() {
    let (_, stderr, code) = run_lineq(&["a=1 & b=2"], None).unwrap();
    assert_eq!(code, 2);
    assert!(stderr.contains("&&"));
}

#[test]
fn test_cli_error_no_query() {
    let (_, stderr, code) = run_lineq(&[], None).unwrap();
    assert_eq!(code, 2);
    assert!(stderr.contains("no query"));
}

#[test]
fn test_cli_error_unknown_option() {
    let (_, _, code) = run_lineq(&["--unknown"], None).unwrap();
    assert_eq!(code, 2);
}

#[test]
fn test_cli_error_missing_delim_arg() {
    let (_, _, code) = run_lineq(&["-F"], None).unwrap();
    assert_eq!(code, 2);
}

#[test]
fn test_cli_error_multibyte_delim() {
    let (_, _, code) = run_lineq(&["-F", "ab", "a=1"], None).unwrap();
    assert_eq!(code, 2);
}

#[test]
fn test_cli_error_missing_query_file() {
    let (_, _, code) = run_lineq(&["-q", "/nonexistent/query.lq"], None).unwrap();
    assert_eq!(code, 2);
}
