use std::process::{Command, Output};

fn wordgrid(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_wordgrid"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(args)
        .output()
        .expect("failed to run wordgrid")
}

#[test]
fn help_lists_every_subcommand() {
    let output = wordgrid(&["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["table", "window", "tiles"] {
        assert!(stdout.contains(command), "{stdout}");
    }
}

#[test]
fn strict_table_prints_a_heat_table() {
    let output = wordgrid(&["table", "1", "3", "1", "2"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout, "  1 2 3\n1 1 2 3\n2 2 4 6\n");
}

#[test]
fn out_of_range_tables_are_refused() {
    let output = wordgrid(&["table", "1", "101", "1", "2"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("x end is 101, maximum is 100"), "{stderr}");
}

#[test]
fn window_realizes_only_the_viewport() {
    let output = wordgrid(&["window", "1", "100", "1", "100", "--height", "64", "--width", "104"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.ends_with("4 of 9801 cells realized, content 5200x3200 px\n"),
        "{stdout}"
    );
}

#[test]
fn equal_bounds_still_realize_a_column() {
    let output = wordgrid(&["window", "5", "5", "1", "10", "--height", "64", "--width", "104"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.ends_with("2 of 9 cells realized, content 1300x800 px\n"),
        "{stdout}"
    );
}

#[test]
fn out_of_range_windows_are_refused() {
    let output = wordgrid(&[
        "window", "0", "1000000", "0", "1000000", "--height", "64", "--width", "104",
    ]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("x end is 1000000, maximum is 100"), "{stderr}");
}
