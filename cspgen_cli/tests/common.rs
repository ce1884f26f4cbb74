use assert_cmd::Command;

pub fn cspgen_cmd() -> Command {
	Command::cargo_bin("cspgen").expect("binary should build")
}
