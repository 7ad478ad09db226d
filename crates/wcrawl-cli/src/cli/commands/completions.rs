//! `wcrawl completions` – print a shell completion script.

use clap_complete::Shell;

pub fn run_completions(shell: Shell, cmd: &mut clap::Command) {
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, cmd, name, &mut std::io::stdout());
}
