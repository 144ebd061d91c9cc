use anyhow::Result;
use clap::Args;
use clap_complete::{Shell, generate};

/// Arguments for `netsci completions`.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell for completion script generation.
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Write the completion script for `shell` to stdout.
///
/// # Errors
///
/// Never in practice; kept fallible to match the other command runners.
pub fn run_completions(shell: Shell, command: &mut clap::Command) -> Result<()> {
    let mut out = std::io::stdout();
    generate(shell, command, "netsci", &mut out);
    Ok(())
}
