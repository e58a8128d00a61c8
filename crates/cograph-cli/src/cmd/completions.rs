use std::io::Write;

use anyhow::Result;
use clap::Args;
use clap_complete::{Shell, generate};

/// Arguments for `cograph completions`.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate the script for.
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Write the completion script for `args.shell` to `out`.
///
/// The script completes `command`'s own name, so it stays in sync with the
/// `#[command(name)]` of the CLI.
pub fn write_completions(
    args: &CompletionsArgs,
    command: &mut clap::Command,
    out: &mut dyn Write,
) -> Result<()> {
    let bin_name = command.get_name().to_string();
    generate(args.shell, command, bin_name, out);
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn script(shell: Shell) -> String {
        let mut out = Vec::new();
        let mut command = crate::Cli::command();
        write_completions(&CompletionsArgs { shell }, &mut command, &mut out).expect("generate");
        String::from_utf8(out).expect("utf-8 script")
    }

    #[test]
    fn bash_script_completes_pipeline_subcommands() {
        let bash = script(Shell::Bash);
        assert!(bash.contains("cograph"));
        for subcommand in ["edgelist", "analyze", "run"] {
            assert!(bash.contains(subcommand), "missing {subcommand}");
        }
        assert!(!bash.contains("cograph-cli"));
    }

    #[test]
    fn zsh_script_offers_global_flags() {
        let zsh = script(Shell::Zsh);
        assert!(zsh.contains("#compdef cograph"));
        assert!(zsh.contains("--timing"));
        assert!(zsh.contains("--config"));
    }
}
