use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::workspace_io;
use crate::keyboard::help::help_text;
use crate::ops::check;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    match &cli.command {
        None => Err("no subcommand given".into()),
        Some(Commands::Keys(args)) => cmd_keys(cli, args),
        Some(Commands::Check(args)) => cmd_check(cli, args),
    }
}

fn cmd_keys(cli: &Cli, args: &KeysArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = config_io::load_config(cli.config.as_deref())?;
    if args.json {
        let out = keys_json(config.keyboard.chord_timeout_ms);
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print!("{}", help_text());
    }
    Ok(())
}

fn cmd_check(cli: &Cli, args: &CheckArgs) -> Result<(), Box<dyn std::error::Error>> {
    config_io::load_config(cli.config.as_deref())?;
    if !cli.workspace.exists() {
        return Err(format!("workspace not found: {}", cli.workspace.display()).into());
    }
    let workspace = workspace_io::load_workspace(&cli.workspace)?;
    let result = check::check_workspace(&workspace);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        for line in format_check_report(&result) {
            println!("{}", line);
        }
    }

    if !result.valid {
        std::process::exit(1);
    }
    Ok(())
}
