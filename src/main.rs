use clap::{Parser, Subcommand};
use foodiebot::Result;
use foodiebot::commands::{build_index, chat, menu_list, menu_set, show_status};
use foodiebot::config::{run_interactive_config, show_config};

#[derive(Parser)]
#[command(name = "foodiebot")]
#[command(about = "An allergen-aware retrieval chatbot for a fast-food menu catalog")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Configure Ollama, Groq and catalog settings
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
    /// Embed the catalog and build the menu index
    Init,
    /// Start an interactive chat session
    Chat,
    /// Inspect or edit the menu catalog
    Menu {
        #[command(subcommand)]
        command: MenuCommands,
    },
    /// Show connectivity and index status
    Status,
}

#[derive(Subcommand)]
enum MenuCommands {
    /// List all menu items
    List,
    /// Edit one field of one menu item
    Set {
        /// Product id of the item to edit
        id: String,
        /// Field to edit (name, description, ingredients, calories, price, allergens, category, dietary_tags)
        field: String,
        /// New value for the field
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Config { show } => {
            if show {
                show_config()?;
            } else {
                run_interactive_config()?;
            }
        }
        Commands::Init => {
            build_index().await?;
        }
        Commands::Chat => {
            chat().await?;
        }
        Commands::Menu { command } => match command {
            MenuCommands::List => {
                menu_list()?;
            }
            MenuCommands::Set { id, field, value } => {
                menu_set(&id, &field, &value)?;
            }
        },
        Commands::Status => {
            show_status().await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn cli_parsing() {
        let cli = Cli::try_parse_from(["foodiebot", "chat"]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            matches!(parsed.command, Commands::Chat);
        }
    }

    #[test]
    fn init_command() {
        let cli = Cli::try_parse_from(["foodiebot", "init"]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            matches!(parsed.command, Commands::Init);
        }
    }

    #[test]
    fn menu_list_command() {
        let cli = Cli::try_parse_from(["foodiebot", "menu", "list"]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            matches!(
                parsed.command,
                Commands::Menu {
                    command: MenuCommands::List
                }
            );
        }
    }

    #[test]
    fn menu_set_command() {
        let cli = Cli::try_parse_from(["foodiebot", "menu", "set", "FF001", "price", "5.99"]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            if let Commands::Menu {
                command: MenuCommands::Set { id, field, value },
            } = parsed.command
            {
                assert_eq!(id, "FF001");
                assert_eq!(field, "price");
                assert_eq!(value, "5.99");
            }
        }
    }

    #[test]
    fn menu_requires_a_subcommand() {
        let cli = Cli::try_parse_from(["foodiebot", "menu"]);
        assert!(cli.is_err());
    }

    #[test]
    fn config_show_flag() {
        let cli = Cli::try_parse_from(["foodiebot", "config", "--show"]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            if let Commands::Config { show } = parsed.command {
                assert!(show);
            }
        }
    }

    #[test]
    fn invalid_command() {
        let cli = Cli::try_parse_from(["foodiebot", "invalid"]);
        assert!(cli.is_err());

        if let Err(err) = cli {
            assert_eq!(err.kind(), ErrorKind::InvalidSubcommand);
        }
    }

    #[test]
    fn help_message() {
        let cli = Cli::try_parse_from(["foodiebot", "--help"]);
        assert!(cli.is_err());

        if let Err(err) = cli {
            assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        }
    }
}
