use std::path::PathBuf;
use std::sync::Arc;

use auth::PasswordHasher;
use auth::TokenIssuer;
use clap::Parser;
use clap::Subcommand;
use credential_store::config::Config;
use credential_store::identity::models::AuthenticationOutcome;
use credential_store::identity::models::Credentials;
use credential_store::identity::models::RegistrationOutcome;
use credential_store::identity::ports::CredentialStorePort;
use credential_store::identity::service::CredentialStore;
use credential_store::repositories::PostgresIdentityRepository;
use credential_store::telemetry;

#[derive(Debug, Parser)]
#[command(name = "credential-store", version, about = "Register and authenticate identities")]
struct Cli {
    /// Configuration file layered over config/default.toml
    #[arg(long, global = true, env = "CREDENTIAL_STORE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Register a new identity
    Register {
        email: String,
        #[arg(long, env = "CREDENTIAL_STORE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Authenticate and print a session token
    Authenticate {
        email: String,
        #[arg(long, env = "CREDENTIAL_STORE_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    telemetry::init(config.environment);
    tracing::info!(
        service = "credential-store",
        version = env!("CARGO_PKG_VERSION"),
        environment = ?config.environment,
        database_host = %config.database.host,
        database_port = config.database.port,
        database_name = %config.database.name,
        "Configuration loaded"
    );

    let repository = Arc::new(PostgresIdentityRepository::connect(&config.database).await?);
    let token_issuer = Arc::new(TokenIssuer::new(config.token.secret.as_bytes())?);
    let password_hasher = PasswordHasher::with_cost(config.hashing.cost());
    let token_validity = config.token.validity()?;

    let store = CredentialStore::new(
        repository,
        token_issuer,
        password_hasher,
        token_validity,
    );

    match cli.command {
        Command::Register { email, password } => {
            let credentials = Credentials::new(&email, password)?;
            match store.register(credentials).await? {
                RegistrationOutcome::Created => println!("registered"),
                RegistrationOutcome::AlreadyRegistered => println!("already registered"),
            }
        }
        Command::Authenticate { email, password } => {
            let credentials = Credentials::new(&email, password)?;
            match store.authenticate(credentials).await? {
                AuthenticationOutcome::Authenticated(token) => println!("{}", token.as_str()),
                AuthenticationOutcome::Rejected => anyhow::bail!("invalid credentials"),
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_config_path_from_flag() {
        let cli = Cli::try_parse_from([
            "credential-store",
            "--config",
            "/etc/credential-store.toml",
            "register",
            "a@x.com",
            "--password",
            "pw1",
        ])
        .unwrap();

        assert_eq!(
            cli.config,
            Some(PathBuf::from("/etc/credential-store.toml"))
        );
        assert!(matches!(cli.command, Command::Register { .. }));
    }

    #[test]
    fn test_config_path_from_environment() {
        std::env::set_var("CREDENTIAL_STORE_CONFIG", "/srv/credential-store.toml");
        let cli = Cli::try_parse_from([
            "credential-store",
            "authenticate",
            "a@x.com",
            "--password",
            "pw1",
        ]);
        std::env::remove_var("CREDENTIAL_STORE_CONFIG");

        let cli = cli.unwrap();
        assert_eq!(
            cli.config,
            Some(PathBuf::from("/srv/credential-store.toml"))
        );
    }
}
