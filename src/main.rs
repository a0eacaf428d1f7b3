use anyhow::{bail, Context, Result};
use catalogo::{
    admin::{render_users, AdminClient, Credentials, NewUser},
    catalog::{render_table, Catalog, CatalogEntry, Prompt},
    config::Config,
    fetch::Source,
    table::MatchMode,
};
use clap::{Args, Parser, Subcommand};
use reqwest::Client;
use std::{io::Write, path::PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "catalogo")]
#[command(about = "Product catalog viewer and user admin for the PaperPrint CRM")]
#[command(version)]
struct Cli {
    /// YAML configuration file
    #[arg(long, global = true, env = "CATALOGO_CONFIG")]
    config: Option<PathBuf>,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the product catalog
    Catalog(CatalogArgs),
    /// Check admin credentials against the backend
    Login(LoginArgs),
    /// Manage users through the admin function
    Users {
        #[command(subcommand)]
        command: UsersCommand,
    },
}

#[derive(Args)]
struct CatalogArgs {
    /// CSV URL or local path (overrides the configured one)
    #[arg(long)]
    csv: Option<String>,

    /// Only products whose SKU contains this text (case-sensitive)
    #[arg(long)]
    sku: Option<String>,

    /// Print entries as JSON
    #[arg(long)]
    json: bool,

    /// Match headers by exact name only
    #[arg(long)]
    strict: bool,

    /// Read SKU queries from stdin; `:r` reloads, `:q` quits
    #[arg(long, short)]
    interactive: bool,
}

#[derive(Args)]
struct LoginArgs {
    #[arg(long, env = "CATALOGO_ADMIN_EMAIL")]
    email: String,

    #[arg(long, env = "CATALOGO_ADMIN_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Args)]
struct AdminAuth {
    /// Sign in as this admin before calling the function
    #[arg(long, env = "CATALOGO_ADMIN_EMAIL")]
    admin_email: Option<String>,

    #[arg(long, env = "CATALOGO_ADMIN_PASSWORD", hide_env_values = true)]
    admin_password: Option<String>,
}

#[derive(Subcommand)]
enum UsersCommand {
    /// List users
    List {
        #[command(flatten)]
        auth: AdminAuth,
    },
    /// Create a user, then list users
    Create {
        #[arg(long)]
        email: String,

        /// At least 6 characters
        #[arg(long)]
        password: String,

        /// Full name
        #[arg(long)]
        name: Option<String>,

        /// Create the user disabled
        #[arg(long)]
        inactive: bool,

        #[command(flatten)]
        auth: AdminAuth,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ─── 1) init logging ─────────────────────────────────────────────
    let default_filter = if cli.verbose { "debug" } else { "info" };
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    // ─── 2) configuration + shared HTTP client ───────────────────────
    let config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    let client = Client::new();

    match cli.command {
        Command::Catalog(args) => run_catalog(&client, &config, args).await,
        Command::Login(args) => run_login(&client, &config, args).await,
        Command::Users { command } => run_users(&client, &config, command).await,
    }
}

async fn run_catalog(client: &Client, config: &Config, args: CatalogArgs) -> Result<()> {
    let source = Source::parse(args.csv.as_deref().unwrap_or(&config.csv_url));
    let fields = if args.strict {
        config.fields.clone().with_mode(MatchMode::ExactOnly)
    } else {
        config.catalog_fields()
    };
    let mut catalog = Catalog::new(source, fields, config.currency_symbol.clone());

    if args.interactive {
        if let Err(err) = catalog.reload(client).await {
            error!("catalog load failed: {}", err);
        }
        print_entries(&catalog.search(args.sku.as_deref().unwrap_or("")), args.json)?;
        return run_prompt(&mut catalog, client, args.json).await;
    }

    let rows = catalog
        .reload(client)
        .await
        .with_context(|| format!("loading catalog from {}", catalog.source()))?;
    let entries = catalog.search(args.sku.as_deref().unwrap_or(""));
    info!(rows, shown = entries.len(), "catalog ready");
    print_entries(&entries, args.json)
}

async fn run_prompt(catalog: &mut Catalog, client: &Client, json: bool) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        eprint!("sku> ");
        std::io::stderr().flush().ok();
        let Some(line) = lines.next_line().await? else {
            break;
        };
        match Prompt::parse(&line) {
            Prompt::Quit => break,
            Prompt::Refresh => {
                // a failed reload leaves the previous table on screen
                if let Err(err) = catalog.reload(client).await {
                    error!("catalog reload failed: {}", err);
                }
                print_entries(&catalog.entries(), json)?;
            }
            Prompt::Search(query) => print_entries(&catalog.search(&query), json)?,
        }
    }
    Ok(())
}

fn print_entries(entries: &[CatalogEntry], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(entries)?);
    } else {
        print!("{}", render_table(entries));
    }
    Ok(())
}

async fn run_login(client: &Client, config: &Config, args: LoginArgs) -> Result<()> {
    let credentials = Credentials::new(&args.email, &args.password)?;
    let mut admin = AdminClient::new(client.clone(), &config.backend)?;
    admin
        .sign_in(&credentials)
        .await
        .context("admin sign-in")?;
    println!("signed in as {}", credentials.email());
    Ok(())
}

async fn connect(client: &Client, config: &Config, auth: AdminAuth) -> Result<AdminClient> {
    let mut admin = AdminClient::new(client.clone(), &config.backend)?;
    match (auth.admin_email, auth.admin_password) {
        (Some(email), Some(password)) => {
            let credentials = Credentials::new(&email, &password)?;
            admin
                .sign_in(&credentials)
                .await
                .context("admin sign-in")?;
        }
        (None, None) => warn!("no admin credentials given; calling with the anon key"),
        _ => bail!("--admin-email and --admin-password must be given together"),
    }
    Ok(admin)
}

async fn run_users(client: &Client, config: &Config, command: UsersCommand) -> Result<()> {
    match command {
        UsersCommand::List { auth } => {
            let admin = connect(client, config, auth).await?;
            let users = admin.list_users().await.context("listing users")?;
            print!("{}", render_users(&users));
        }
        UsersCommand::Create {
            email,
            password,
            name,
            inactive,
            auth,
        } => {
            let user = NewUser::new(&email, &password, name.as_deref(), !inactive)?;
            let admin = connect(client, config, auth).await?;
            admin
                .create_user(&user)
                .await
                .with_context(|| format!("creating user {}", user.email))?;
            println!("user {} created", user.email);

            let users = admin.list_users().await.context("listing users")?;
            print!("{}", render_users(&users));
        }
    }
    Ok(())
}
