use clap::{Parser, Subcommand};
use medcodes_core::{
    config::{catalog_path_from_env_value, data_dir_from_env_value},
    popular_searches, Category, CodeFilters, CoreConfig, Filter, MedCodesService, MedicalCode,
    ProfileUpdate,
};
use medcodes_types::NonEmptyText;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "medcodes")]
#[command(about = "MedCodes medical code reference CLI")]
struct Cli {
    /// Directory for favourites, history and session state (overrides MEDCODES_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search codes by code or description
    Search {
        /// Text to match; omit to list everything
        query: Option<String>,
        /// Code type: CPT, ICD-10 or All
        #[arg(long = "type", default_value = "All")]
        code_type: String,
        /// Coverage status: Covered, Not Covered, Conditional or All
        #[arg(long, default_value = "All")]
        coverage: String,
        /// Insurance: Medicare, Medicaid, Both, Neither or All
        #[arg(long, default_value = "All")]
        insurance: String,
        /// Show at most this many results
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show one code in full
    Show {
        /// Catalog id
        id: String,
    },
    /// List codes grouped by specialty
    Browse {
        /// Only show this category (e.g. "Cardiovascular")
        #[arg(long)]
        category: Option<String>,
    },
    /// Catalog and usage statistics
    Stats,
    /// Popular and recent searches
    Suggestions,
    /// Manage favourite codes
    Favorites {
        #[command(subcommand)]
        action: FavoritesCommand,
    },
    /// Manage recent searches
    History {
        #[command(subcommand)]
        action: HistoryCommand,
    },
    /// Sign in as a demo user
    Login { email: String, password: String },
    /// Create an account and sign in
    Signup {
        name: String,
        email: String,
        password: String,
    },
    /// Sign out
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Update the signed-in user's profile
    Profile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        organization: Option<String>,
        #[arg(long)]
        specialty: Option<String>,
    },
}

#[derive(Subcommand)]
enum FavoritesCommand {
    /// List favourite codes
    List,
    /// Add a code by id
    Add { id: String },
    /// Remove a code by id
    Remove { id: String },
    /// Add the code if absent, remove it if present
    Toggle { id: String },
    /// Remove all favourites
    Clear,
}

#[derive(Subcommand)]
enum HistoryCommand {
    /// List recent searches, newest first
    List,
    /// Record a search without running it
    Add { query: String },
    /// Forget all recent searches
    Clear,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("medcodes=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("Use 'medcodes --help' for commands");
        return Ok(());
    };

    let data_dir = cli
        .data_dir
        .unwrap_or_else(|| data_dir_from_env_value(std::env::var("MEDCODES_DATA_DIR").ok()));
    let catalog_path = catalog_path_from_env_value(std::env::var("MEDCODES_CATALOG").ok());
    let cfg = Arc::new(CoreConfig::new(data_dir, catalog_path)?);
    let service = MedCodesService::new(cfg)?;

    match command {
        Commands::Search {
            query,
            code_type,
            coverage,
            insurance,
            limit,
        } => {
            let query = query.unwrap_or_default();
            let filters = CodeFilters {
                code_type: Filter::lenient(&code_type),
                coverage: Filter::lenient(&coverage),
                insurance: Filter::lenient(&insurance),
            };
            let results = service.submit_search(&query, &filters);
            if results.is_empty() {
                println!("No codes found.");
            } else {
                let shown = limit.unwrap_or(results.len());
                for code in results.iter().take(shown) {
                    print_code_line(code);
                }
                if shown < results.len() {
                    println!("... {} more", results.len() - shown);
                }
            }
        }
        Commands::Show { id } => match service.get_code(&id) {
            Some(code) => print_code_detail(code, service.favorites().read(|f| f.is_favorite(&id))),
            None => eprintln!("Code not found: {}", id),
        },
        Commands::Browse { category } => {
            let index = service.browse();
            match category {
                Some(label) => match Category::from_label(&label) {
                    Some(category) => {
                        let codes = index.get(category);
                        println!("{} ({})", category, codes.len());
                        for code in codes {
                            print_code_line(code);
                        }
                    }
                    None => eprintln!("Unknown category: {}", label),
                },
                None => {
                    for group in index.by_size() {
                        println!("{} ({})", group.category, group.codes.len());
                        for code in &group.codes {
                            print_code_line(code);
                        }
                        println!();
                    }
                }
            }
        }
        Commands::Stats => {
            let stats = service.catalog_stats();
            let usage = service.usage_stats();
            println!("Total codes:      {}", stats.total_codes);
            println!("  CPT:            {}", stats.cpt_codes);
            println!("  ICD-10:         {}", stats.icd_codes);
            println!("Coverage rate:    {}%", stats.coverage_percentage());
            println!("  Covered:        {}", stats.covered_codes);
            println!("  Not covered:    {}", stats.not_covered_codes);
            println!("  Conditional:    {}", stats.conditional_codes);
            println!("Medicare:         {}", stats.medicare_codes);
            println!("Medicaid:         {}", stats.medicaid_codes);
            println!("Both:             {}", stats.both_insurance);
            println!("Favorites:        {}", usage.favorite_count);
            println!("Recent searches:  {}", usage.recent_search_count);
        }
        Commands::Suggestions => {
            println!("Popular searches:");
            for term in popular_searches() {
                println!("  {}", term);
            }
            let recent = service.history().snapshot();
            if !recent.is_empty() {
                println!("Recent searches:");
                for term in recent.entries() {
                    println!("  {}", term);
                }
            }
        }
        Commands::Favorites { action } => run_favorites(&service, action),
        Commands::History { action } => match action {
            HistoryCommand::List => {
                let history = service.history().snapshot();
                if history.is_empty() {
                    println!("No recent searches.");
                }
                for term in history.entries() {
                    println!("{}", term);
                }
            }
            HistoryCommand::Add { query } => {
                if service.history().update(|h| h.add_recent_search(&query)) {
                    println!("Recorded: {}", query.trim());
                } else {
                    eprintln!("Ignoring blank search");
                }
            }
            HistoryCommand::Clear => {
                service.history().update(|h| h.clear_recent_searches());
                println!("Cleared recent searches");
            }
        },
        Commands::Login { email, password } => match service.auth().login(&email, &password) {
            Ok(user) => println!("Signed in as {} <{}> ({})", user.name, user.email, user.role),
            Err(e) => eprintln!("Login failed: {}", e),
        },
        Commands::Signup {
            name,
            email,
            password,
        } => match service.auth().signup(&name, &email, &password) {
            Ok(user) => println!("Welcome, {}. Your user id is {}", user.name, user.id),
            Err(e) => eprintln!("Signup failed: {}", e),
        },
        Commands::Logout => {
            service.auth().logout();
            println!("Signed out");
        }
        Commands::Whoami => {
            let session = service.auth().session();
            match (&session.user, session.is_authenticated) {
                (Some(user), true) => {
                    println!("{} <{}> ({})", user.name, user.email, user.role);
                    if let Some(organization) = &user.organization {
                        println!("Organization: {}", organization);
                    }
                    if let Some(specialty) = &user.specialty {
                        println!("Specialty:    {}", specialty);
                    }
                    if let Some(at) = session.signed_in_at {
                        println!(
                            "Signed in:    {}",
                            at.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M")
                        );
                    }
                }
                _ => println!("Not signed in."),
            }
        }
        Commands::Profile {
            name,
            organization,
            specialty,
        } => {
            let update = ProfileUpdate {
                name: name.map(NonEmptyText::new).transpose()?,
                organization,
                specialty,
            };
            if update.is_empty() {
                eprintln!("Nothing to update; pass --name, --organization or --specialty");
            } else {
                match service.auth().update_profile(update) {
                    Some(user) => println!("Updated profile for {}", user.name),
                    None => eprintln!("Not signed in."),
                }
            }
        }
    }

    Ok(())
}

fn run_favorites(service: &MedCodesService, action: FavoritesCommand) {
    let favorites = service.favorites();
    match action {
        FavoritesCommand::List => {
            let codes = service.favorite_codes();
            if codes.is_empty() {
                println!("No favorites yet.");
            }
            for code in codes {
                print_code_line(code);
            }
        }
        FavoritesCommand::Add { id } => {
            if service.get_code(&id).is_none() {
                eprintln!("Code not found: {}", id);
                return;
            }
            favorites.update(|f| f.add_favorite(&id));
            println!("Added {} to favorites", id);
        }
        FavoritesCommand::Remove { id } => {
            favorites.update(|f| f.remove_favorite(&id));
            println!("Removed {} from favorites", id);
        }
        FavoritesCommand::Toggle { id } => {
            if favorites.update(|f| f.toggle_favorite(&id)) {
                println!("Added {} to favorites", id);
            } else {
                println!("Removed {} from favorites", id);
            }
        }
        FavoritesCommand::Clear => {
            favorites.update(|f| f.clear_favorites());
            println!("Cleared favorites");
        }
    }
}

fn print_code_line(code: &MedicalCode) {
    println!(
        "{:>4}  {:<8} {:<6}  {}  [{}]",
        code.id,
        code.code,
        code.code_type.label(),
        code.description,
        code.coverage.status
    );
}

fn print_code_detail(code: &MedicalCode, favorite: bool) {
    println!("{} ({}){}", code.code, code.code_type, if favorite { " *" } else { "" });
    println!("{}", code.description);
    println!("Category:  {}", medcodes_core::categorize(code));
    println!(
        "Coverage:  {} / {}",
        code.coverage.status, code.coverage.insurance
    );
    if let Some(conditions) = code.coverage.applicable_conditions() {
        println!("Conditions: {}", conditions);
    }
    if !code.documentation.is_empty() {
        println!("Documentation:");
        for item in &code.documentation {
            println!("  - {}", item);
        }
    }
    if !code.billing.is_empty() {
        println!("Billing:");
        for item in &code.billing {
            println!("  - {}", item);
        }
    }
}
