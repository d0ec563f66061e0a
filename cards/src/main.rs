use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use pd_cards::{
    read_cards, AppConfig, CardRecord, Database, JaroWinklerMatcher, NameMatcher, SearchOptions,
};
use pd_find::{resolve_season_in, season_code, season_name, RenderContext};
use std::path::PathBuf;
use tabular::{Row, Table};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "pdfind")]
#[command(about = "Search the card database with the card search language")]
struct Cli {
    /// Overrides DATABASE_URL
    #[arg(long, global = true)]
    database_url: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the SQL fragment a query compiles to
    Compile {
        query: String,
        /// Table alias of the card table in the surrounding query
        #[arg(long, default_value = pd_find::DEFAULT_CARD_ALIAS)]
        alias: String,
    },
    /// Search for cards
    Search {
        query: String,
        /// Overrides SEARCH_RESULT_LIMIT
        #[arg(long)]
        limit: Option<i64>,
        #[arg(long, default_value_t = 0)]
        offset: i64,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Resolve a season name such as pd7, pdkld or all
    Season { token: String },
    /// List or start seasons
    Seasons {
        #[command(subcommand)]
        command: SeasonsCommands,
    },
    /// Import cards from a JSON file
    Import { file: PathBuf },
}

#[derive(Subcommand)]
enum SeasonsCommands {
    List,
    /// Start a new season, archiving the current one
    Add {
        code: String,
        /// Defaults to today
        #[arg(long)]
        start_date: Option<NaiveDate>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load .env file if it exists
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let limit = match &cli.command {
        Commands::Search { limit, .. } => *limit,
        _ => None,
    };
    let config = AppConfig::from_env()?.with_overrides(cli.database_url, limit);
    let db = Database::new(&config.database_url).await?;

    match cli.command {
        Commands::Compile { query, alias } => {
            let catalog = db.catalog();
            let ctx = RenderContext::new(&catalog).with_card_alias(&alias);
            let (fragment, warnings) = pd_find::compile_with(&query, &ctx)?;
            println!("{}", fragment);
            for warning in warnings {
                eprintln!("warning: {}", warning);
            }
        }
        Commands::Search {
            query,
            offset,
            json,
            ..
        } => {
            let options = SearchOptions {
                limit: config.search_result_limit,
                offset,
            };
            let results = db.search(&query, options).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
                return Ok(());
            }
            for warning in &results.warnings {
                eprintln!("warning: {}", warning);
            }
            if results.cards.is_empty() {
                println!("No cards found.");
                let matcher = JaroWinklerMatcher::new(db.card_names().await?);
                let candidates = matcher.fuzzy_lookup(&query).candidates();
                if !candidates.is_empty() {
                    println!("Did you mean: {}?", candidates.join(", "));
                }
                return Ok(());
            }
            print_cards(&results.cards);
        }
        Commands::Season { token } => {
            let catalog = db.catalog();
            let spec = resolve_season_in(&token, &catalog)?;
            println!(
                "{} ({})",
                season_name(spec),
                season_code(spec, &catalog)?
            );
        }
        Commands::Seasons { command } => match command {
            SeasonsCommands::List => {
                let current = db.catalog().current_season() as i64;
                #[allow(clippy::literal_string_with_formatting_args)]
                let mut table = Table::new("{:>}  {:<}  {:<}  {:<}").with_row(Row::from_cells(
                    ["#", "Code", "Start", ""].iter().cloned(),
                ));
                for season in db.seasons().await? {
                    let marker = if season.number == current { "current" } else { "" };
                    table.add_row(
                        Row::new()
                            .with_cell(season.number)
                            .with_cell(season.code)
                            .with_cell(season.start_date)
                            .with_cell(marker),
                    );
                }
                print!("{}", table);
            }
            SeasonsCommands::Add { code, start_date } => {
                let start_date = start_date.unwrap_or_else(|| chrono::Utc::now().date_naive());
                let season = db.add_season(&code, start_date).await?;
                println!(
                    "Season {} ({}) starts {}",
                    season.number, season.code, season.start_date
                );
            }
        },
        Commands::Import { file } => {
            let cards = read_cards(&file)?;
            let count = db.import_cards(&cards).await?;
            println!("Imported {} cards", count);
        }
    }

    Ok(())
}

fn format_stat(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "*".to_string())
}

fn print_cards(cards: &[CardRecord]) {
    #[allow(clippy::literal_string_with_formatting_args)]
    let mut table = Table::new("{:<}  {:<}  {:<}  {:>}").with_row(Row::from_cells(
        ["Name", "Cost", "Type", "P/T"].iter().cloned(),
    ));
    for card in cards {
        let stats = if card.type_line.contains("Creature") {
            format!("{}/{}", format_stat(card.power), format_stat(card.toughness))
        } else if let Some(loyalty) = card.loyalty {
            loyalty.to_string()
        } else {
            String::new()
        };
        table.add_row(
            Row::new()
                .with_cell(&card.name)
                .with_cell(&card.mana_cost)
                .with_cell(&card.type_line)
                .with_cell(stats),
        );
    }
    print!("{}", table);
    println!("{} cards", cards.len());
}
