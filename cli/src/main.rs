mod commands;
mod config;
mod remote_http;

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process;

use crate::commands::{
    cmd_delete, cmd_export, cmd_food_add, cmd_food_favorite, cmd_food_favorites, cmd_food_list,
    cmd_food_search, cmd_log, cmd_login, cmd_logout, cmd_photo, cmd_profile_set, cmd_profile_show,
    cmd_recent, cmd_recipes, cmd_register, cmd_summary, cmd_targets, cmd_week,
    cmd_weight_history, cmd_weight_log, cmd_whoami,
};
use crate::config::Config;
use crate::remote_http::HttpRemote;
use tally_core::cache::LocalCache;
use tally_core::remote::RemoteStore;
use tally_core::store::DataStore;

#[derive(Parser)]
#[command(
    name = "tally",
    version,
    about = "A personal nutrition tracker CLI",
    long_about = "\n\n  ████████╗ █████╗ ██╗     ██╗  ██╗   ██╗
  ╚══██╔══╝██╔══██╗██║     ██║  ╚██╗ ██╔╝
     ██║   ███████║██║     ██║   ╚████╔╝
     ██║   ██╔══██║██║     ██║    ╚██╔╝
     ██║   ██║  ██║███████╗███████╗██║
     ╚═╝   ╚═╝  ╚═╝╚══════╝╚══════╝╚═╝
        eat well, offline or not.
"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account (remote when configured, device-local otherwise)
    Register {
        /// Email address
        email: String,
        /// Password (min 6 characters)
        #[arg(short, long)]
        password: String,
        /// Display name
        #[arg(short, long)]
        name: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Sign in
    Login {
        /// Email address
        email: String,
        /// Password
        #[arg(short, long)]
        password: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Sign out and clear local data
    Logout {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the signed-in user
    Whoami {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage your profile (body metrics, activity, goal)
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },
    /// Show daily calorie, macro and micronutrient targets
    Targets {
        /// Use high-intensity-day electrolyte bands
        #[arg(long)]
        intense: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Log a food entry by searching for it
    Log {
        /// Food name to search for
        food: String,
        /// Quantity in the given unit
        quantity: f64,
        /// Unit: g, ml, portion, unit, cup, tbsp
        #[arg(short, long, default_value = "g")]
        unit: String,
        /// Meal: breakfast, lunch, dinner, snack
        #[arg(short, long, default_value = "snack")]
        meal: String,
        /// Log directly by food ID (skip search)
        #[arg(long)]
        food_id: Option<String>,
        /// Date to log for (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a food entry by ID
    Delete {
        /// Entry ID to delete
        entry_id: String,
        /// Date the entry was logged on (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show daily summary (defaults to today)
    Summary {
        /// Date to show (YYYY-MM-DD, default: today)
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show last-7-day averages and goal adherence
    Week {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Track body weight
    Weight {
        #[command(subcommand)]
        command: WeightCommands,
    },
    /// Manage foods (catalog, custom, favorites)
    Food {
        #[command(subcommand)]
        command: FoodCommands,
    },
    /// Show recently logged foods
    Recent {
        /// Number of foods to show
        #[arg(short, long)]
        limit: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show bundled reference recipes
    Recipes {
        /// Filter by goal: deficit, maintenance, surplus
        #[arg(long)]
        goal: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Analyze a meal photo and log the detected foods
    Photo {
        /// Path to the image file
        path: std::path::PathBuf,
        /// Meal: breakfast, lunch, dinner, snack
        #[arg(short, long, default_value = "snack")]
        meal: String,
        /// Date to log for (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<String>,
        /// Show what would be logged without logging it
        #[arg(long)]
        dry_run: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Export the food log as CSV
    Export {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<std::path::PathBuf>,
    },
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// Set or update profile fields
    Set {
        /// Body weight in kg
        #[arg(long)]
        weight: Option<f64>,
        /// Height in cm
        #[arg(long)]
        height: Option<f64>,
        /// Age in years
        #[arg(long)]
        age: Option<u32>,
        /// Sex: male or female
        #[arg(long)]
        sex: Option<String>,
        /// Activity level: sedentary, light, moderate, intense, very_intense
        #[arg(long)]
        activity: Option<String>,
        /// Goal: deficit, maintenance, surplus
        #[arg(long)]
        goal: Option<String>,
        /// Display name
        #[arg(long)]
        name: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the current profile and targets
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum WeightCommands {
    /// Log a weight entry (one per day; same-day logs replace)
    Log {
        /// Weight value
        value: f64,
        /// Unit: kg or lbs (default: kg)
        #[arg(short, long, default_value = "kg")]
        unit: String,
        /// Date (YYYY-MM-DD or today/yesterday, default: today)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show weight history
    History {
        /// Number of most recent entries to show (default: all)
        #[arg(short, long)]
        days: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum FoodCommands {
    /// Add a custom food (values per 100g)
    Add {
        /// Food name
        name: String,
        /// Calories per 100g
        #[arg(long)]
        calories: f64,
        /// Protein per 100g
        #[arg(long, default_value = "0")]
        protein: f64,
        /// Carbs per 100g
        #[arg(long, default_value = "0")]
        carbs: f64,
        /// Fat per 100g
        #[arg(long, default_value = "0")]
        fat: f64,
        /// Fiber per 100g
        #[arg(long)]
        fiber: Option<f64>,
        /// Default serving size in grams
        #[arg(long)]
        serving: Option<f64>,
        /// Brand name
        #[arg(long)]
        brand: Option<String>,
        /// Category
        #[arg(long)]
        category: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List foods (catalog + your custom foods)
    List {
        /// Filter by category
        #[arg(short, long)]
        category: Option<String>,
        /// Only show your custom foods
        #[arg(long)]
        custom: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Search foods by name (min 2 characters)
    Search {
        /// Search query
        query: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Toggle a food as favorite
    Favorite {
        /// Food ID
        food_id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List favorite foods
    Favorites {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

#[allow(clippy::too_many_lines)]
async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let remote: Option<Arc<dyn RemoteStore>> = match &config.remote {
        Some(settings) => Some(Arc::new(HttpRemote::new(settings)?)),
        None => None,
    };
    let local = LocalCache::open(&config.cache_path)?;
    let mut store = DataStore::new(local, remote)?;

    match cli.command {
        Commands::Register {
            email,
            password,
            name,
            json,
        } => cmd_register(&mut store, &email, &password, &name, json).await,
        Commands::Login {
            email,
            password,
            json,
        } => cmd_login(&mut store, &email, &password, json).await,
        Commands::Logout { json } => cmd_logout(&mut store, json).await,
        Commands::Whoami { json } => cmd_whoami(&store, json),
        Commands::Profile { command } => match command {
            ProfileCommands::Set {
                weight,
                height,
                age,
                sex,
                activity,
                goal,
                name,
                json,
            } => {
                cmd_profile_set(
                    &mut store, weight, height, age, sex, activity, goal, name, json,
                )
                .await
            }
            ProfileCommands::Show { json } => cmd_profile_show(&mut store, json).await,
        },
        Commands::Targets { intense, json } => cmd_targets(&mut store, intense, json).await,
        Commands::Log {
            food,
            quantity,
            unit,
            meal,
            food_id,
            date,
            json,
        } => cmd_log(&store, &food, quantity, &unit, &meal, food_id, date, json).await,
        Commands::Delete {
            entry_id,
            date,
            json,
        } => cmd_delete(&store, &entry_id, date, json).await,
        Commands::Summary { date, json } => cmd_summary(&mut store, date, json).await,
        Commands::Week { json } => cmd_week(&mut store, json).await,
        Commands::Weight { command } => match command {
            WeightCommands::Log {
                value,
                unit,
                date,
                json,
            } => cmd_weight_log(&mut store, value, &unit, date, json).await,
            WeightCommands::History { days, json } => {
                cmd_weight_history(&store, days, json).await
            }
        },
        Commands::Food { command } => match command {
            FoodCommands::Add {
                name,
                calories,
                protein,
                carbs,
                fat,
                fiber,
                serving,
                brand,
                category,
                json,
            } => {
                cmd_food_add(
                    &store, &name, calories, protein, carbs, fat, fiber, serving, brand, category,
                    json,
                )
                .await
            }
            FoodCommands::List {
                category,
                custom,
                json,
            } => cmd_food_list(&store, category, custom, json).await,
            FoodCommands::Search { query, json } => cmd_food_search(&store, &query, json).await,
            FoodCommands::Favorite { food_id, json } => {
                cmd_food_favorite(&store, &food_id, json).await
            }
            FoodCommands::Favorites { json } => cmd_food_favorites(&store, json).await,
        },
        Commands::Recent { limit, json } => cmd_recent(&store, limit, json),
        Commands::Recipes { goal, json } => cmd_recipes(goal, json),
        Commands::Photo {
            path,
            meal,
            date,
            dry_run,
            json,
        } => cmd_photo(&store, &path, &meal, date, dry_run, json).await,
        Commands::Export { output } => cmd_export(&store, output),
    }
}
