use chrono::{Local, NaiveDate};
use clap::Subcommand;
use visionary_common::{Result, VisionaryError};
use visionary_llm::StreamOutcome;
use visionary_store::{day_key, today_key, Theme};

use crate::app::AppContext;
use crate::quotes::quote_for;

#[derive(Subcommand)]
pub enum Commands {
    /// Manage visions
    #[command(subcommand)]
    Vision(VisionCommand),

    /// Show completion statistics for a day
    Stats {
        /// Day to report (YYYY-MM-DD), today by default
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Stream personalized suggestions based on your visions
    Suggest,

    /// Stream an analysis of free-form text
    Analyze {
        /// Text to analyze
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Save the finished analysis to the conversation history
        #[arg(long)]
        save: bool,
    },

    /// Browse saved conversations
    #[command(subcommand)]
    History(HistoryCommand),

    /// Manage claimed rewards
    #[command(subcommand)]
    Reward(RewardCommand),

    /// Show or adjust the points counter
    Points {
        /// Points to add (negative to spend)
        #[arg(long, allow_hyphen_values = true)]
        add: Option<i64>,
    },

    /// Show or set the color theme
    Theme {
        /// light or dark
        theme: Option<Theme>,
    },

    /// Print the quote of the day
    Quote,

    /// Check that the analysis provider is reachable
    Check,
}

#[derive(Subcommand)]
pub enum VisionCommand {
    /// Add a vision
    Add {
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// List visions with today's completion
    List,
    /// Toggle completion of a vision for a day
    Toggle {
        id: String,
        /// Day to toggle (YYYY-MM-DD), today by default
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Delete a vision
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum HistoryCommand {
    /// List saved conversations, most recent first
    List,
    /// Print one conversation
    Show { id: String },
    /// Delete one conversation
    Delete { id: String },
    /// Delete every conversation
    Clear,
}

#[derive(Subcommand)]
pub enum RewardCommand {
    /// Claim a reward today
    Add { name: String },
    /// List claimed rewards
    List,
    /// Remove a claimed reward
    Remove { id: String },
}

fn day_or_today(date: Option<NaiveDate>) -> String {
    date.map(day_key).unwrap_or_else(today_key)
}

fn preview(text: &str, max_chars: usize) -> String {
    let line = text.lines().next().unwrap_or_default();
    if line.chars().count() > max_chars || text.lines().nth(1).is_some() {
        let cut: String = line.chars().take(max_chars).collect();
        format!("{}...", cut)
    } else {
        line.to_string()
    }
}

/// Execute one command against the application context
pub async fn run(ctx: &AppContext, command: Commands) -> Result<()> {
    match command {
        Commands::Vision(cmd) => run_vision(ctx, cmd).await,

        Commands::Stats { date } => {
            let day = day_or_today(date);
            let stats = ctx.visions.read().await.daily_stats(&day);
            println!("{}", day);
            println!("  Visions:         {}", stats.total_visions);
            println!("  Completed:       {}", stats.completed_today);
            println!("  Completion rate: {}%", stats.daily_completion_rate);
            Ok(())
        }

        Commands::Suggest => {
            let visions = ctx.visions.read().await.visions();
            let stats = ctx.visions.read().await.daily_stats(&day_or_today(None));
            match ctx.assistant.get_suggestions(&visions, &stats).await {
                StreamOutcome::Failed { error, .. } => Err(error),
                _ => Ok(()),
            }
        }

        Commands::Analyze { text, save } => {
            let input = text.join(" ");
            match ctx.assistant.analyze_text(&input).await? {
                StreamOutcome::Completed { .. } if save => {
                    let mut history = ctx.conversations.write().await;
                    let saved = ctx.assistant.save_general(&mut history)?;
                    println!("Conversation saved! ({})", saved.id);
                    Ok(())
                }
                StreamOutcome::Failed { error, .. } => Err(error),
                _ => Ok(()),
            }
        }

        Commands::History(cmd) => run_history(ctx, cmd).await,

        Commands::Reward(cmd) => run_reward(ctx, cmd).await,

        Commands::Points { add } => {
            let mut rewards = ctx.rewards.write().await;
            let total = match add {
                Some(delta) => rewards.adjust_points(delta)?,
                None => rewards.points(),
            };
            println!("Points: {}", total);
            Ok(())
        }

        Commands::Theme { theme } => {
            if let Some(theme) = theme {
                ctx.settings.save_theme(theme)?;
            }
            println!("Theme: {}", ctx.settings.load_theme()?);
            Ok(())
        }

        Commands::Quote => {
            println!("{}", quote_for(Local::now().date_naive()));
            Ok(())
        }

        Commands::Check => {
            let reachable = ctx.assistant.check_provider().await.unwrap_or(false);
            if reachable {
                println!(
                    "Ollama reachable at {} (model {})",
                    ctx.config.ollama_base_url, ctx.config.llm_model
                );
                Ok(())
            } else {
                Err(VisionaryError::network(format!(
                    "Ollama not reachable at {}",
                    ctx.config.ollama_base_url
                )))
            }
        }
    }
}

async fn run_vision(ctx: &AppContext, cmd: VisionCommand) -> Result<()> {
    match cmd {
        VisionCommand::Add { name, description } => {
            let vision = ctx.visions.write().await.add(&name, &description)?;
            println!("Added vision {} ({})", vision.name, vision.id);
        }
        VisionCommand::List => {
            let today = day_or_today(None);
            let visions = ctx.visions.read().await.visions();
            if visions.is_empty() {
                println!("No visions yet. Add one with `visionary vision add <name>`.");
            }
            for vision in visions.iter() {
                let mark = if vision.completed_on(&today) { "x" } else { " " };
                println!("[{}] {}  {} - {}", mark, vision.id, vision.name, vision.description);
            }
        }
        VisionCommand::Toggle { id, date } => {
            let day = day_or_today(date);
            let completed = ctx.visions.write().await.toggle_completion(&id, &day)?;
            let verb = if completed { "completed" } else { "not completed" };
            println!("Vision {} marked {} on {}", id, verb, day);
        }
        VisionCommand::Delete { id } => {
            if !ctx.visions.write().await.delete(&id)? {
                return Err(VisionaryError::not_found(format!("vision {}", id)));
            }
            println!("Deleted vision {}", id);
        }
    }
    Ok(())
}

async fn run_history(ctx: &AppContext, cmd: HistoryCommand) -> Result<()> {
    match cmd {
        HistoryCommand::List => {
            let conversations = ctx.conversations.read().await.conversations();
            if conversations.is_empty() {
                println!("No saved conversations.");
            }
            for c in conversations.iter() {
                println!(
                    "{}  {}  {}",
                    c.id,
                    c.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
                    preview(&c.prompt, 60)
                );
            }
        }
        HistoryCommand::Show { id } => {
            let history = ctx.conversations.read().await;
            let c = history
                .get(&id)
                .ok_or_else(|| VisionaryError::not_found(format!("conversation {}", id)))?;
            println!("# {}\n", c.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M"));
            println!("{}\n\n---\n\n{}", c.prompt, c.response);
        }
        HistoryCommand::Delete { id } => {
            if !ctx.conversations.write().await.delete(&id)? {
                return Err(VisionaryError::not_found(format!("conversation {}", id)));
            }
            println!("Deleted conversation {}", id);
        }
        HistoryCommand::Clear => {
            ctx.conversations.write().await.clear()?;
            println!("Conversation history cleared.");
        }
    }
    Ok(())
}

async fn run_reward(ctx: &AppContext, cmd: RewardCommand) -> Result<()> {
    match cmd {
        RewardCommand::Add { name } => {
            let reward = ctx
                .rewards
                .write()
                .await
                .add_reward(&name, &day_or_today(None))?;
            println!("Claimed {} ({})", reward.name, reward.id);
        }
        RewardCommand::List => {
            let rewards = ctx.rewards.read().await.rewards();
            if rewards.is_empty() {
                println!("No rewards claimed yet.");
            }
            for r in rewards.iter() {
                println!("{}  {}  {}", r.id, r.date, r.name);
            }
        }
        RewardCommand::Remove { id } => {
            if !ctx.rewards.write().await.remove_reward(&id)? {
                return Err(VisionaryError::not_found(format!("reward {}", id)));
            }
            println!("Removed reward {}", id);
        }
    }
    Ok(())
}
