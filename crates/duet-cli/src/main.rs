//! `duet` — command-line demo driver for the Duet matchmaking engine.
//!
//! # Usage
//!
//! ```text
//! duet login demo-user
//! duet set-profile --name "Demo" --gender woman --preference man
//! duet couples
//! duet rate 1 2 yes
//! duet matches
//! duet send 1 "hi there" --wait
//! duet thread 1
//! ```

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use duet_core::{
  candidate::{Candidate, Gender, demo_pool, generate_couples},
  matching::Match,
  profile::{Preference, Profile},
  rating::Verdict,
};
use duet_engine::{Session, session};
use duet_store_sqlite::SqliteStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "duet", about = "Demo matchmaking engine")]
struct Cli {
  /// Path to the SQLite store.
  #[arg(long, env = "DUET_DB", default_value = "duet.db")]
  db: PathBuf,

  /// Act as this user id; defaults to the signed-in user.
  #[arg(long)]
  user: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Sign in as a user id, remembered for later invocations.
  Login { user_id: String },
  /// Forget the signed-in user. Profiles, ratings and chats stay.
  Logout,
  /// Save your profile.
  SetProfile {
    #[arg(long)]
    name:       String,
    #[arg(long)]
    gender:     Option<CliGender>,
    #[arg(long)]
    preference: Option<CliGender>,
    #[arg(long, default_value = "")]
    summary:    String,
    #[arg(long, default_value = "")]
    photo:      String,
  },
  /// Show your saved profile.
  ShowProfile,
  /// List the rateable couples and your verdicts so far.
  Couples,
  /// Rate the couple formed by two candidate ids.
  Rate {
    first:   String,
    second:  String,
    verdict: CliVerdict,
  },
  /// Show your ranked matches.
  Matches,
  /// Send a message to a candidate.
  Send {
    partner: String,
    message: String,
    /// Block until the simulated reply has arrived.
    #[arg(long)]
    wait:    bool,
  },
  /// Show the conversation with a candidate (marks it read).
  Thread { partner: String },
  /// List your open conversations.
  Chats,
}

#[derive(Clone, Copy, ValueEnum)]
enum CliGender {
  Man,
  Woman,
}

impl From<CliGender> for Gender {
  fn from(g: CliGender) -> Self {
    match g {
      CliGender::Man => Gender::Man,
      CliGender::Woman => Gender::Woman,
    }
  }
}

impl From<CliGender> for Preference {
  fn from(g: CliGender) -> Self {
    match g {
      CliGender::Man => Preference::Man,
      CliGender::Woman => Preference::Woman,
    }
  }
}

#[derive(Clone, Copy, ValueEnum)]
enum CliVerdict {
  Yes,
  No,
}

impl From<CliVerdict> for Verdict {
  fn from(v: CliVerdict) -> Self {
    match v {
      CliVerdict::Yes => Verdict::Yes,
      CliVerdict::No => Verdict::No,
    }
  }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let store = Arc::new(
    SqliteStore::open(&cli.db)
      .await
      .with_context(|| format!("opening store at {}", cli.db.display()))?,
  );

  // Sign-in bookkeeping needs no session.
  match &cli.command {
    Command::Login { user_id } => {
      session::set_current_user(store.as_ref(), user_id).await?;
      println!("signed in as {user_id}");
      return Ok(());
    }
    Command::Logout => {
      session::clear_current_user(store.as_ref()).await?;
      println!("signed out");
      return Ok(());
    }
    _ => {}
  }

  let user_id = match cli.user {
    Some(user) => user,
    None => session::current_user(store.as_ref())
      .await?
      .context("no user signed in; run `duet login <id>` or pass --user")?,
  };

  let session = Session::new(store, user_id);
  let pool = demo_pool();

  match cli.command {
    Command::Login { .. } | Command::Logout => unreachable!("handled above"),

    Command::SetProfile { name, gender, preference, summary, photo } => {
      let profile = Profile {
        name,
        gender: gender.map(Into::into),
        preference: preference.map(Into::into),
        photo_ref: photo,
        summary,
      };
      session.save_profile(&profile).await?;
      println!("profile saved");
    }

    Command::ShowProfile => match session.profile().await? {
      Some(profile) => {
        println!("name:       {}", profile.name);
        println!("gender:     {}", opt_label(profile.gender.map(gender_label)));
        println!(
          "preference: {}",
          opt_label(profile.preference.map(preference_label))
        );
        if !profile.summary.is_empty() {
          println!("summary:    {}", profile.summary);
        }
      }
      None => println!("no profile yet; run `duet set-profile`"),
    },

    Command::Couples => {
      let ledger = session.ledger().await?;
      for couple in generate_couples(&pool, &mut rand::rng()) {
        let verdict = match ledger.verdict_for(&couple.id) {
          Some(Verdict::Yes) => "  [rated yes]",
          Some(Verdict::No) => "  [rated no]",
          None => "",
        };
        println!(
          "{:>5}  {} + {}{verdict}",
          couple.id, couple.first.name, couple.second.name
        );
      }
    }

    Command::Rate { first, second, verdict } => {
      let rating = session.submit_rating(&first, &second, verdict.into()).await?;
      println!("recorded {:?} for couple {}", rating.verdict, rating.pair_id);
    }

    Command::Matches => {
      let matches = session.matches(&pool).await?;
      if matches.is_empty() {
        println!("no matches yet — rate some couples first");
      }
      for (rank, m) in matches.iter().enumerate() {
        print_match(rank + 1, m);
      }
    }

    Command::Send { partner, message, wait } => {
      session.send_message(&partner, &message).await?;
      println!("sent to {}", candidate_name(&pool, &partner));
      if wait {
        session.responder().join(session.user_id(), &partner).await;
        if let Some(reply) = session.load_messages(&partner).await?.last() {
          if reply.sender_id == partner {
            println!("{}: {}", candidate_name(&pool, &partner), reply.content);
          }
        }
      }
    }

    Command::Thread { partner } => {
      let messages = session.load_messages(&partner).await?;
      if messages.is_empty() {
        println!("no conversation yet");
      }
      for message in &messages {
        let author = if message.sender_id == session.user_id() {
          "you".to_owned()
        } else {
          candidate_name(&pool, &message.sender_id)
        };
        println!("[{}] {author}: {}", format_time(message.timestamp), message.content);
      }
      if session.is_partner_typing(&partner).await {
        println!("{} is typing…", candidate_name(&pool, &partner));
      }
      session.mark_read(&partner).await?;
    }

    Command::Chats => {
      let summaries = session.conversation_summaries(&pool).await?;
      if summaries.is_empty() {
        println!("no open conversations");
      }
      for summary in summaries {
        let unread = if summary.unread > 0 {
          format!("  ({} unread)", summary.unread)
        } else {
          String::new()
        };
        println!(
          "{}: {}{unread}",
          candidate_name(&pool, &summary.partner_id),
          summary.last_message.content
        );
      }
    }
  }

  Ok(())
}

// ─── Output helpers ───────────────────────────────────────────────────────────

fn print_match(rank: usize, m: &Match) {
  let mutual = if m.mutual_count > 0 {
    format!(", {} mutual", m.mutual_count)
  } else {
    String::new()
  };
  println!(
    "{rank:>2}. {} ({})  {}% match{mutual}",
    m.candidate.name,
    m.candidate.age,
    m.display_percent()
  );
}

fn candidate_name(pool: &[Candidate], id: &str) -> String {
  pool
    .iter()
    .find(|c| c.id == id)
    .map(|c| c.name.clone())
    .unwrap_or_else(|| id.to_owned())
}

fn gender_label(gender: Gender) -> &'static str {
  match gender {
    Gender::Man => "man",
    Gender::Woman => "woman",
  }
}

fn preference_label(preference: Preference) -> &'static str {
  match preference {
    Preference::Man => "looking for a man",
    Preference::Woman => "looking for a woman",
  }
}

fn opt_label(label: Option<&'static str>) -> &'static str {
  label.unwrap_or("(not set)")
}

fn format_time(timestamp_ms: i64) -> String {
  chrono::DateTime::from_timestamp_millis(timestamp_ms)
    .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
    .unwrap_or_else(|| timestamp_ms.to_string())
}
