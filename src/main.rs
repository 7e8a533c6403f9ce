//! Dayflow CLI - terminal client for the Dayflow HR management API

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "dayflow")]
#[command(about = "Command-line client for Dayflow HR", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// API base URL (overrides DAYFLOW_API_URL and the config file)
    #[arg(long, global = true)]
    api_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with email or login ID
    Login {
        /// Email or login ID (prompted if omitted)
        #[arg(short, long)]
        user: Option<String>,

        /// Password (prompted if omitted)
        #[arg(long, env = "DAYFLOW_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Register a company and its first admin account
    Signup {
        #[arg(long)]
        company: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
    },

    /// Forget stored credentials
    Logout,

    /// Show which credentials are stored
    Status,

    /// Show the signed-in user (from the stored token)
    Whoami,

    /// Today's status, leave balances and pending requests
    Dashboard,

    /// Check in, check out, attendance reports
    #[command(subcommand)]
    Attendance(AttendanceCmd),

    /// Employee directory
    #[command(subcommand)]
    Employees(EmployeesCmd),

    /// Your profile, skills, certifications and salary
    #[command(subcommand)]
    Profile(ProfileCmd),

    /// Leave balances and requests
    #[command(subcommand)]
    Timeoff(TimeoffCmd),
}

#[derive(Subcommand)]
enum AttendanceCmd {
    /// Start today's attendance
    CheckIn,
    /// End today's attendance
    CheckOut,
    /// Current check-in status
    Current,
    /// Everyone's attendance for a day (admin/HR)
    Day {
        /// Date as understood by the server, default today
        #[arg(short, long)]
        date: Option<String>,
        /// Only show employees whose name contains this
        #[arg(short, long, default_value = "")]
        filter: String,
    },
    /// Your attendance for a month
    Month {
        #[arg(short, long)]
        month: Option<u32>,
        #[arg(short, long)]
        year: Option<i32>,
        /// Only show days whose date contains this
        #[arg(short, long, default_value = "")]
        filter: String,
    },
}

#[derive(Subcommand)]
enum EmployeesCmd {
    /// List employees
    List {
        #[arg(short, long)]
        search: Option<String>,
        #[arg(short, long)]
        page: Option<u32>,
    },
    /// Show one employee
    Show { id: String },
}

#[derive(Subcommand)]
enum ProfileCmd {
    /// Show your full profile
    Show,
    /// List skills
    Skills,
    /// Add a skill
    AddSkill {
        name: String,
        #[arg(short, long)]
        level: Option<String>,
    },
    /// Remove a skill
    RemoveSkill { id: String },
    /// List certifications
    Certifications,
    /// Add a certification
    AddCert {
        title: String,
        #[arg(long)]
        issuer: Option<String>,
        /// Issue date, YYYY-MM-DD
        #[arg(long)]
        issued: Option<String>,
    },
    /// Remove a certification
    RemoveCert { id: String },
    /// Show salary structure (admin/HR)
    Salary,
}

#[derive(Subcommand)]
enum TimeoffCmd {
    /// Your balances and requests
    Mine,
    /// Request time off
    Request {
        /// Time-off type ID (see `timeoff mine`)
        #[arg(short = 't', long = "type")]
        timeoff_type: String,
        /// First day, YYYY-MM-DD
        #[arg(long)]
        from: String,
        /// Last day, YYYY-MM-DD
        #[arg(long)]
        to: String,
        /// Supporting document
        #[arg(short, long)]
        attachment: Option<PathBuf>,
    },
    /// All requests in the company (admin/HR)
    Admin {
        /// pending, approved or rejected
        #[arg(short, long)]
        status: Option<String>,
        #[arg(long)]
        search: Option<String>,
        #[arg(short, long)]
        page: Option<u32>,
        /// Only show requests whose employee or type contains this
        #[arg(short, long, default_value = "")]
        filter: String,
    },
    /// Approve a request (admin/HR)
    Approve { id: String },
    /// Reject a request (admin/HR)
    Reject {
        id: String,
        #[arg(short, long)]
        reason: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let client = commands::client(cli.api_url.as_deref())?;

    match cli.command {
        Commands::Login { user, password } => {
            tracing::info!("Signing in...");
            commands::login(&client, user, password).await?;
        }
        Commands::Signup {
            company,
            name,
            email,
            phone,
        } => {
            commands::signup(&client, company, name, email, phone).await?;
        }
        Commands::Logout => commands::logout(&client),
        Commands::Status => commands::status(&client),
        Commands::Whoami => commands::whoami(&client)?,
        Commands::Dashboard => commands::dashboard(&client).await?,
        Commands::Attendance(cmd) => match cmd {
            AttendanceCmd::CheckIn => commands::check_in(&client).await?,
            AttendanceCmd::CheckOut => commands::check_out(&client).await?,
            AttendanceCmd::Current => commands::current(&client).await?,
            AttendanceCmd::Day { date, filter } => {
                commands::attendance_day(&client, date, &filter).await?
            }
            AttendanceCmd::Month {
                month,
                year,
                filter,
            } => commands::attendance_month(&client, month, year, &filter).await?,
        },
        Commands::Employees(cmd) => match cmd {
            EmployeesCmd::List { search, page } => {
                commands::list_employees(&client, search, page).await?
            }
            EmployeesCmd::Show { id } => commands::show_employee(&client, &id).await?,
        },
        Commands::Profile(cmd) => match cmd {
            ProfileCmd::Show => commands::show_profile(&client).await?,
            ProfileCmd::Skills => commands::list_skills(&client).await?,
            ProfileCmd::AddSkill { name, level } => {
                commands::add_skill(&client, name, level).await?
            }
            ProfileCmd::RemoveSkill { id } => commands::remove_skill(&client, &id).await?,
            ProfileCmd::Certifications => commands::list_certifications(&client).await?,
            ProfileCmd::AddCert {
                title,
                issuer,
                issued,
            } => commands::add_certification(&client, title, issuer, issued).await?,
            ProfileCmd::RemoveCert { id } => {
                commands::remove_certification(&client, &id).await?
            }
            ProfileCmd::Salary => commands::show_salary(&client).await?,
        },
        Commands::Timeoff(cmd) => match cmd {
            TimeoffCmd::Mine => commands::my_time_off(&client).await?,
            TimeoffCmd::Request {
                timeoff_type,
                from,
                to,
                attachment,
            } => {
                tracing::info!("Submitting time-off request...");
                commands::request_time_off(&client, timeoff_type, from, to, attachment.as_deref())
                    .await?
            }
            TimeoffCmd::Admin {
                status,
                search,
                page,
                filter,
            } => commands::admin_time_off(&client, status, search, page, &filter).await?,
            TimeoffCmd::Approve { id } => commands::approve(&client, &id).await?,
            TimeoffCmd::Reject { id, reason } => commands::reject(&client, &id, &reason).await?,
        },
    }

    Ok(())
}
