//! Clap derive structures for the `lendops` CLI.
//!
//! Defines the complete command tree, global flags, and shared types. This
//! file is also compiled by `build.rs` for man pages, so it may only depend
//! on clap and clap_complete.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// lendops -- operations CLI for the lending platform
#[derive(Debug, Parser)]
#[command(
    name = "lendops",
    version,
    about = "Run lending platform operations from the command line",
    long_about = "Operator CLI for the lending platform's back-office services.\n\n\
        Talks to the loans, accounting, collections, compliance, products,\n\
        reporting, notifications, media and organization services through\n\
        the gateway configured in the active profile.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Gateway profile to use
    #[arg(long, short = 'p', env = "LENDOPS_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Gateway URL (overrides profile)
    #[arg(long, short = 'g', env = "LENDOPS_GATEWAY", global = true)]
    pub gateway: Option<String>,

    /// Access token for this invocation only (bypasses token storage)
    #[arg(long, env = "LENDOPS_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Output format [default: from config, else table]
    #[arg(long, short = 'o', env = "LENDOPS_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: from config, else auto]
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "LENDOPS_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (0 disables)
    #[arg(long, env = "LENDOPS_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

impl GlobalOpts {
    /// Effective output format once config defaults have been applied.
    pub fn format(&self) -> OutputFormat {
        self.output.unwrap_or_default()
    }
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    #[default]
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in, sign out, show the current user
    Auth(AuthArgs),

    /// Loan applications, approvals, disbursements and repayments
    #[command(alias = "ln")]
    Loans(LoansArgs),

    /// Customer records
    #[command(alias = "cust")]
    Customers(CustomersArgs),

    /// Loan products
    Products(ProductsArgs),

    /// Journal entries, ledger accounts and float accounts
    #[command(alias = "acct")]
    Accounting(AccountingArgs),

    /// Arrears cases and collection actions
    #[command(alias = "coll")]
    Collections(CollectionsArgs),

    /// AML alerts, risk profiles and sanctions screening
    Compliance(ComplianceArgs),

    /// Dashboard figures and portfolio reports
    Reports(ReportsArgs),

    /// Notification settings and templates
    #[command(alias = "notif")]
    Notifications(NotificationsArgs),

    /// Uploaded documents
    Media(MediaArgs),

    /// Organization settings and branches
    Org(OrgArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared Arguments ─────────────────────────────────────────────────

/// Pagination arguments for paged list commands.
#[derive(Debug, Clone, Copy, Args)]
pub struct PageArgs {
    /// Page number (0-based)
    #[arg(long, default_value = "0")]
    pub page: u32,

    /// Page size
    #[arg(long, short = 'n', default_value = "20")]
    pub size: u32,
}

/// Inclusive date window.
#[derive(Debug, Clone, Args)]
pub struct DateRangeArgs {
    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// End date (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,
}

/// JSON payload for create/update commands.
#[derive(Debug, Clone, Args)]
pub struct PayloadArgs {
    /// Read the request body from a JSON file
    #[arg(long, short = 'F', required = true)]
    pub from_file: PathBuf,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  AUTH
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommand,
}

#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    /// Sign in and store the access token for the active profile
    Login {
        /// Username (defaults to the profile's username, else prompts)
        #[arg(long, short = 'u')]
        username: Option<String>,

        /// Read the password from this environment variable instead of prompting
        #[arg(long)]
        password_env: Option<String>,
    },

    /// Sign out and forget the stored token
    Logout,

    /// Show the signed-in user
    Whoami,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  LOANS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LoansArgs {
    #[command(subcommand)]
    pub command: LoansCommand,
}

#[derive(Debug, Subcommand)]
pub enum LoansCommand {
    /// List loans
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        page: PageArgs,

        /// Filter by status (e.g. PENDING, ACTIVE, IN_ARREARS)
        #[arg(long)]
        status: Option<String>,

        /// Filter by customer ID
        #[arg(long)]
        customer: Option<String>,

        /// Filter by branch ID
        #[arg(long)]
        branch: Option<String>,
    },

    /// Show one loan
    Get {
        /// Loan ID
        id: String,
    },

    /// Submit a loan application
    Create(PayloadArgs),

    /// Approve a pending application
    Approve {
        /// Loan ID
        id: String,

        /// Approval comment
        #[arg(long)]
        comment: Option<String>,
    },

    /// Reject a pending application
    Reject {
        /// Loan ID
        id: String,

        /// Rejection reason
        #[arg(long, required = true)]
        reason: String,
    },

    /// Release funds for an approved loan
    Disburse {
        /// Loan ID
        id: String,

        /// Payout channel (e.g. MPESA, BANK)
        #[arg(long, required = true)]
        channel: String,

        /// Amount, when disbursing less than the approved principal
        #[arg(long)]
        amount: Option<String>,

        /// External payout reference
        #[arg(long)]
        reference: Option<String>,
    },

    /// Show the repayment schedule
    Schedule {
        /// Loan ID
        id: String,
    },

    /// List repayments received
    Repayments {
        /// Loan ID
        id: String,
    },

    /// Record a repayment
    Repay {
        /// Loan ID
        id: String,

        /// Amount paid
        #[arg(long, required = true)]
        amount: String,

        /// Payment date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Payment reference (e.g. M-Pesa receipt)
        #[arg(long)]
        reference: Option<String>,

        /// Payment channel
        #[arg(long)]
        channel: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CUSTOMERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CustomersArgs {
    #[command(subcommand)]
    pub command: CustomersCommand,
}

#[derive(Debug, Subcommand)]
pub enum CustomersCommand {
    /// List customers
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        page: PageArgs,

        /// Search by name, phone or national ID
        #[arg(long, short = 's')]
        search: Option<String>,
    },

    /// Show one customer
    Get {
        /// Customer ID
        id: String,
    },

    /// Register a customer
    Create(PayloadArgs),

    /// Update a customer record
    Update {
        /// Customer ID
        id: String,

        #[command(flatten)]
        payload: PayloadArgs,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PRODUCTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ProductsArgs {
    #[command(subcommand)]
    pub command: ProductsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProductsCommand {
    /// List loan products
    #[command(alias = "ls")]
    List,

    /// Show one product
    Get {
        /// Product ID
        id: String,
    },

    /// Define a new product
    Create(PayloadArgs),

    /// Replace a product definition
    Update {
        /// Product ID
        id: String,

        #[command(flatten)]
        payload: PayloadArgs,
    },

    /// Make a product available for new applications
    Activate {
        /// Product ID
        id: String,
    },

    /// Withdraw a product from new applications
    Deactivate {
        /// Product ID
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ACCOUNTING
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct AccountingArgs {
    #[command(subcommand)]
    pub command: AccountingCommand,
}

#[derive(Debug, Subcommand)]
pub enum AccountingCommand {
    /// List journal entries
    Journal {
        #[command(flatten)]
        page: PageArgs,

        #[command(flatten)]
        range: DateRangeArgs,
    },

    /// Show one journal entry with its lines
    Entry {
        /// Journal entry ID
        id: String,
    },

    /// Post a manual journal entry
    Post(PayloadArgs),

    /// Reverse a posted journal entry
    Reverse {
        /// Journal entry ID
        id: String,

        /// Reason recorded on the reversal
        #[arg(long, required = true)]
        reason: String,
    },

    /// Chart of accounts
    Accounts,

    /// Trial balance
    TrialBalance {
        /// Balance date (YYYY-MM-DD, defaults to today server-side)
        #[arg(long)]
        as_of: Option<String>,
    },

    /// Mobile-money and bank float accounts
    Floats,

    /// Record a float top-up
    TopUp {
        /// Float account ID
        id: String,

        /// Amount added
        #[arg(long, required = true)]
        amount: String,

        /// Transfer reference
        #[arg(long, required = true)]
        reference: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COLLECTIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CollectionsArgs {
    #[command(subcommand)]
    pub command: CollectionsCommand,
}

#[derive(Debug, Subcommand)]
pub enum CollectionsCommand {
    /// List collection cases
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        page: PageArgs,

        /// Filter by case status
        #[arg(long)]
        status: Option<String>,

        /// Filter by assigned agent ID
        #[arg(long)]
        assignee: Option<String>,
    },

    /// Show one case
    Get {
        /// Case ID
        id: String,
    },

    /// Assign a case to an agent
    Assign {
        /// Case ID
        id: String,

        /// Agent (user) ID
        #[arg(long, required = true)]
        agent: String,
    },

    /// Log a collection action against a case
    Log {
        /// Case ID
        id: String,

        /// Action type (e.g. CALL, SMS, VISIT, PROMISE_TO_PAY)
        #[arg(long = "type", required = true)]
        action_type: String,

        /// Free-text notes
        #[arg(long)]
        notes: Option<String>,

        /// Amount promised by the customer
        #[arg(long)]
        promised_amount: Option<String>,

        /// Date promised (YYYY-MM-DD)
        #[arg(long)]
        promised_date: Option<String>,
    },

    /// Action history for a case
    Actions {
        /// Case ID
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLIANCE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ComplianceArgs {
    #[command(subcommand)]
    pub command: ComplianceCommand,
}

#[derive(Debug, Subcommand)]
pub enum ComplianceCommand {
    /// List compliance alerts
    Alerts {
        #[command(flatten)]
        page: PageArgs,

        /// Filter by severity
        #[arg(long)]
        severity: Option<String>,

        /// Filter by status
        #[arg(long)]
        status: Option<String>,
    },

    /// Show one alert
    Alert {
        /// Alert ID
        id: String,
    },

    /// Close an alert
    Resolve {
        /// Alert ID
        id: String,

        /// Outcome (e.g. FALSE_POSITIVE, ESCALATED, REPORTED)
        #[arg(long, required = true)]
        resolution: String,

        /// Investigation notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// Show a customer's risk profile
    Risk {
        /// Customer ID
        customer_id: String,
    },

    /// Run sanctions / PEP screening for a customer
    Screen {
        /// Customer ID
        customer_id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  REPORTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ReportsArgs {
    #[command(subcommand)]
    pub command: ReportsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ReportsCommand {
    /// Headline operations figures
    Dashboard,

    /// Portfolio at risk by days-past-due band
    Par {
        /// Report date (YYYY-MM-DD)
        #[arg(long)]
        as_of: Option<String>,
    },

    /// Disbursements per day
    Disbursements {
        #[command(flatten)]
        range: DateRangeArgs,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  NOTIFICATIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct NotificationsArgs {
    #[command(subcommand)]
    pub command: NotificationsCommand,
}

#[derive(Debug, Subcommand)]
pub enum NotificationsCommand {
    /// Per-event notification settings
    Configs,

    /// Message templates
    Templates,

    /// Replace the settings for one event type
    Update {
        /// Event type (e.g. LOAN_APPROVED)
        event_type: String,

        #[command(flatten)]
        payload: PayloadArgs,
    },

    /// Send a test message
    Test {
        /// Channel (e.g. SMS, EMAIL)
        #[arg(long, required = true)]
        channel: String,

        /// Phone number or email address
        #[arg(long, required = true)]
        recipient: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  MEDIA
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct MediaArgs {
    #[command(subcommand)]
    pub command: MediaCommand,
}

#[derive(Debug, Subcommand)]
pub enum MediaCommand {
    /// Upload a document
    Upload {
        /// File to upload
        path: PathBuf,

        /// Document category (e.g. KYC, LOAN_AGREEMENT)
        #[arg(long, required = true)]
        category: String,

        /// Customer, loan or case the document belongs to
        #[arg(long = "reference", required = true)]
        reference_id: String,

        /// MIME type (guessed from the file extension when omitted)
        #[arg(long)]
        content_type: Option<String>,
    },

    /// List documents attached to a reference
    #[command(alias = "ls")]
    List {
        /// Customer, loan or case ID
        reference_id: String,
    },

    /// Show document metadata
    Get {
        /// Media ID
        id: String,
    },

    /// Delete a document
    #[command(alias = "rm")]
    Delete {
        /// Media ID
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ORGANIZATION
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct OrgArgs {
    #[command(subcommand)]
    pub command: OrgCommand,
}

#[derive(Debug, Subcommand)]
pub enum OrgCommand {
    /// Show organization settings
    Settings,

    /// Replace organization settings
    Update(PayloadArgs),

    /// List branches
    Branches,

    /// Open a branch
    AddBranch(PayloadArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG & COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create or extend the config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
