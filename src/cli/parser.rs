use crate::db::paging::{ListQuery, SortOrder};
use crate::export::ExportFormat;
use clap::{Args, Parser, Subcommand};

/// Command-line interface definition for rTimesheet
#[derive(Parser)]
#[command(
    name = "rtimesheet",
    version = env!("CARGO_PKG_VERSION"),
    about = "Timesheets for teams: employees, projects, workstreams and weekly time entries on SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// Employee id of the acting user (role checks)
    #[arg(global = true, long = "as", value_name = "EMPLOYEE_ID")]
    pub acting: Option<i64>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Paging, search and sort flags shared by every `list` subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    #[arg(long, help = "Page number (starting at 1)")]
    pub page: Option<u32>,

    #[arg(long = "per-page", help = "Rows per page (max 100)")]
    pub per_page: Option<u32>,

    #[arg(long, short = 's', help = "Case-insensitive text search")]
    pub search: Option<String>,

    #[arg(long, help = "Sort column")]
    pub sort: Option<String>,

    #[arg(long, help = "Sort descending")]
    pub desc: bool,
}

impl ListArgs {
    pub fn to_query(&self) -> ListQuery {
        ListQuery {
            page: self.page,
            per_page: self.per_page,
            search: self.search.clone(),
            sort: self.sort.clone(),
            order: if self.desc {
                SortOrder::Desc
            } else {
                SortOrder::Asc
            },
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(long = "editor", help = "Editor to use (vim, nano, or custom path)")]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal audit log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Manage employees
    Employee {
        #[command(subcommand)]
        action: EmployeeAction,
    },

    /// Manage projects
    Project {
        #[command(subcommand)]
        action: ProjectAction,
    },

    /// Manage workstreams (categories of work under a project)
    Workstream {
        #[command(subcommand)]
        action: WorkstreamAction,
    },

    /// Book, edit, delete and list time entries
    Task {
        #[command(subcommand)]
        action: TaskAction,
    },

    /// Show the weekly timesheet (Monday to Sunday)
    Week {
        #[arg(long, help = "Any date inside the week (YYYY-MM-DD, default today)")]
        date: Option<String>,

        #[arg(long, short = 'e', help = "Employee id")]
        employee: i64,
    },

    /// Show one day of the timesheet
    Day {
        #[arg(long, help = "Date (YYYY-MM-DD, default today)")]
        date: Option<String>,

        #[arg(long, short = 'e', help = "Employee id")]
        employee: i64,
    },

    /// Finally submit a week: its entries become read-only
    Submit {
        #[arg(long, help = "Any date inside the week (YYYY-MM-DD, default today)")]
        date: Option<String>,

        #[arg(long, short = 'e', help = "Employee id")]
        employee: i64,

        #[arg(long, short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },

    /// Reopen a submitted week (admin only)
    Reopen {
        #[arg(long, help = "Any date inside the week (YYYY-MM-DD, default today)")]
        date: Option<String>,

        #[arg(long, short = 'e', help = "Employee id")]
        employee: i64,
    },

    /// Create a backup copy of the database
    Backup {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long)]
        compress: bool,

        #[arg(long, short = 'f', help = "Overwrite an existing backup file")]
        force: bool,
    },

    /// Export time entries
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(
            long,
            value_name = "RANGE",
            help = "Filter by year/month/day or a custom range (start:end)"
        )]
        range: Option<String>,

        #[arg(long, short = 'e', help = "Restrict to one employee")]
        employee: Option<i64>,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Run the REST server
    Serve {
        #[arg(long, help = "Port (default from config)")]
        port: Option<u16>,

        #[arg(long, default_value = "0.0.0.0", help = "Bind address")]
        bind: String,
    },
}

#[derive(Subcommand)]
pub enum EmployeeAction {
    /// Register a new employee
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long, default_value = "")]
        designation: String,

        #[arg(long, default_value = "employee", help = "admin | employee")]
        role: String,
    },

    /// Update an employee
    Edit {
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        designation: Option<String>,

        #[arg(long, help = "admin | employee")]
        role: Option<String>,

        #[arg(long, help = "true | false")]
        active: Option<bool>,
    },

    /// Delete an employee without time entries
    Del {
        id: i64,

        #[arg(long, short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },

    /// Show one employee
    Show { id: i64 },

    /// List employees
    List {
        #[command(flatten)]
        list: ListArgs,
    },
}

#[derive(Subcommand)]
pub enum ProjectAction {
    /// Create a project
    Add {
        #[arg(long)]
        name: String,

        #[arg(long, default_value = "")]
        client: String,

        #[arg(long, default_value = "")]
        description: String,
    },

    /// Update a project
    Edit {
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        client: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long, help = "true | false")]
        active: Option<bool>,
    },

    /// Delete a project and its workstreams
    Del {
        id: i64,

        #[arg(long, short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },

    /// Show one project with its workstreams
    Show { id: i64 },

    /// List projects
    List {
        #[command(flatten)]
        list: ListArgs,
    },
}

#[derive(Subcommand)]
pub enum WorkstreamAction {
    /// Add a workstream to a project
    Add {
        #[arg(long)]
        project: i64,

        #[arg(long)]
        name: String,

        #[arg(long, default_value = "")]
        description: String,
    },

    /// Update a workstream
    Edit {
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a workstream without time entries
    Del {
        id: i64,

        #[arg(long, short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },

    /// List workstreams
    List {
        #[arg(long, help = "Only workstreams of this project")]
        project: Option<i64>,

        #[command(flatten)]
        list: ListArgs,
    },
}

#[derive(Subcommand)]
pub enum TaskAction {
    /// Book hours
    Add {
        #[arg(long, short = 'e')]
        employee: i64,

        #[arg(long, help = "Date (YYYY-MM-DD, default today)")]
        date: Option<String>,

        #[arg(long)]
        project: i64,

        #[arg(long)]
        workstream: i64,

        #[arg(long, help = "Duration as H:MM or decimal hours")]
        hours: String,

        #[arg(long, default_value = "")]
        notes: String,
    },

    /// Edit an entry that is not submitted yet
    Edit {
        id: i64,

        #[arg(long)]
        date: Option<String>,

        #[arg(long)]
        project: Option<i64>,

        #[arg(long)]
        workstream: Option<i64>,

        #[arg(long, help = "Duration as H:MM or decimal hours")]
        hours: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Delete an entry that is not submitted yet
    Del {
        id: i64,

        #[arg(long, short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },

    /// List entries
    List {
        #[arg(long, short = 'e')]
        employee: Option<i64>,

        #[arg(long, help = "Year/month/day or a custom range (start:end)")]
        range: Option<String>,

        #[command(flatten)]
        list: ListArgs,
    },
}
