//! Command implementations for the CLI interface.
//!
//! Every handler here is presentation only: it validates user input, calls the
//! repositories on `Database` and prints the result. Persistence happens inside
//! the repositories.

use clap::Subcommand;
use clap_complete::{generate, Shell};

use chrono::Local;

use crate::category::{is_hex_color, CategoryDraft, CategoryPatch};
use crate::db::*;
use crate::error::CliError;
use crate::fields::*;
use crate::task::{edit_tags, split_tag_args, Task, TaskDraft, TaskPatch};
use crate::view::ViewFilter;

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new task.
    Add {
        /// Short title for the task.
        title: String,
        /// Optional longer description.
        #[arg(long)]
        desc: Option<String>,
        /// Category name.
        #[arg(long)]
        category: Option<String>,
        /// Priority: high | medium | low.
        #[arg(long, value_enum, default_value_t = Priority::Medium)]
        priority: Priority,
        /// Due date: YYYY-MM-DD, "today", "tomorrow", or "in Nd".
        #[arg(long)]
        due: Option<String>,
        /// Comma-separated tags. May be repeated.
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// List tasks with optional filters.
    List {
        /// Only tasks in this category.
        #[arg(long)]
        category: Option<String>,
        /// Only tasks with this priority.
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        /// Sort key.
        #[arg(long, value_enum, default_value_t = SortKey::Date)]
        sort: SortKey,
        /// Limit number of rows printed.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// View a single task.
    View {
        id: u64,
    },

    /// Flip a task between done and not done.
    Toggle {
        id: u64,
    },

    /// Update fields on a task.
    Update {
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        desc: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        #[arg(long)]
        due: Option<String>,
        /// Clear due date.
        #[arg(long, conflicts_with = "due")]
        clear_due: bool,
        /// Add tags. May be repeated and comma-separated.
        #[arg(long = "add-tag")]
        add_tags: Vec<String>,
        /// Remove tags. May be repeated and comma-separated.
        #[arg(long = "rm-tag")]
        rm_tags: Vec<String>,
    },

    /// Delete a task.
    Delete {
        id: u64,
    },

    /// List distinct tags and counts.
    Tags,

    /// Manage categories.
    Category {
        #[command(subcommand)]
        action: CategoryAction,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum CategoryAction {
    /// List categories with the number of tasks using each.
    List,
    /// Create a category.
    Add {
        name: String,
        /// Hex colour such as #2e7d32. Defaults to the first palette colour.
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        icon: Option<String>,
    },
    /// Change a category. Tasks keep the category name they were created with.
    Update {
        id: u64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        icon: Option<String>,
        #[arg(long, conflicts_with = "icon")]
        clear_icon: bool,
    },
    /// Delete a category. Tasks referencing it are left as they are.
    Delete {
        id: u64,
    },
}

/// Add a new task.
pub fn cmd_add(
    db: &mut Database,
    title: String,
    desc: Option<String>,
    category: Option<String>,
    priority: Priority,
    due: Option<String>,
    tags: Vec<String>,
) -> Result<(), CliError> {
    let title = non_blank(title, "Title")?;
    let category = match category {
        Some(c) => known_category(db, c)?,
        None => String::new(),
    };
    let due_date = due.as_deref().map(parse_due).transpose()?;

    let draft = TaskDraft {
        title,
        description: desc.unwrap_or_default(),
        category,
        priority,
        due_date,
        tags: split_tag_args(&tags),
        ..Default::default()
    };
    let id = db.tasks_mut().create(draft);
    println!("Added task {id}");
    Ok(())
}

/// List tasks through the derived view.
pub fn cmd_list(
    db: &mut Database,
    category: Option<String>,
    priority: Option<Priority>,
    sort: SortKey,
    limit: Option<usize>,
) {
    db.set_filter(ViewFilter { category, priority, sort });
    let mut view = db.view();
    if let Some(n) = limit {
        view.truncate(n);
    }
    if view.is_empty() && db.filter.is_active() {
        println!("No tasks match the current filters.");
        return;
    }
    print_table(&view);
}

/// View detailed information about a specific task.
pub fn cmd_view(db: &Database, id: u64) -> Result<(), CliError> {
    let task = db.tasks().get(id).ok_or(CliError::TaskNotFound(id))?;
    let today = Local::now().date_naive();
    println!("ID:           {}", task.id);
    println!("Title:        {}", task.title);
    println!("Done:         {}", if task.completed { "yes" } else { "no" });
    println!("Priority:     {}", format_priority(task.priority));
    println!("Category:     {}", dash_if_empty(&task.category));
    println!("Due:          {}", match task.due_date {
        Some(d) => format!("{d} ({})", format_due_relative(Some(d), today)),
        None => "-".into(),
    });
    println!("Tags:         {}", if task.tags.is_empty() { "-".into() } else { task.tags.join(",") });
    println!("Created:      {}", task.created_at.map(|c| c.to_rfc3339()).unwrap_or_else(|| "-".into()));
    println!("Description:\n{}\n", dash_if_empty(&task.description));
    Ok(())
}

/// Flip a task's completion flag.
pub fn cmd_toggle(db: &mut Database, id: u64) -> Result<(), CliError> {
    if !db.tasks_mut().toggle(id) {
        return Err(CliError::TaskNotFound(id));
    }
    let done = db.tasks().get(id).is_some_and(|t| t.completed);
    println!("Task {id} marked {}", if done { "done" } else { "not done" });
    Ok(())
}

/// Update an existing task's fields.
pub fn cmd_update(
    db: &mut Database,
    id: u64,
    title: Option<String>,
    desc: Option<String>,
    category: Option<String>,
    priority: Option<Priority>,
    due: Option<String>,
    clear_due: bool,
    add_tags: Vec<String>,
    rm_tags: Vec<String>,
) -> Result<(), CliError> {
    let current = db.tasks().get(id).ok_or(CliError::TaskNotFound(id))?;

    let tags = if add_tags.is_empty() && rm_tags.is_empty() {
        None
    } else {
        Some(edit_tags(&current.tags, &split_tag_args(&add_tags), &split_tag_args(&rm_tags)))
    };
    let due_date = if clear_due {
        Some(None)
    } else {
        due.as_deref().map(parse_due).transpose()?.map(Some)
    };
    let category = match category {
        Some(c) => Some(known_category(db, c)?),
        None => None,
    };
    let patch = TaskPatch {
        title: title.map(|t| non_blank(t, "Title")).transpose()?,
        description: desc,
        category,
        priority,
        due_date,
        completed: None,
        tags,
    };

    if patch.is_empty() {
        println!("Nothing to update for task {id}");
        return Ok(());
    }
    db.tasks_mut().update(id, patch);
    println!("Updated task {id}");
    Ok(())
}

/// Delete a task.
pub fn cmd_delete(db: &mut Database, id: u64) -> Result<(), CliError> {
    if !db.tasks_mut().delete(id) {
        return Err(CliError::TaskNotFound(id));
    }
    println!("Deleted task {id}");
    Ok(())
}

/// List all distinct tags with their usage counts.
pub fn cmd_tags(db: &Database) {
    println!("{:<16} {}", "Tag", "Count");
    for (tag, c) in db.tag_counts() {
        println!("{:<16} {}", truncate(tag, 16), c);
    }
}

/// Handle category management commands.
pub fn cmd_category(db: &mut Database, action: CategoryAction) -> Result<(), CliError> {
    match action {
        CategoryAction::List => {
            let usage = db.category_usage();
            println!("{:<14} {:<16} {:<8} {:<10} {}", "ID", "Name", "Color", "Icon", "Tasks");
            for c in db.categories().all() {
                println!(
                    "{:<14} {:<16} {:<8} {:<10} {}",
                    c.id,
                    truncate(&c.name, 16),
                    c.color,
                    c.icon.as_deref().unwrap_or("-"),
                    usage.get(c.name.as_str()).copied().unwrap_or(0)
                );
            }
            let known = db.categories().names();
            let stale: Vec<_> = usage
                .iter()
                .filter(|(name, n)| **n > 0 && !name.is_empty() && !known.contains(*name))
                .collect();
            if !stale.is_empty() {
                println!();
                println!("Tasks referencing removed categories:");
                for (name, n) in stale {
                    println!("  {name}: {n}");
                }
            }
        }
        CategoryAction::Add { name, color, icon } => {
            let mut draft = CategoryDraft::new(non_blank(name, "Category name")?);
            if let Some(color) = color {
                draft.color = hex_color(color)?;
            }
            draft.icon = icon;
            let id = db.categories_mut().create(draft);
            println!("Added category {id}");
        }
        CategoryAction::Update { id, name, color, icon, clear_icon } => {
            let patch = CategoryPatch {
                name: name.map(|n| non_blank(n, "Category name")).transpose()?,
                color: color.map(hex_color).transpose()?,
                icon: if clear_icon { Some(None) } else { icon.map(Some) },
            };
            if db.categories().get(id).is_none() {
                return Err(CliError::CategoryNotFound(id));
            }
            if patch.is_empty() {
                println!("Nothing to update for category {id}");
            } else {
                db.categories_mut().update(id, patch);
                println!("Updated category {id}");
            }
        }
        CategoryAction::Delete { id } => {
            let Some(name) = db.categories().get(id).map(|c| c.name.clone()) else {
                return Err(CliError::CategoryNotFound(id));
            };
            db.categories_mut().delete(id);
            println!("Deleted category {id}");
            let referencing = db.tasks().all().iter().filter(|t| t.category == name).count();
            if referencing > 0 {
                println!("{referencing} task(s) still reference '{name}'");
            }
        }
    }
    Ok(())
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;
    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}

/// Print tasks in a formatted table.
pub fn print_table(tasks: &[&Task]) {
    println!(
        "{:<14} {:<4} {:<6} {:<10} {:<12} {}",
        "ID", "Done", "Pri", "Due", "Category", "Title [tags]"
    );
    let today = Local::now().date_naive();
    for t in tasks {
        let tags = if t.tags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", t.tags.join(","))
        };
        println!(
            "{:<14} {:<4} {:<6} {:<10} {:<12} {}{}",
            t.id,
            if t.completed { "x" } else { "" },
            format_priority(t.priority),
            format_due_relative(t.due_date, today),
            truncate(dash_if_empty(&t.category), 12),
            t.title,
            tags
        );
    }
}

fn parse_due(s: &str) -> Result<chrono::NaiveDate, CliError> {
    parse_due_input(s).ok_or_else(|| {
        CliError::InvalidInput("Unrecognised due date. Use YYYY-MM-DD, 'today', 'tomorrow', or 'in Nd'.".into())
    })
}

fn non_blank(s: String, what: &str) -> Result<String, CliError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(CliError::InvalidInput(format!("{what} cannot be empty")));
    }
    Ok(trimmed.to_string())
}

fn known_category(db: &Database, name: String) -> Result<String, CliError> {
    let name = name.trim().to_string();
    if name.is_empty() || db.categories().names().contains(&name.as_str()) {
        return Ok(name);
    }
    Err(CliError::InvalidInput(format!(
        "Unknown category '{name}'. Known: {}",
        db.categories().names().join(", ")
    )))
}

fn hex_color(s: String) -> Result<String, CliError> {
    if is_hex_color(&s) {
        Ok(s)
    } else {
        Err(CliError::InvalidInput(format!("'{s}' is not a hex colour like #1976d2")))
    }
}

fn dash_if_empty(s: &str) -> &str {
    if s.is_empty() {
        "-"
    } else {
        s
    }
}
