//! # todo-board
//!
//! A categorised to-do list with local, write-through storage.
//!
//! ## Key Features
//!
//! - **Tasks**: title, description, category, priority (High / Medium / Low),
//!   optional due date, completion flag, creation time and tags
//! - **Categories**: named, coloured labels, seeded with Work, Personal,
//!   Shopping, Health and Other on first run
//! - **Derived view**: filter by category and priority, sort by creation date,
//!   priority or title
//! - **Local storage**: each collection is re-written in full as JSON after
//!   every change; missing or corrupt data falls back to a usable state
//!
//! ## Layout
//!
//! - [`repo`] owns the collections and their create / toggle / update / delete
//!   operations
//! - [`view`] computes the filtered, sorted list for display
//! - [`store`] is the key-value byte store and the (de)serialization on top
//! - [`db`] ties both repositories and the view selections into one state
//!   container
//! - [`cli`] and [`cmd`] are the `todo` command-line front end
//!
//! ```no_run
//! use todo_board::db::Database;
//! use todo_board::task::TaskDraft;
//!
//! let mut db = Database::open_dir(std::path::Path::new("./board"));
//! let id = db.tasks_mut().create(TaskDraft::new("Water the plants"));
//! db.tasks_mut().toggle(id);
//! for task in db.view() {
//!     println!("{} {}", task.id, task.title);
//! }
//! ```

pub mod category;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod db;
pub mod error;
pub mod fields;
pub mod ids;
pub mod repo;
pub mod store;
pub mod task;
pub mod view;
