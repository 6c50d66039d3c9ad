mod transport;

use std::io::{BufRead, Write};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use todo_web::page::Modal;
use todo_web::{App, Config, Confirm, CreateForm, EditForm, PageState, Renderer, TodoClient, TodoId, Transport};
use tracing_subscriber::EnvFilter;

use crate::transport::UreqTransport;

#[derive(Parser)]
#[command(name = "todo-web", about = "Manage todos on the remote todo API")]
struct Cli {
    /// Overrides TODO_API_BASE_URL.
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the todo list.
    List,
    /// Look a todo up by ID.
    Search { id: String },
    /// Show the detail view of a todo.
    View { id: TodoId },
    /// Create a todo.
    Create {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "1")]
        priority: String,
        /// Local time as YYYY-MM-DDTHH:MM; now when omitted.
        #[arg(long, default_value = "")]
        due_at: String,
    },
    /// Flip the completion flag of a todo.
    Toggle { id: TodoId },
    /// Edit a todo; omitted options keep their current values.
    Edit {
        id: TodoId,
        #[command(flatten)]
        changes: EditChanges,
    },
    /// Delete a todo after confirmation.
    Delete {
        id: TodoId,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// Print the whole page.
    Page,
}

/// Fields given on the command line for `edit`.
#[derive(Args, Debug, Default)]
struct EditChanges {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    completed: Option<bool>,
    #[arg(long)]
    priority: Option<String>,
    #[arg(long)]
    due_at: Option<String>,
}

impl EditChanges {
    /// Overlay the given fields on the pre-filled form.
    fn apply(self, form: EditForm) -> EditForm {
        EditForm {
            id: form.id,
            title: self.title.unwrap_or(form.title),
            description: self.description.unwrap_or(form.description),
            is_completed: self.completed.unwrap_or(form.is_completed),
            priority: self.priority.unwrap_or(form.priority),
            due_at: self.due_at.unwrap_or(form.due_at),
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    tracing::debug!(base_url = %config.base_url, offset = %config.utc_offset, "starting");

    let assume_yes = matches!(cli.command, Command::Delete { yes: true, .. });
    let mut app = connect(&config, confirmation(assume_yes, prompt));

    app.load_todos();
    let output = run(&mut app, cli.command);

    for banner in app.page().banners.iter() {
        eprintln!("{}", banner.message);
    }
    if let Some(output) = output {
        println!("{output}");
    }

    if failed(app.page()) {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn connect<C: Confirm>(config: &Config, confirm: C) -> App<UreqTransport, C> {
    App::new(
        TodoClient::new(&config.base_url),
        UreqTransport::new(),
        confirm,
        Renderer::new(config.utc_offset),
    )
}

/// `--yes` answers the delete prompt without asking.
fn confirmation(assume_yes: bool, mut ask: impl FnMut(&str) -> bool) -> impl FnMut(&str) -> bool {
    move |message: &str| assume_yes || ask(message)
}

/// An error banner still showing when the command ends.
fn failed(page: &PageState) -> bool {
    page.banners.error().is_some()
}

/// Run one user action and return the markup it affects.
fn run<T: Transport, C: Confirm>(app: &mut App<T, C>, command: Command) -> Option<String> {
    match command {
        Command::List => list(app),
        Command::Page => Some(app.render()),
        Command::Search { id } => {
            app.search(&id);
            app.page().search_result.clone()
        }
        Command::View { id } => {
            app.view(id);
            app.page().view_modal.content().cloned()
        }
        Command::Create {
            title,
            description,
            priority,
            due_at,
        } => {
            app.submit_create(CreateForm {
                title,
                description,
                priority,
                due_at,
            });
            list(app)
        }
        Command::Toggle { id } => {
            app.toggle(id);
            list(app)
        }
        Command::Edit { id, changes } => {
            app.open_edit(id);
            let Modal::Open(form) = app.page().edit_modal.clone() else {
                eprintln!("No hay ningún todo con el ID {id} en la lista");
                return None;
            };
            app.submit_edit(changes.apply(form));
            list(app)
        }
        Command::Delete { id, .. } => {
            app.delete(id);
            list(app)
        }
    }
}

fn list<T: Transport, C: Confirm>(app: &App<T, C>) -> Option<String> {
    Some(app.renderer().list(app.store().items()))
}

fn prompt(message: &str) -> bool {
    eprint!("{message} [s/N] ");
    if std::io::stderr().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if std::io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    is_yes(&answer)
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "s" | "si" | "sí" | "y" | "yes")
}

#[cfg(test)]
mod tests {
    use chrono::FixedOffset;

    use super::*;

    fn start_server() -> String {
        let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = std_listener.local_addr().unwrap();
        std_listener.set_nonblocking(true).unwrap();

        std::thread::spawn(move || {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            rt.block_on(async {
                let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
                mock_server::run(listener).await
            })
            .unwrap();
        });

        format!("http://{addr}")
    }

    fn config(base_url: &str) -> Config {
        Config::new(base_url, FixedOffset::east_opt(3600).unwrap())
    }

    fn parse(args: &[&str]) -> Command {
        Cli::try_parse_from(args).unwrap().command
    }

    fn never_asked(_: &str) -> bool {
        panic!("confirmation prompt shown")
    }

    fn create(title: &str, priority: &str) -> Command {
        Command::Create {
            title: title.to_string(),
            description: "Texto".to_string(),
            priority: priority.to_string(),
            due_at: "2024-03-15T11:00".to_string(),
        }
    }

    #[test]
    fn accepted_answers() {
        for answer in ["s\n", "Sí", " si ", "y", "YES\r\n"] {
            assert!(is_yes(answer), "{answer:?}");
        }
        for answer in ["", "\n", "n", "no", "sip"] {
            assert!(!is_yes(answer), "{answer:?}");
        }
    }

    #[test]
    fn assume_yes_skips_the_question() {
        let mut confirm = confirmation(true, never_asked);
        assert!(confirm("¿Seguro?"));

        let mut asked = Vec::new();
        let mut confirm = confirmation(false, |message: &str| {
            asked.push(message.to_string());
            false
        });
        assert!(!confirm("¿Seguro?"));
        drop(confirm);
        assert_eq!(asked, ["¿Seguro?"]);
    }

    #[test]
    fn edit_keeps_omitted_fields() {
        let form = EditForm {
            id: "4".to_string(),
            title: "Antes".to_string(),
            description: "Texto".to_string(),
            is_completed: true,
            priority: "3".to_string(),
            due_at: "2024-03-15T11:00".to_string(),
        };
        let Command::Edit { id, changes } = parse(&["todo-web", "edit", "4", "--title", "Después", "--completed", "false"])
        else {
            panic!("expected edit");
        };
        assert_eq!(id, 4);
        let merged = changes.apply(form.clone());
        assert_eq!(merged.title, "Después");
        assert!(!merged.is_completed);
        assert_eq!(merged.description, form.description);
        assert_eq!(merged.priority, form.priority);
        assert_eq!(merged.due_at, form.due_at);
        assert_eq!(EditChanges::default().apply(form.clone()), form);
    }

    #[test]
    fn delete_flag_parses() {
        assert!(matches!(parse(&["todo-web", "delete", "2", "--yes"]), Command::Delete { id: 2, yes: true }));
        assert!(matches!(parse(&["todo-web", "delete", "2"]), Command::Delete { id: 2, yes: false }));
    }

    #[test]
    fn create_and_edit_against_server() {
        let config = config(&start_server());
        let mut app = connect(&config, never_asked);
        app.load_todos();

        let output = run(&mut app, create("Comprar pan", "3")).unwrap();
        assert!(output.contains("Comprar pan"));
        assert!(!failed(app.page()));

        let changes = EditChanges {
            title: Some("Comprar leche".to_string()),
            ..EditChanges::default()
        };
        let output = run(&mut app, Command::Edit { id: 1, changes }).unwrap();
        assert!(output.contains("Comprar leche"));
        assert!(!failed(app.page()));

        let todo = app.store().get(1).unwrap();
        assert_eq!(todo.priority, Some(3));
        assert_eq!(todo.description.as_deref(), Some("Texto"));
        assert_eq!(todo.due_at, "2024-03-15T10:00:00.000Z");
    }

    #[test]
    fn edit_unknown_id_prints_nothing() {
        let config = config(&start_server());
        let mut app = connect(&config, never_asked);
        app.load_todos();
        let output = run(
            &mut app,
            Command::Edit {
                id: 9,
                changes: EditChanges::default(),
            },
        );
        assert_eq!(output, None);
    }

    #[test]
    fn delete_with_yes_runs_without_prompt() {
        let config = config(&start_server());
        let mut app = connect(&config, confirmation(true, never_asked));
        app.load_todos();
        run(&mut app, create("Borrar", "1"));
        assert_eq!(app.store().len(), 1);

        let output = run(&mut app, Command::Delete { id: 1, yes: true }).unwrap();
        assert!(output.contains(r#"<span id="todoCount">0</span>"#));
        assert!(app.store().is_empty());
        assert!(!failed(app.page()));
    }

    #[test]
    fn declined_delete_keeps_todo() {
        let config = config(&start_server());
        let mut app = connect(&config, confirmation(false, |_: &str| false));
        app.load_todos();
        run(&mut app, create("Quedarse", "2"));

        run(&mut app, Command::Delete { id: 1, yes: false });
        assert_eq!(app.store().len(), 1);
    }

    #[test]
    fn unreachable_server_fails_the_command() {
        let addr = std::net::TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
        let config = config(&format!("http://{addr}"));
        let mut app = connect(&config, never_asked);
        app.load_todos();
        let output = run(&mut app, Command::List).unwrap();
        assert!(output.contains("emptyState"));
        assert!(failed(app.page()));
        assert_eq!(app.page().banners.error().unwrap().message, "Error al cargar los todos");
    }
}
