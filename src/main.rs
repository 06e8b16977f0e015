use anyhow::Result;
use clap::{Parser, Subcommand};
use dagit::areas::repository::Repository;
use dagit::artifacts::objects::object_type::ObjectType;
use is_terminal::IsTerminal;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "DAGIT_LOG";

#[derive(Parser)]
#[command(
    name = "dagit",
    version,
    about = "A minimal content-addressed version control system",
    long_about = "dagit stores file contents, directory trees and commits as immutable, \
    content-addressed objects and names points in the resulting history with refs. \
    Everything lives in a .dagit directory at the root of the working directory.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "This command initializes a new repository in the current directory or at the specified path."
    )]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<PathBuf>,
    },
    #[command(
        name = "hash-object",
        about = "Store a file as a blob and print its ID"
    )]
    HashObject {
        #[arg(index = 1)]
        file: PathBuf,
    },
    #[command(
        name = "cat-file",
        about = "Print the raw content of an object",
        long_about = "This command prints the content of the object a name resolves to. \
        With --expect, it fails unless the object has the given kind."
    )]
    CatFile {
        #[arg(long, help = "Required object kind (blob, tree or commit)")]
        expect: Option<ObjectType>,
        #[arg(index = 1, help = "Name or ID of the object")]
        object: String,
    },
    #[command(
        name = "write-tree",
        about = "Snapshot the working directory and print the tree ID"
    )]
    WriteTree,
    #[command(
        name = "read-tree",
        about = "Replace the working directory with a tree",
        long_about = "This command removes every file outside .dagit and writes out the given tree. \
        Untracked files are lost."
    )]
    ReadTree {
        #[arg(index = 1, help = "Name or ID of the tree")]
        tree: String,
    },
    #[command(
        name = "commit",
        about = "Create a new commit with the specified message",
        long_about = "This command snapshots the working directory and records it as a commit on top of HEAD."
    )]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
    },
    #[command(name = "log", about = "Show commit history")]
    Log {
        #[arg(index = 1, default_value = "@", help = "Where to start")]
        name: String,
    },
    #[command(
        name = "checkout",
        about = "Restore a commit and move HEAD to it",
        long_about = "This command restores the commit a name resolves to. \
        Checking out a branch attaches HEAD to it; anything else detaches HEAD."
    )]
    Checkout {
        #[arg(index = 1)]
        name: String,
    },
    #[command(
        name = "branch",
        about = "List branches, or create one",
        long_about = "Without arguments, lists branches and marks the current one. \
        With a name, creates a branch at the start point (HEAD by default)."
    )]
    Branch {
        #[arg(index = 1)]
        name: Option<String>,
        #[arg(index = 2, requires = "name")]
        start: Option<String>,
    },
    #[command(name = "tag", about = "Create a tag")]
    Tag {
        #[arg(index = 1)]
        name: String,
        #[arg(index = 2, help = "Object to tag (HEAD by default)")]
        target: Option<String>,
    },
    #[command(name = "show-ref", about = "List refs and their values")]
    ShowRef {
        #[arg(long, help = "Print symbolic refs as they are stored")]
        no_deref: bool,
        #[arg(index = 1, help = "Only refs whose name starts with this prefix")]
        prefix: Option<String>,
    },
}

fn main() -> Result<()> {
    init_tracing();

    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let cli = Cli::parse();

    match &cli.command {
        Commands::Init { path } => {
            let path = match path {
                Some(path) => path.clone(),
                None => std::env::current_dir()?,
            };

            Repository::new(path, Box::new(std::io::stdout()))?.init()?
        }
        Commands::HashObject { file } => {
            open_repository()?.hash_file(file)?;
        }
        Commands::CatFile { expect, object } => open_repository()?.cat_file(object, *expect)?,
        Commands::WriteTree => {
            open_repository()?.write_tree()?;
        }
        Commands::ReadTree { tree } => {
            let repository = open_repository()?;
            let tree_oid = repository.resolve(tree)?;
            repository.read_tree(&tree_oid)?
        }
        Commands::Commit { message } => {
            open_repository()?.commit(message)?;
        }
        Commands::Log { name } => open_repository()?.show_log(name)?,
        Commands::Checkout { name } => {
            open_repository()?.checkout(name)?;
        }
        Commands::Branch { name, start } => {
            let repository = open_repository()?;
            match name {
                Some(name) => repository.branch(name, start.as_deref())?,
                None => repository.list_branches()?,
            }
        }
        Commands::Tag { name, target } => open_repository()?.tag(name, target.as_deref())?,
        Commands::ShowRef { no_deref, prefix } => {
            open_repository()?.show_ref(prefix.as_deref(), !no_deref)?
        }
    }

    Ok(())
}

// every command but init runs against an existing repository rooted at the cwd
fn open_repository() -> Result<Repository> {
    let repository = Repository::new(std::env::current_dir()?, Box::new(std::io::stdout()))?;
    repository.ensure_initialized()?;

    Ok(repository)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
