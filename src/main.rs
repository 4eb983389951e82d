use anyhow::Result;
use clap::{Parser, Subcommand};
use rev::areas::repository::Repository;
use rev::artifacts::database::database_entry::DatabaseEntry;
use rev::artifacts::objects::commit::Author;
use rev::artifacts::objects::object::RawObject;
use rev::artifacts::objects::object_type::ObjectType;
use rev::commands::porcelain::log::format_commit_medium;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "REV_LOG";

#[derive(Parser)]
#[command(
    name = "rev",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A minimal content-addressed version control system",
    long_about = "rev keeps a linear history of snapshots of a working directory. \
    Files are staged into an index, committed as trees of content-addressed objects, \
    and any past commit can be restored with revert.",
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
        name = "add",
        about = "Stage files for the next commit",
        long_about = "This command stores the content of each file and records it in the index. \
        Every path must name a regular file inside the work tree."
    )]
    Add {
        #[arg(index = 1, required = true, help = "The files to stage")]
        files: Vec<PathBuf>,
    },
    #[command(
        name = "commit",
        about = "Create a new commit with the specified message",
        long_about = "This command records the staged files as a new commit on top of the current head."
    )]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
        #[arg(long, help = "Override the author identity, as \"Name <email>\"")]
        author: Option<String>,
    },
    #[command(
        name = "status",
        about = "Show the working tree status",
        long_about = "This command lists files that were modified or deleted since they were staged, \
        and files that are not staged at all."
    )]
    Status,
    #[command(
        name = "log",
        about = "Show the commit history",
        long_about = "This command lists the commits reachable from the current head, newest first."
    )]
    Log,
    #[command(
        name = "revert",
        about = "Restore the working directory to a past commit",
        long_about = "This command removes every staged file, checks out the tree of the given commit, \
        rebuilds the index from it and detaches the head onto that commit. \
        Uncommitted changes to staged files are lost."
    )]
    Revert {
        #[arg(index = 1, help = "The commit SHA to restore")]
        commit: String,
    },
    #[command(
        name = "cat-file",
        about = "Print the content of an object",
        long_about = "This command prints the content of an object in the repository. \
        It requires the SHA of the object to be specified."
    )]
    CatFile {
        #[arg(short = 'p', long, help = "The object SHA to print")]
        sha: String,
    },
    #[command(
        name = "hash-object",
        about = "Hash a file and optionally write it to the object database",
        long_about = "This command computes the blob SHA of a file and can write it to the object database. \
        The index is left untouched."
    )]
    HashObject {
        #[arg(short, long, required = false, help = "Write the object to the object database")]
        write: bool,
        #[arg(index = 1)]
        file: PathBuf,
    },
    #[command(
        name = "ls-tree",
        about = "List the contents of a tree object",
        long_about = "This command lists the entries of a tree, or of the tree of a commit."
    )]
    LsTree {
        #[arg(index = 1, help = "The tree or commit SHA")]
        sha: String,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_repository() -> Result<Repository> {
    Repository::open(std::env::current_dir()?)
}

fn format_tree_entry(name: &str, entry: &DatabaseEntry) -> String {
    let kind = if entry.is_tree() {
        ObjectType::Tree
    } else {
        ObjectType::Blob
    };

    format!("{:06o} {} {}\t{}", entry.mode.as_u32(), kind, entry.oid, name)
}

fn print_object(repository: &Repository, object: RawObject) -> Result<()> {
    let mut stdout = std::io::stdout().lock();

    match object.kind {
        ObjectType::Blob | ObjectType::Commit => stdout.write_all(&object.payload)?,
        ObjectType::Tree => {
            let oid = object.object_id();
            for (name, entry) in repository.ls_tree(oid.as_ref())? {
                writeln!(stdout, "{}", format_tree_entry(&name, &entry))?;
            }
        }
    }

    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init { path } => {
            let path = match path {
                Some(path) => path,
                None => std::env::current_dir()?,
            };
            let repository = Repository::init(path)?;

            println!(
                "Initialized empty rev repository in {}",
                repository.repository_dir().display()
            );
        }
        Commands::Add { files } => {
            let repository = open_repository()?;

            let mut failed = 0;
            for file in &files {
                if let Err(error) = repository.stage(file) {
                    eprintln!("error: {error:#}");
                    failed += 1;
                }
            }

            if failed > 0 {
                anyhow::bail!("{failed} of {} path(s) could not be staged", files.len());
            }
        }
        Commands::Commit { message, author } => {
            let repository = open_repository()?;

            let author = match author {
                Some(identity) => {
                    let author = Author::from_identity(&identity)?;
                    match Author::pinned_timestamp_from_env()? {
                        Some(timestamp) => author.with_timestamp(timestamp),
                        None => author,
                    }
                }
                None => Author::load_from_env()?,
            };

            let summary = repository.commit(&message, author)?;
            println!("{summary}");
        }
        Commands::Status => {
            let repository = open_repository()?;

            for (path, change) in repository.status()?.changes() {
                println!("{change} {}", path.display());
            }
        }
        Commands::Log => {
            let repository = open_repository()?;

            for (position, entry) in repository.log()?.enumerate() {
                let (oid, commit) = entry?;
                if position > 0 {
                    println!();
                }
                println!("{}", format_commit_medium(&oid, &commit));
            }
        }
        Commands::Revert { commit } => {
            let repository = open_repository()?;

            let oid = repository.revert(&commit)?;
            println!("head detached at {}", oid.to_short_oid());
        }
        Commands::CatFile { sha } => {
            let repository = open_repository()?;

            let object = repository.cat_file(&sha)?;
            print_object(&repository, object)?;
        }
        Commands::HashObject { write, file } => {
            let repository = open_repository()?;

            println!("{}", repository.hash_object(file, write)?);
        }
        Commands::LsTree { sha } => {
            let repository = open_repository()?;

            for (name, entry) in repository.ls_tree(&sha)? {
                println!("{}", format_tree_entry(&name, &entry));
            }
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    if let Err(error) = run(cli) {
        eprintln!("error: {error:#}");
        std::process::exit(1);
    }
}
