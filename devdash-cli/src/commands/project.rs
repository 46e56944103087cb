//! `devdash project` — add / list / edit / remove / move / reorder.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use uuid::Uuid;

use devdash_core::{GroupId, OrderKey, Project, ProjectId, StoredState};

use super::open_store;

#[derive(Subcommand, Debug)]
pub enum ProjectCommand {
    /// Add a project folder to the dashboard.
    Add(AddArgs),

    /// List projects, optionally filtered to one group's view.
    List(ListArgs),

    /// Edit a project's name, URL or folder.
    Edit(EditArgs),

    /// Remove a project from the dashboard.
    Remove(RemoveArgs),

    /// Replace a project's group membership.
    Move(MoveArgs),

    /// Move a project to a new position within a view.
    Reorder(ReorderArgs),
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Path to the project folder.
    pub folder: PathBuf,

    /// Display name; defaults to the folder name.
    #[arg(long)]
    pub name: Option<String>,

    /// Dev-server URL used for screenshots (e.g. http://localhost:3000).
    #[arg(long)]
    pub url: Option<String>,

    /// Group id(s) the project starts in. Repeatable.
    #[arg(long = "group")]
    pub groups: Vec<String>,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Show only the named group's view.
    #[arg(long)]
    pub group: Option<String>,

    /// Print the view as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Project id.
    pub id: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub url: Option<String>,

    #[arg(long)]
    pub folder: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Project id.
    pub id: String,
}

#[derive(Args, Debug)]
pub struct MoveArgs {
    /// Project id.
    pub id: String,

    /// Target group id(s); omit entirely to ungroup. Repeatable.
    #[arg(long = "group")]
    pub groups: Vec<String>,
}

#[derive(Args, Debug)]
pub struct ReorderArgs {
    /// Project id.
    pub id: String,

    /// Zero-based target position within the view. Clamps past the end.
    pub to_index: usize,

    /// Group id scoping the view; omit for the all-projects view.
    #[arg(long)]
    pub group: Option<String>,
}

pub fn run(cmd: ProjectCommand) -> Result<()> {
    match cmd {
        ProjectCommand::Add(args) => add(args),
        ProjectCommand::List(args) => list(args),
        ProjectCommand::Edit(args) => edit(args),
        ProjectCommand::Remove(args) => remove(args),
        ProjectCommand::Move(args) => move_project(args),
        ProjectCommand::Reorder(args) => reorder(args),
    }
}

fn add(args: AddArgs) -> Result<()> {
    let mut store = open_store()?;
    let group_ids = resolve_groups(store.state(), &args.groups)?;

    let name = match args.name {
        Some(name) => name,
        None => args
            .folder
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| args.folder.display().to_string()),
    };

    let project = Project {
        id: ProjectId(Uuid::new_v4().to_string()),
        name: name.clone(),
        folder_path: args.folder,
        url: args.url,
        group_ids,
        order: OrderKey::Append,
        thumbnail_uri: None,
    };
    let id = project.id.clone();
    store.upsert_project(project);

    println!("✓ Added '{name}' ({id})");
    Ok(())
}

fn list(args: ListArgs) -> Result<()> {
    let store = open_store()?;
    let context = match &args.group {
        Some(id) => Some(find_group(store.state(), id)?),
        None => None,
    };

    let mut view: Vec<&Project> = store
        .state()
        .projects
        .iter()
        .filter(|p| p.in_view(context.as_ref()))
        .collect();
    view.sort_by_key(|p| p.order);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    if view.is_empty() {
        println!("No projects.");
        println!("Run: devdash project add <folder>");
        return Ok(());
    }

    for (position, p) in view.iter().enumerate() {
        let url = p.url.as_deref().unwrap_or("-");
        println!(
            "{:>3}. {} [{}]\n     {}  {}",
            position,
            p.name,
            p.id,
            p.folder_path.display(),
            url
        );
    }
    Ok(())
}

fn edit(args: EditArgs) -> Result<()> {
    let mut store = open_store()?;
    let mut project = find_project(store.state(), &args.id)?.clone();

    if let Some(name) = args.name {
        project.name = name;
    }
    if let Some(url) = args.url {
        project.url = Some(url);
    }
    if let Some(folder) = args.folder {
        project.folder_path = folder;
    }

    let name = project.name.clone();
    store.upsert_project(project);
    println!("✓ Updated '{name}'");
    Ok(())
}

fn remove(args: RemoveArgs) -> Result<()> {
    let mut store = open_store()?;
    let project = find_project(store.state(), &args.id)?;
    let (id, name) = (project.id.clone(), project.name.clone());

    store.delete_project(&id);
    println!("✓ Removed '{name}'");
    Ok(())
}

fn move_project(args: MoveArgs) -> Result<()> {
    let mut store = open_store()?;
    let group_ids = resolve_groups(store.state(), &args.groups)?;
    let mut project = find_project(store.state(), &args.id)?.clone();
    project.group_ids = group_ids;

    let name = project.name.clone();
    store.upsert_project(project);
    if args.groups.is_empty() {
        println!("✓ Moved '{name}' out of all groups");
    } else {
        println!("✓ Moved '{name}' to {}", args.groups.join(", "));
    }
    Ok(())
}

fn reorder(args: ReorderArgs) -> Result<()> {
    let mut store = open_store()?;
    let context = match &args.group {
        Some(id) => Some(find_group(store.state(), id)?),
        None => None,
    };
    let project = find_project(store.state(), &args.id)?;
    if !project.in_view(context.as_ref()) {
        bail!(
            "project '{}' is not in group '{}'",
            args.id,
            args.group.as_deref().unwrap_or_default()
        );
    }
    let id = project.id.clone();

    store.reorder_project(&id, args.to_index, context.as_ref());
    println!("✓ Reordered '{}'", args.id);
    Ok(())
}

// ---------------------------------------------------------------------------
// Lookup helpers
// ---------------------------------------------------------------------------

pub(crate) fn find_project<'a>(state: &'a StoredState, id: &str) -> Result<&'a Project> {
    state
        .projects
        .iter()
        .find(|p| p.id.0 == id)
        .with_context(|| format!("no project with id '{id}' — see `devdash project list`"))
}

pub(crate) fn find_group(state: &StoredState, id: &str) -> Result<GroupId> {
    state
        .groups
        .iter()
        .find(|g| g.id.0 == id)
        .map(|g| g.id.clone())
        .with_context(|| format!("no group with id '{id}' — see `devdash group list`"))
}

fn resolve_groups(state: &StoredState, ids: &[String]) -> Result<Vec<GroupId>> {
    ids.iter().map(|id| find_group(state, id)).collect()
}
