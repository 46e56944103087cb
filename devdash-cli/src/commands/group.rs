//! `devdash group` — add / list / rename / remove.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use uuid::Uuid;

use devdash_core::{Group, GroupId, OrderKey, StoredState};

use super::open_store;

#[derive(Subcommand, Debug)]
pub enum GroupCommand {
    /// Create a group.
    Add(AddArgs),

    /// List groups in dashboard order.
    List,

    /// Rename a group.
    Rename(RenameArgs),

    /// Delete a group. Member projects are kept and ungrouped from it.
    Remove(RemoveArgs),
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Group name.
    pub name: String,
}

#[derive(Args, Debug)]
pub struct RenameArgs {
    /// Group id.
    pub id: String,

    /// New name.
    pub name: String,
}

#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Group id.
    pub id: String,
}

pub fn run(cmd: GroupCommand) -> Result<()> {
    match cmd {
        GroupCommand::Add(args) => add(args),
        GroupCommand::List => list(),
        GroupCommand::Rename(args) => rename(args),
        GroupCommand::Remove(args) => remove(args),
    }
}

fn add(args: AddArgs) -> Result<()> {
    let mut store = open_store()?;
    let group = Group {
        id: GroupId(Uuid::new_v4().to_string()),
        name: args.name.clone(),
        order: OrderKey::Append,
    };
    let id = group.id.clone();
    store.upsert_group(group);
    println!("✓ Added group '{}' ({id})", args.name);
    Ok(())
}

fn list() -> Result<()> {
    let store = open_store()?;
    let state = store.state();

    if state.groups.is_empty() {
        println!("No groups.");
        println!("Run: devdash group add <name>");
        return Ok(());
    }

    let mut groups: Vec<&Group> = state.groups.iter().collect();
    groups.sort_by_key(|g| g.order);
    for g in groups {
        let members = state
            .projects
            .iter()
            .filter(|p| p.group_ids.contains(&g.id))
            .count();
        println!("{} [{}] — {} project(s)", g.name, g.id, members);
    }
    Ok(())
}

fn rename(args: RenameArgs) -> Result<()> {
    let mut store = open_store()?;
    let mut group = lookup(store.state(), &args.id)?;
    group.name = args.name.clone();

    store.upsert_group(group);
    println!("✓ Renamed group to '{}'", args.name);
    Ok(())
}

fn remove(args: RemoveArgs) -> Result<()> {
    let mut store = open_store()?;
    let group = lookup(store.state(), &args.id)?;

    store.delete_group(&group.id);
    println!("✓ Removed group '{}'", group.name);
    Ok(())
}

fn lookup(state: &StoredState, id: &str) -> Result<Group> {
    state
        .groups
        .iter()
        .find(|g| g.id.0 == id)
        .cloned()
        .with_context(|| format!("no group with id '{id}' — see `devdash group list`"))
}
