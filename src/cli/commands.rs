use std::io;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::CliResult;
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::{
    parse_shape, visit_all, Annotator, ComponentTree, NodeId, Notation, ShapeStats, TreeBuilder,
    TreeNodeConvert, TreeResult,
};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let settings = Settings::load(cli.config_file.as_deref())?;
    let notation = &settings.notation;

    match &cli.command {
        Some(Commands::Render { expr }) => _render(expr, notation),
        Some(Commands::Tree { expr }) => _tree(expr, notation),
        Some(Commands::Stats { expr }) => _stats(expr, notation),
        Some(Commands::Visit { expr, tags }) => _visit(expr, tags, notation),
        Some(Commands::Demo) => _demo(notation),
        Some(Commands::Config { command }) => _config(command, cli, &settings),
        Some(Commands::Completion { shell }) => _completion(*shell),
        None => Ok(()),
    }
}

/// Parses `expr` and materializes it as a fresh tree.
pub fn build_tree(expr: &str, notation: &Notation) -> CliResult<(ComponentTree, NodeId)> {
    let shape = parse_shape(expr, notation)?;
    let mut tree = ComponentTree::new();
    let root = TreeBuilder::new(&mut tree).build(&shape)?;
    debug!(nodes = tree.len(), "built tree");
    Ok((tree, root))
}

/// The components a client works with: the root's children, or the root itself if it is a leaf.
pub fn top_level(tree: &ComponentTree, root: NodeId) -> TreeResult<Vec<NodeId>> {
    if tree.is_composite(root)? {
        Ok(tree.children(root)?.to_vec())
    } else {
        Ok(vec![root])
    }
}

#[instrument(skip(notation))]
fn _render(expr: &str, notation: &Notation) -> CliResult<()> {
    let (tree, root) = build_tree(expr, notation)?;
    output::info(&tree.operation_with(root, notation)?);
    Ok(())
}

#[instrument(skip(notation))]
fn _tree(expr: &str, notation: &Notation) -> CliResult<()> {
    let (tree, root) = build_tree(expr, notation)?;
    output::info(&tree.to_tree_string(root, notation)?);
    Ok(())
}

#[instrument(skip(notation))]
fn _stats(expr: &str, notation: &Notation) -> CliResult<()> {
    let (tree, root) = build_tree(expr, notation)?;
    let mut stats = ShapeStats::new();
    tree.accept(root, &mut stats)?;
    output::action("leaves", &stats.leaves);
    output::action("containers", &stats.containers);
    output::action("depth", &stats.max_depth);
    Ok(())
}

#[instrument(skip(notation))]
fn _visit(expr: &str, tags: &[String], notation: &Notation) -> CliResult<()> {
    let (tree, root) = build_tree(expr, notation)?;
    let components = top_level(&tree, root)?;
    for tag in tags {
        let mut visitor = Annotator::with_notation(tag.as_str(), notation.clone());
        visit_all(&tree, &components, &mut visitor)?;
        output::header(visitor.tag());
        for line in &visitor.lines {
            output::detail(line);
        }
    }
    Ok(())
}

#[instrument(skip(notation))]
fn _demo(notation: &Notation) -> CliResult<()> {
    let mut tree = ComponentTree::new();

    output::header("Client: simple component");
    let simple = tree.leaf();
    output::action("Result", &tree.operation_with(simple, notation)?);

    output::header("Client: composite tree");
    let root = tree.container();
    for _ in 0..2 {
        let branch = tree.container();
        for _ in 0..2 {
            let leaf = tree.leaf();
            tree.add(branch, leaf)?;
        }
        tree.add(root, branch)?;
    }
    output::action("Result", &tree.operation_with(root, notation)?);

    output::header("Client: uniform handling");
    if tree.is_composite(root)? {
        tree.add(root, simple)?;
    }
    output::action("Result", &tree.operation_with(root, notation)?);

    output::header("Client: visitors");
    let components = [tree.named_leaf("A"), tree.named_leaf("B")];
    for tag in ["ConcreteVisitor1", "ConcreteVisitor2"] {
        let mut visitor = Annotator::with_notation(tag, notation.clone());
        visit_all(&tree, &components, &mut visitor)?;
        for line in &visitor.lines {
            output::detail(line);
        }
    }
    Ok(())
}

fn _config(command: &ConfigCommands, cli: &Cli, settings: &Settings) -> CliResult<()> {
    match command {
        ConfigCommands::Show => output::info(&settings.to_toml()?),
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::action("global", &path.display()),
                None => output::action("global", "(unavailable)"),
            }
            if let Some(path) = &cli.config_file {
                output::action("explicit", &path.display());
            }
        }
    }
    Ok(())
}

fn _completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
