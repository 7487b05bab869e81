//! uixml CLI - query Android UI dumps
//!
//! Usage:
//!     uixml [OPTIONS] [FILE]
//!
//! Environment Variables:
//!     UIXML_DUMP_FILE: Dump file to read when FILE is not given (default: stdin)

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;
use ui_agent::{Hierarchy, Node};

/// Query Android UI dumps
#[derive(Parser, Debug)]
#[command(name = "uixml")]
#[command(about = "Query Android UI dumps produced by `uiautomator dump`")]
#[command(after_help = r#"Examples:
    # First clickable node described as "OK", as tap coordinates
    adb exec-out uiautomator dump /dev/tty | uixml --desc OK --clickable --center

    # Every button in a saved dump
    uixml window_dump.xml --class android.widget.Button --all

    # Children of a container, as JSON
    uixml window_dump.xml --parent-resource-id com.example:id/form --all --json

    # Print the decoded tree
    uixml window_dump.xml --tree
"#)]
struct Cli {
    /// Dump file to read ("-" or omitted for stdin)
    #[arg(env = "UIXML_DUMP_FILE")]
    file: Option<PathBuf>,

    // Match options
    /// Exact class name, e.g. android.widget.Button
    #[arg(long)]
    class: Option<String>,

    /// Exact visible text
    #[arg(long)]
    text: Option<String>,

    /// Exact content description
    #[arg(long)]
    desc: Option<String>,

    /// Exact resource id, e.g. com.example:id/login
    #[arg(long)]
    resource_id: Option<String>,

    /// Exact owning package
    #[arg(long)]
    package: Option<String>,

    /// Resource id the parent node must have
    #[arg(long)]
    parent_resource_id: Option<String>,

    /// Only nodes with clickable="true"
    #[arg(long)]
    clickable: bool,

    // Output options
    /// Print every match instead of the first one
    #[arg(short = 'a', long)]
    all: bool,

    /// Print tap coordinates ("x y") instead of node summaries
    #[arg(long, conflicts_with = "json")]
    center: bool,

    /// Print matches as JSON
    #[arg(long)]
    json: bool,

    /// Print the whole decoded tree and exit
    #[arg(long)]
    tree: bool,

    /// Print the total number of nodes and exit
    #[arg(long)]
    count: bool,
}

/// Node criteria collected from the command line
#[derive(Debug, Default, Clone)]
struct Query {
    class: Option<String>,
    text: Option<String>,
    desc: Option<String>,
    resource_id: Option<String>,
    package: Option<String>,
    parent_resource_id: Option<String>,
    clickable: bool,
}

impl Query {
    fn from_cli(args: &Cli) -> Self {
        Self {
            class: args.class.clone(),
            text: args.text.clone(),
            desc: args.desc.clone(),
            resource_id: args.resource_id.clone(),
            package: args.package.clone(),
            parent_resource_id: args.parent_resource_id.clone(),
            clickable: args.clickable,
        }
    }

    fn matches(&self, n: &Node, pn: &Node) -> bool {
        fn eq(want: &Option<String>, have: &str) -> bool {
            want.as_deref().map_or(true, |w| w == have)
        }

        eq(&self.class, &n.class)
            && eq(&self.text, &n.text)
            && eq(&self.desc, &n.content_desc)
            && eq(&self.resource_id, &n.resource_id)
            && eq(&self.package, &n.package)
            && eq(&self.parent_resource_id, &pn.resource_id)
            && (!self.clickable || n.clickable == "true")
    }
}

/// Read dump text from a file, or stdin for `None` / "-"
async fn load_dump(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) if path != Path::new("-") => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut text = String::new();
            tokio::io::stdin()
                .read_to_string(&mut text)
                .await
                .context("Failed to read dump from stdin")?;
            Ok(text)
        }
    }
}

/// One-line summary of a node
fn describe(node: &Node) -> String {
    let mut line = node.class.clone();
    for (name, value) in [
        ("text", &node.text),
        ("desc", &node.content_desc),
        ("id", &node.resource_id),
    ] {
        if !value.is_empty() {
            line.push_str(&format!(" {}={:?}", name, value));
        }
    }
    if node.clickable == "true" {
        line.push_str(" clickable");
    }
    line.push_str(&format!(" {}", node.bounds));
    line
}

/// Indented rendering of the whole tree
fn render_tree(hierarchy: &Hierarchy) -> String {
    fn render(node: &Node, depth: usize, out: &mut String) {
        out.push_str(&"  ".repeat(depth));
        out.push_str(&describe(node));
        out.push('\n');
        for child in &node.children {
            render(child, depth + 1, out);
        }
    }

    let mut out = format!("hierarchy rotation={}\n", hierarchy.rotation);
    for node in &hierarchy.nodes {
        render(node, 1, &mut out);
    }
    out
}

fn print_nodes(nodes: &[&Node], args: &Cli) -> Result<()> {
    if args.json {
        let json = if args.all {
            serde_json::to_string_pretty(nodes)?
        } else {
            serde_json::to_string_pretty(&nodes[0])?
        };
        println!("{}", json);
        return Ok(());
    }

    for node in nodes {
        if args.center {
            let (x, y) = node.center();
            println!("{} {}", x, y);
        } else {
            println!("{}", describe(node));
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    let dump = load_dump(args.file.as_deref()).await?;
    let hierarchy = Hierarchy::parse(&dump)?;

    if args.tree {
        print!("{}", render_tree(&hierarchy));
        return Ok(());
    }

    if args.count {
        println!("{}", hierarchy.node_count());
        return Ok(());
    }

    let query = Query::from_cli(&args);
    let nodes = if args.all {
        hierarchy.find_nodes(|n, pn| query.matches(n, pn))?
    } else {
        vec![hierarchy.find(|n, pn| query.matches(n, pn))?]
    };

    print_nodes(&nodes, &args)
}
